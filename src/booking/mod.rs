mod requests;
mod responses;

use crate::{
    database::{assert, get_db_conn},
    events::{AppEvent, EventBus},
    models::{
        appointments::{Appointment, NewAppointment, APPOINT_STATUS_BOOKED, APPOINT_STATUS_CANCELED},
        patients::Patient,
    },
    protocol::SimpleResponse,
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::{bail, Context};
use chrono::Utc;
use diesel::prelude::*;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(recent)
        .service(submit)
        .service(my_appointments)
        .service(cancel)
        .service(edit);
}

crate::post_funcs! {
    (recent, "/recent", RecentRequest, ListResponse),
    (submit, "/submit", SubmitRequest, SimpleResponse),
    (my_appointments, "/my_appointments", MyAppointmentsRequest, ListResponse),
    (cancel, "/cancel", CancelRequest, SimpleResponse),
    (edit, "/edit", EditRequest, SimpleResponse),
}

fn to_item(data: Appointment) -> BookingItem {
    BookingItem {
        id: data.id,
        patient_name: data.patient_name,
        scheduled_time: data.scheduled_time,
        doctor_name: data.doctor_name,
        visit_type: data.visit_type,
        status: data.status,
    }
}

async fn recent_impl(
    pool: web::Data<DbPool>,
    _events: web::Data<EventBus>,
    info: web::Json<RecentRequest>,
) -> anyhow::Result<ListResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    let limit = info.limit.unwrap_or(10).max(0);

    let conn = get_db_conn(&pool)?;
    let appos = web::block(move || {
        appointments::table
            .filter(appointments::status.eq(APPOINT_STATUS_BOOKED))
            .order(appointments::created_at.desc())
            .limit(limit)
            .get_results::<Appointment>(&conn)
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    Ok(ListResponse {
        success: true,
        err: "".to_string(),
        bookings: appos.into_iter().map(to_item).collect(),
    })
}

async fn submit_impl(
    pool: web::Data<DbPool>,
    events: web::Data<EventBus>,
    info: web::Json<SubmitRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::{appointments, patients};

    let info = info.into_inner();
    if info.name.trim().is_empty() {
        bail!("Họ tên không được để trống");
    }
    if info.scheduled_time.trim().is_empty() {
        bail!("Thời gian khám không được để trống");
    }
    crate::utils::assert_visit_type(&info.visit_type)?;

    let conn = get_db_conn(&pool)?;
    web::block(move || {
        // Link a patient record only when name + national id resolve to
        // exactly one row; otherwise the booking stays free-text.
        let patient_id = match info.national_id.as_deref() {
            Some(nid) if !nid.is_empty() => {
                let matches = patients::table
                    .filter(patients::name.eq(&info.name))
                    .filter(patients::national_id.eq(nid))
                    .get_results::<Patient>(&conn)
                    .context("Lỗi cơ sở dữ liệu")?;
                if matches.len() == 1 {
                    Some(matches[0].id)
                } else {
                    None
                }
            }
            _ => None,
        };

        let data = NewAppointment {
            patient_name: info.name,
            patient_id,
            scheduled_time: info.scheduled_time,
            doctor_name: info.doctor_name,
            visit_type: info.visit_type,
            note: info.note,
            status: APPOINT_STATUS_BOOKED.to_string(),
            telephone: info.telephone,
            address: info.address,
            created_at: Utc::now().naive_utc(),
        };
        diesel::insert_into(appointments::table)
            .values(data)
            .execute(&conn)
            .context("Lỗi cơ sở dữ liệu")?;

        Ok::<_, anyhow::Error>(())
    })
    .await?;

    events.emit(AppEvent::DataChanged);
    Ok(SimpleResponse::ok())
}

async fn my_appointments_impl(
    pool: web::Data<DbPool>,
    _events: web::Data<EventBus>,
    info: web::Json<MyAppointmentsRequest>,
) -> anyhow::Result<ListResponse> {
    use crate::schema::{appointments, patients};

    let info = info.into_inner();
    if info.name.trim().is_empty() {
        bail!("Vui lòng nhập họ tên");
    }

    let conn = get_db_conn(&pool)?;
    let appos = web::block(move || {
        let query = appointments::table
            .order(appointments::scheduled_time.desc())
            .into_boxed();
        let query = match info.national_id.as_deref() {
            Some(nid) if !nid.is_empty() => {
                let patient = patients::table
                    .filter(patients::name.eq(&info.name))
                    .filter(patients::national_id.eq(nid))
                    .get_result::<Patient>(&conn)
                    .optional()
                    .context("Lỗi cơ sở dữ liệu")?;
                match patient {
                    Some(patient) => query.filter(
                        appointments::patient_id
                            .eq(patient.id)
                            .or(appointments::patient_name.eq(info.name.clone())),
                    ),
                    None => query.filter(appointments::patient_name.eq(info.name.clone())),
                }
            }
            _ => query.filter(appointments::patient_name.eq(info.name.clone())),
        };
        query
            .get_results::<Appointment>(&conn)
            .context("Lỗi cơ sở dữ liệu")
    })
    .await?;

    Ok(ListResponse {
        success: true,
        err: "".to_string(),
        bookings: appos.into_iter().map(to_item).collect(),
    })
}

async fn cancel_impl(
    pool: web::Data<DbPool>,
    events: web::Data<EventBus>,
    info: web::Json<CancelRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    assert::assert_appointment(&pool, info.id).await?;

    let conn = get_db_conn(&pool)?;
    let id = info.id;
    web::block(move || {
        let data = appointments::table
            .filter(appointments::id.eq(id))
            .get_result::<Appointment>(&conn)
            .context("Lỗi cơ sở dữ liệu")?;
        if data.status == APPOINT_STATUS_CANCELED {
            bail!("Lịch hẹn đã được hủy trước đó");
        }

        diesel::update(appointments::table.filter(appointments::id.eq(id)))
            .set(appointments::status.eq(APPOINT_STATUS_CANCELED))
            .execute(&conn)
            .context("Lỗi cơ sở dữ liệu")?;

        Ok(())
    })
    .await?;

    events.emit(AppEvent::DataChanged);
    Ok(SimpleResponse::ok())
}

async fn edit_impl(
    pool: web::Data<DbPool>,
    events: web::Data<EventBus>,
    info: web::Json<EditRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    if info.scheduled_time.trim().is_empty() {
        bail!("Thời gian khám không được để trống");
    }
    crate::utils::assert_visit_type(&info.visit_type)?;
    assert::assert_appointment(&pool, info.id).await?;

    let conn = get_db_conn(&pool)?;
    let id = info.id;
    web::block(move || {
        diesel::update(appointments::table.filter(appointments::id.eq(id)))
            .set((
                appointments::scheduled_time.eq(info.scheduled_time),
                appointments::doctor_name.eq(info.doctor_name),
                appointments::visit_type.eq(info.visit_type),
                appointments::note.eq(info.note),
            ))
            .execute(&conn)
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    events.emit(AppEvent::DataChanged);
    Ok(SimpleResponse::ok())
}
