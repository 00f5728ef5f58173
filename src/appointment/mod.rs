mod requests;
mod responses;

use crate::{
    account::utils::get_username_from_token,
    database::{assert, get_db_conn},
    events::{AppEvent, EventBus},
    models::appointments::{
        Appointment, NewAppointment, APPOINT_STATUS_CANCELED, APPOINT_STATUS_CONFIRMED,
        APPOINT_STATUS_UNCONFIRMED,
    },
    protocol::SimpleResponse,
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::{bail, Context};
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(list)
        .service(filter)
        .service(view)
        .service(save)
        .service(confirm)
        .service(reschedule)
        .service(cancel);
}

crate::post_funcs! {
    (list, "/list", ListRequest, ListResponse),
    (filter, "/filter", FilterRequest, ListResponse),
    (view, "/view", ViewRequest, ViewResponse),
    (save, "/save", SaveRequest, SimpleResponse),
    (confirm, "/confirm", ConfirmRequest, SimpleResponse),
    (reschedule, "/reschedule", RescheduleRequest, SimpleResponse),
    (cancel, "/cancel", CancelRequest, SimpleResponse),
}

fn to_item(data: Appointment) -> AppointmentItem {
    AppointmentItem {
        id: data.id,
        patient_name: data.patient_name,
        scheduled_time: data.scheduled_time,
        doctor_name: data.doctor_name,
        visit_type: data.visit_type,
        status: data.status,
    }
}

fn load_all(conn: &SqliteConnection) -> Result<Vec<Appointment>, diesel::result::Error> {
    use crate::schema::appointments;

    appointments::table
        .order(appointments::scheduled_time.desc())
        .get_results::<Appointment>(conn)
}

async fn list_impl(
    pool: web::Data<DbPool>,
    _events: web::Data<EventBus>,
    _info: web::Json<ListRequest>,
) -> anyhow::Result<ListResponse> {
    let conn = get_db_conn(&pool)?;
    let appos = web::block(move || load_all(&conn))
        .await
        .context("Lỗi cơ sở dữ liệu")?;

    Ok(ListResponse {
        success: true,
        err: "".to_string(),
        appointments: appos.into_iter().map(to_item).collect(),
    })
}

// Matches the management form: a full load, then narrowing in memory.
// Keyword is a substring match on patient and doctor names, status is an
// exact match on the stored value.
async fn filter_impl(
    pool: web::Data<DbPool>,
    _events: web::Data<EventBus>,
    info: web::Json<FilterRequest>,
) -> anyhow::Result<ListResponse> {
    let info = info.into_inner();
    let keyword = info.keyword.unwrap_or_default();
    let status = info.status.unwrap_or_default();

    let conn = get_db_conn(&pool)?;
    let appos = web::block(move || load_all(&conn))
        .await
        .context("Lỗi cơ sở dữ liệu")?;

    let appos = appos
        .into_iter()
        .filter(|appo| {
            keyword.is_empty()
                || appo.patient_name.contains(&keyword)
                || appo.doctor_name.contains(&keyword)
        })
        .filter(|appo| status.is_empty() || appo.status == status)
        .map(to_item)
        .collect();

    Ok(ListResponse {
        success: true,
        err: "".to_string(),
        appointments: appos,
    })
}

async fn view_impl(
    pool: web::Data<DbPool>,
    _events: web::Data<EventBus>,
    info: web::Json<ViewRequest>,
) -> anyhow::Result<ViewResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    assert::assert_appointment(&pool, info.id).await?;

    let conn = get_db_conn(&pool)?;
    let id = info.id;
    let data = web::block(move || {
        appointments::table
            .filter(appointments::id.eq(id))
            .get_result::<Appointment>(&conn)
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    Ok(ViewResponse {
        success: true,
        err: "".to_string(),
        id: data.id,
        patient_name: data.patient_name,
        scheduled_time: data.scheduled_time,
        doctor_name: data.doctor_name,
        visit_type: data.visit_type,
        note: data.note,
        status: data.status,
        telephone: data.telephone,
        address: data.address,
        created_at: crate::utils::format_time_str(&data.created_at),
    })
}

async fn save_impl(
    pool: web::Data<DbPool>,
    events: web::Data<EventBus>,
    info: web::Json<SaveRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    if info.patient_name.trim().is_empty() {
        bail!("Tên bệnh nhân không được để trống");
    }
    if info.scheduled_time.trim().is_empty() {
        bail!("Thời gian khám không được để trống");
    }
    crate::utils::assert_visit_type(&info.visit_type)?;

    get_username_from_token(info.login_token.clone(), &pool).await?;

    let conn = get_db_conn(&pool)?;
    let data = NewAppointment {
        patient_name: info.patient_name,
        patient_id: None,
        scheduled_time: info.scheduled_time,
        doctor_name: info.doctor_name,
        visit_type: info.visit_type,
        note: info.note,
        status: APPOINT_STATUS_UNCONFIRMED.to_string(),
        telephone: info.telephone,
        address: info.address,
        created_at: Utc::now().naive_utc(),
    };
    web::block(move || {
        diesel::insert_into(appointments::table)
            .values(data)
            .execute(&conn)
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    events.emit(AppEvent::DataChanged);
    Ok(SimpleResponse::ok())
}

async fn confirm_impl(
    pool: web::Data<DbPool>,
    events: web::Data<EventBus>,
    info: web::Json<ConfirmRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    get_username_from_token(info.login_token.clone(), &pool).await?;
    assert::assert_appointment(&pool, info.id).await?;

    // Unconditional overwrite, whatever the current status is.
    let conn = get_db_conn(&pool)?;
    let id = info.id;
    web::block(move || {
        diesel::update(appointments::table.filter(appointments::id.eq(id)))
            .set(appointments::status.eq(APPOINT_STATUS_CONFIRMED))
            .execute(&conn)
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    events.emit(AppEvent::DataChanged);
    Ok(SimpleResponse::ok())
}

async fn reschedule_impl(
    pool: web::Data<DbPool>,
    events: web::Data<EventBus>,
    info: web::Json<RescheduleRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    if info.scheduled_time.trim().is_empty() {
        bail!("Thời gian khám không được để trống");
    }
    crate::utils::assert_visit_type(&info.visit_type)?;

    get_username_from_token(info.login_token.clone(), &pool).await?;
    assert::assert_appointment(&pool, info.id).await?;

    // All dialog fields overwrite at once; no conflict check against other
    // bookings of the same doctor.
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

async fn cancel_impl(
    pool: web::Data<DbPool>,
    events: web::Data<EventBus>,
    info: web::Json<CancelRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::appointments;

    let info = info.into_inner();
    get_username_from_token(info.login_token.clone(), &pool).await?;
    assert::assert_appointment(&pool, info.id).await?;

    // Plain read-then-write; the already-cancelled check is a warning to the
    // caller, not a transactional guard.
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
