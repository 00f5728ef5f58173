mod requests;
mod responses;

use crate::{
    account::utils::get_username_from_token,
    database::get_db_conn,
    events::{AppEvent, EventBus},
    models::dispense_log::{DispenseEntry, NewDispenseEntry},
    protocol::SimpleResponse,
    DbPool,
};
use actix_web::{post, web, HttpResponse, Responder};
use anyhow::{bail, Context};
use chrono::Utc;
use diesel::prelude::*;

use self::{requests::*, responses::*};

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(record).service(list);
}

crate::post_funcs! {
    (record, "/record", RecordRequest, SimpleResponse),
    (list, "/list", ListRequest, ListResponse),
}

async fn record_impl(
    pool: web::Data<DbPool>,
    events: web::Data<EventBus>,
    info: web::Json<RecordRequest>,
) -> anyhow::Result<SimpleResponse> {
    use crate::schema::dispense_log;

    let info = info.into_inner();
    if info.medicine.trim().is_empty() {
        bail!("Tên thuốc không được để trống");
    }
    if info.quantity <= 0 {
        bail!("Số lượng phải lớn hơn 0");
    }

    get_username_from_token(info.login_token.clone(), &pool).await?;

    let medicine = info.medicine.clone();
    let conn = get_db_conn(&pool)?;
    let data = NewDispenseEntry {
        medicine: info.medicine,
        quantity: info.quantity,
        patient_name: info.patient_name,
        time: Utc::now().naive_utc(),
    };
    web::block(move || {
        diesel::insert_into(dispense_log::table)
            .values(data)
            .execute(&conn)
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    events.emit(AppEvent::MedicineDispensed { medicine });
    events.emit(AppEvent::DataChanged);
    Ok(SimpleResponse::ok())
}

async fn list_impl(
    pool: web::Data<DbPool>,
    _events: web::Data<EventBus>,
    info: web::Json<ListRequest>,
) -> anyhow::Result<ListResponse> {
    use crate::schema::dispense_log;

    let info = info.into_inner();
    let medicine_pattern = crate::utils::get_str_pattern_opt(info.medicine);
    let patient_pattern = crate::utils::get_str_pattern_opt(info.patient_name);
    let first_index = info.first_index.unwrap_or(0).max(0);
    let limit = info.limit.unwrap_or(30).max(0);

    let conn = get_db_conn(&pool)?;
    let entries = web::block(move || {
        dispense_log::table
            .filter(dispense_log::medicine.like(medicine_pattern))
            .filter(dispense_log::patient_name.like(patient_pattern))
            .order(dispense_log::time.desc())
            .offset(first_index)
            .limit(limit)
            .get_results::<DispenseEntry>(&conn)
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    let entries = entries
        .into_iter()
        .map(|data| DispenseItem {
            id: data.id,
            medicine: data.medicine,
            quantity: data.quantity,
            patient_name: data.patient_name,
            time: crate::utils::format_time_str(&data.time),
        })
        .collect();

    Ok(ListResponse {
        success: true,
        err: "".to_string(),
        entries,
    })
}
