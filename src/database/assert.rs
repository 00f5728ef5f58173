use actix_web::web;
use anyhow::{bail, Context};
use diesel::prelude::*;

use crate::{database::get_db_conn, DbPool};

pub async fn assert_account(pool: &web::Data<DbPool>, username: String) -> anyhow::Result<()> {
    use crate::schema::accounts;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        accounts::table
            .filter(accounts::username.eq(username))
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    if res == 0 {
        bail!("Không tìm thấy tài khoản");
    }

    Ok(())
}

pub async fn assert_appointment(pool: &web::Data<DbPool>, id: i64) -> anyhow::Result<()> {
    use crate::schema::appointments;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        appointments::table
            .filter(appointments::id.eq(id))
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    if res == 0 {
        bail!("Không tìm thấy lịch hẹn");
    }

    Ok(())
}

pub async fn assert_patient(pool: &web::Data<DbPool>, id: i64) -> anyhow::Result<()> {
    use crate::schema::patients;

    let conn = get_db_conn(pool)?;
    let res = web::block(move || {
        patients::table
            .filter(patients::id.eq(id))
            .count()
            .get_result::<i64>(&conn)
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    if res == 0 {
        bail!("Không tìm thấy bệnh nhân");
    }

    Ok(())
}
