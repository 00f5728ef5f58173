use actix_web::web;
use anyhow::{bail, Context};
use chrono::Utc;
use diesel::prelude::*;

use crate::{models::account_logins::AccountLoginData, DbPool};

pub async fn get_username_from_token(
    token: String,
    pool: &web::Data<DbPool>,
) -> anyhow::Result<String> {
    use crate::schema::account_logins;
    const MAX_LOGIN_TIME_SECS: i64 = 3600;

    let conn = pool.get().context("Lỗi kết nối cơ sở dữ liệu")?;
    let data = web::block(move || {
        account_logins::table
            .filter(account_logins::token.eq(token))
            .order(account_logins::login_time.desc())
            .limit(1)
            .get_result::<AccountLoginData>(&conn)
            .optional()
    })
    .await
    .context("Lỗi cơ sở dữ liệu")?;

    if let Some(data) = data {
        let time_diff = Utc::now()
            .naive_utc()
            .signed_duration_since(data.login_time);
        if time_diff.num_seconds() <= MAX_LOGIN_TIME_SECS {
            Ok(data.username)
        } else {
            bail!("Phiên đăng nhập đã hết hạn");
        }
    } else {
        bail!("Bạn chưa đăng nhập");
    }
}
