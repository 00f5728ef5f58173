use crate::schema::account_logins;
use chrono::NaiveDateTime;

#[derive(Queryable, Insertable)]
#[table_name = "account_logins"]
pub struct AccountLoginData {
    pub token: String,
    pub username: String,
    pub login_time: NaiveDateTime,
}
