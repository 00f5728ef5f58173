use serde::Serialize;

#[derive(Debug, Default, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub err: String,
    pub login_token: String,
}

#[derive(Default, Serialize)]
pub struct AccountItem {
    pub username: String,
    pub full_name: String,
    pub role: String,
    pub staff_id: Option<i64>,
}

#[derive(Default, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub err: String,
    pub accounts: Vec<AccountItem>,
}

crate::impl_err_response! {
    LoginResponse,
    ListResponse,
}
