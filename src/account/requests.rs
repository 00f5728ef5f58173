use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LogoutRequest {
    pub login_token: String,
}

#[derive(Deserialize)]
pub struct CreateRequest {
    pub login_token: String,
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct EditRequest {
    pub login_token: String,
    pub username: String,
    pub full_name: String,
    pub role: String,
}

#[derive(Deserialize)]
pub struct DeleteRequest {
    pub login_token: String,
    pub username: String,
}

#[derive(Deserialize)]
pub struct ChangePasswordRequest {
    pub login_token: String,
    pub username: String,
    pub password_new: String,
}

#[derive(Deserialize)]
pub struct ListRequest {
    pub login_token: String,
}
