use serde::Deserialize;

#[derive(Deserialize)]
pub struct ListRequest {}

#[derive(Deserialize)]
pub struct FilterRequest {
    #[serde(default)]
    pub keyword: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct ViewRequest {
    pub id: i64,
}

#[derive(Deserialize)]
pub struct SaveRequest {
    pub login_token: String,
    pub patient_name: String,
    pub scheduled_time: String,
    pub doctor_name: String,
    pub visit_type: String,
    #[serde(default)]
    pub note: String,
    #[serde(default)]
    pub telephone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

#[derive(Deserialize)]
pub struct ConfirmRequest {
    pub login_token: String,
    pub id: i64,
}

#[derive(Deserialize)]
pub struct RescheduleRequest {
    pub login_token: String,
    pub id: i64,
    pub scheduled_time: String,
    pub doctor_name: String,
    pub visit_type: String,
    #[serde(default)]
    pub note: String,
}

#[derive(Deserialize)]
pub struct CancelRequest {
    pub login_token: String,
    pub id: i64,
}
