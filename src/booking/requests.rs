use serde::Deserialize;

#[derive(Deserialize)]
pub struct RecentRequest {
    #[serde(default)]
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct SubmitRequest {
    pub name: String,
    #[serde(default)]
    pub national_id: Option<String>,
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
pub struct MyAppointmentsRequest {
    pub name: String,
    #[serde(default)]
    pub national_id: Option<String>,
}

#[derive(Deserialize)]
pub struct CancelRequest {
    pub id: i64,
}

#[derive(Deserialize)]
pub struct EditRequest {
    pub id: i64,
    pub scheduled_time: String,
    pub doctor_name: String,
    pub visit_type: String,
    #[serde(default)]
    pub note: String,
}
