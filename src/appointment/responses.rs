use serde::Serialize;

#[derive(Default, Serialize)]
pub struct AppointmentItem {
    pub id: i64,
    pub patient_name: String,
    pub scheduled_time: String,
    pub doctor_name: String,
    pub visit_type: String,
    pub status: String,
}

#[derive(Default, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub err: String,
    pub appointments: Vec<AppointmentItem>,
}

#[derive(Default, Serialize)]
pub struct ViewResponse {
    pub success: bool,
    pub err: String,
    pub id: i64,
    pub patient_name: String,
    pub scheduled_time: String,
    pub doctor_name: String,
    pub visit_type: String,
    pub note: String,
    pub status: String,
    pub telephone: Option<String>,
    pub address: Option<String>,
    pub created_at: String,
}

crate::impl_err_response! {
    ListResponse,
    ViewResponse,
}
