use serde::Serialize;

#[derive(Default, Serialize)]
pub struct DispenseItem {
    pub id: i64,
    pub medicine: String,
    pub quantity: i32,
    pub patient_name: String,
    pub time: String,
}

#[derive(Default, Serialize)]
pub struct ListResponse {
    pub success: bool,
    pub err: String,
    pub entries: Vec<DispenseItem>,
}

crate::impl_err_response! {
    ListResponse,
}
