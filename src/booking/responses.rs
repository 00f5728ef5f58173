use serde::Serialize;

#[derive(Default, Serialize)]
pub struct BookingItem {
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
    pub bookings: Vec<BookingItem>,
}

crate::impl_err_response! {
    ListResponse,
}
