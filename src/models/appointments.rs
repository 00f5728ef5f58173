use crate::schema::appointments;
use chrono::NaiveDateTime;

#[derive(Queryable)]
pub struct Appointment {
    pub id: i64,
    pub patient_name: String,
    pub patient_id: Option<i64>,
    pub scheduled_time: String,
    pub doctor_name: String,
    pub visit_type: String,
    pub note: String,
    pub status: String,
    pub telephone: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "appointments"]
pub struct NewAppointment {
    pub patient_name: String,
    pub patient_id: Option<i64>,
    pub scheduled_time: String,
    pub doctor_name: String,
    pub visit_type: String,
    pub note: String,
    pub status: String,
    pub telephone: Option<String>,
    pub address: Option<String>,
    pub created_at: NaiveDateTime,
}

pub const APPOINT_STATUS_UNCONFIRMED: &str = "Chưa xác nhận";
pub const APPOINT_STATUS_CONFIRMED: &str = "Đã xác nhận";
pub const APPOINT_STATUS_DONE: &str = "Hoàn thành";
pub const APPOINT_STATUS_CANCELED: &str = "Đã hủy";
pub const APPOINT_STATUS_BOOKED: &str = "Đã đặt lịch";

pub const VISIT_TYPES: [&str; 3] = ["Khám mới", "Tái khám", "Khám dịch vụ"];
