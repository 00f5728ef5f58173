use crate::schema::{prescription_items, prescriptions};
use chrono::NaiveDateTime;

#[derive(Queryable)]
pub struct Prescription {
    pub id: i64,
    pub appointment_id: i64,
    pub doctor_name: String,
    pub note: String,
    pub time: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "prescriptions"]
pub struct NewPrescription {
    pub appointment_id: i64,
    pub doctor_name: String,
    pub note: String,
    pub time: NaiveDateTime,
}

#[derive(Queryable)]
pub struct PrescriptionItem {
    pub id: i64,
    pub prescription_id: i64,
    pub medicine: String,
    pub quantity: i32,
    pub dosage: String,
}

#[derive(Insertable)]
#[table_name = "prescription_items"]
pub struct NewPrescriptionItem {
    pub prescription_id: i64,
    pub medicine: String,
    pub quantity: i32,
    pub dosage: String,
}
