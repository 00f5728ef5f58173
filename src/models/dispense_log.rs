use crate::schema::dispense_log;
use chrono::NaiveDateTime;

#[derive(Queryable)]
pub struct DispenseEntry {
    pub id: i64,
    pub medicine: String,
    pub quantity: i32,
    pub patient_name: String,
    pub time: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "dispense_log"]
pub struct NewDispenseEntry {
    pub medicine: String,
    pub quantity: i32,
    pub patient_name: String,
    pub time: NaiveDateTime,
}
