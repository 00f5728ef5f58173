use crate::schema::patients;
use chrono::NaiveDate;

#[derive(Queryable)]
pub struct Patient {
    pub id: i64,
    pub name: String,
    pub national_id: String,
    pub gender: String,
    pub birthday: Option<NaiveDate>,
    pub telephone: String,
    pub address: String,
}

#[derive(Insertable)]
#[table_name = "patients"]
pub struct NewPatient {
    pub name: String,
    pub national_id: String,
    pub gender: String,
    pub birthday: Option<NaiveDate>,
    pub telephone: String,
    pub address: String,
}
