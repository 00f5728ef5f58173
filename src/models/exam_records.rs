use crate::schema::exam_records;
use chrono::NaiveDateTime;

#[derive(Queryable)]
pub struct ExamRecord {
    pub id: i64,
    pub appointment_id: i64,
    pub symptoms: String,
    pub diagnosis: String,
    pub conclusion: String,
    pub time: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "exam_records"]
pub struct NewExamRecord {
    pub appointment_id: i64,
    pub symptoms: String,
    pub diagnosis: String,
    pub conclusion: String,
    pub time: NaiveDateTime,
}
