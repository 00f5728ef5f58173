use crate::schema::staff;

#[derive(Queryable)]
pub struct StaffData {
    pub id: i64,
    pub name: String,
    pub role: String,
    pub telephone: String,
}

#[derive(Insertable)]
#[table_name = "staff"]
pub struct NewStaff {
    pub name: String,
    pub role: String,
    pub telephone: String,
}
