use crate::schema::accounts;

#[derive(Queryable, Identifiable)]
#[primary_key(username)]
#[table_name = "accounts"]
pub struct AccountData {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    pub staff_id: Option<i64>,
}

#[derive(Insertable)]
#[table_name = "accounts"]
pub struct NewAccount {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    pub staff_id: Option<i64>,
}

pub const ROLE_ADMIN: &str = "Quản trị";
pub const ROLE_DOCTOR: &str = "Bác sĩ";
pub const ROLE_NURSE: &str = "Y tá";
pub const ROLE_RECEPTIONIST: &str = "Lễ tân";

pub const ROLES: [&str; 4] = [ROLE_ADMIN, ROLE_DOCTOR, ROLE_NURSE, ROLE_RECEPTIONIST];

/// Roles that own a row in the staff table.
pub fn is_staff_role(role: &str) -> bool {
    role == ROLE_DOCTOR || role == ROLE_NURSE || role == ROLE_RECEPTIONIST
}
