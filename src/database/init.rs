use anyhow::Context;
use diesel::connection::SimpleConnection;
use diesel::prelude::*;
use diesel::SqliteConnection;
use tracing::info;

use crate::models::accounts::{NewAccount, ROLE_ADMIN};
use crate::password::hash_password;

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    national_id TEXT NOT NULL DEFAULT '',
    gender TEXT NOT NULL DEFAULT '',
    birthday DATE,
    telephone TEXT NOT NULL DEFAULT '',
    address TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS staff (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    role TEXT NOT NULL,
    telephone TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS accounts (
    username TEXT PRIMARY KEY NOT NULL,
    password TEXT NOT NULL,
    full_name TEXT NOT NULL,
    role TEXT NOT NULL,
    staff_id BIGINT REFERENCES staff (id)
);

CREATE TABLE IF NOT EXISTS account_logins (
    token TEXT PRIMARY KEY NOT NULL,
    username TEXT NOT NULL,
    login_time TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS appointments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    patient_name TEXT NOT NULL,
    patient_id BIGINT REFERENCES patients (id),
    scheduled_time TEXT NOT NULL,
    doctor_name TEXT NOT NULL DEFAULT '',
    visit_type TEXT NOT NULL DEFAULT '',
    note TEXT NOT NULL DEFAULT '',
    status TEXT NOT NULL,
    telephone TEXT,
    address TEXT,
    created_at TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS exam_records (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    appointment_id BIGINT NOT NULL,
    symptoms TEXT NOT NULL DEFAULT '',
    diagnosis TEXT NOT NULL DEFAULT '',
    conclusion TEXT NOT NULL DEFAULT '',
    time TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS prescriptions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    appointment_id BIGINT NOT NULL,
    doctor_name TEXT NOT NULL DEFAULT '',
    note TEXT NOT NULL DEFAULT '',
    time TIMESTAMP NOT NULL
);

CREATE TABLE IF NOT EXISTS prescription_items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    prescription_id BIGINT NOT NULL,
    medicine TEXT NOT NULL,
    quantity INTEGER NOT NULL DEFAULT 1,
    dosage TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS dispense_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    medicine TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    patient_name TEXT NOT NULL DEFAULT '',
    time TIMESTAMP NOT NULL
);
";

/// Idempotent, runs on every startup.
pub fn init_schema(conn: &SqliteConnection) -> anyhow::Result<()> {
    conn.batch_execute(SCHEMA_SQL)
        .context("Không thể khởi tạo cơ sở dữ liệu")?;
    Ok(())
}

/// Seed one admin account on a fresh database so the management surface is
/// reachable. The password must be changed after first login.
pub fn ensure_default_admin(conn: &SqliteConnection) -> anyhow::Result<()> {
    use crate::schema::accounts;

    let res = accounts::table
        .count()
        .get_result::<i64>(conn)
        .context("Lỗi cơ sở dữ liệu")?;
    if res > 0 {
        return Ok(());
    }

    let data = NewAccount {
        username: "admin".to_string(),
        password: hash_password("admin123"),
        full_name: "Quản trị hệ thống".to_string(),
        role: ROLE_ADMIN.to_string(),
        staff_id: None,
    };
    diesel::insert_into(accounts::table)
        .values(data)
        .execute(conn)
        .context("Lỗi cơ sở dữ liệu")?;
    info!("seeded default admin account");

    Ok(())
}
