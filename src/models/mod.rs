pub mod accounts;
pub mod appointments;
pub mod dispense_log;
pub mod exam_records;
pub mod patients;
pub mod prescriptions;
pub mod staff;

pub mod account_logins;
