table! {
    account_logins (token) {
        token -> Text,
        username -> Text,
        login_time -> Timestamp,
    }
}

table! {
    accounts (username) {
        username -> Text,
        password -> Text,
        full_name -> Text,
        role -> Text,
        staff_id -> Nullable<BigInt>,
    }
}

table! {
    appointments (id) {
        id -> BigInt,
        patient_name -> Text,
        patient_id -> Nullable<BigInt>,
        scheduled_time -> Text,
        doctor_name -> Text,
        visit_type -> Text,
        note -> Text,
        status -> Text,
        telephone -> Nullable<Text>,
        address -> Nullable<Text>,
        created_at -> Timestamp,
    }
}

table! {
    dispense_log (id) {
        id -> BigInt,
        medicine -> Text,
        quantity -> Integer,
        patient_name -> Text,
        time -> Timestamp,
    }
}

table! {
    exam_records (id) {
        id -> BigInt,
        appointment_id -> BigInt,
        symptoms -> Text,
        diagnosis -> Text,
        conclusion -> Text,
        time -> Timestamp,
    }
}

table! {
    patients (id) {
        id -> BigInt,
        name -> Text,
        national_id -> Text,
        gender -> Text,
        birthday -> Nullable<Date>,
        telephone -> Text,
        address -> Text,
    }
}

table! {
    prescription_items (id) {
        id -> BigInt,
        prescription_id -> BigInt,
        medicine -> Text,
        quantity -> Integer,
        dosage -> Text,
    }
}

table! {
    prescriptions (id) {
        id -> BigInt,
        appointment_id -> BigInt,
        doctor_name -> Text,
        note -> Text,
        time -> Timestamp,
    }
}

table! {
    staff (id) {
        id -> BigInt,
        name -> Text,
        role -> Text,
        telephone -> Text,
    }
}

allow_tables_to_appear_in_same_query!(
    account_logins,
    accounts,
    appointments,
    dispense_log,
    exam_records,
    patients,
    prescription_items,
    prescriptions,
    staff,
);
