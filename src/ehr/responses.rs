use serde::Serialize;

#[derive(Default, Serialize)]
pub struct PatientItem {
    pub id: i64,
    pub name: String,
    pub national_id: String,
    pub gender: String,
    pub telephone: String,
    pub address: String,
}

/// One resolved patient, or a disambiguation list, or neither (not found —
/// `message` says so; this is still a successful response).
#[derive(Default, Serialize)]
pub struct SearchResponse {
    pub success: bool,
    pub err: String,
    pub patient: Option<PatientItem>,
    pub candidates: Vec<PatientItem>,
    pub message: String,
}

#[derive(Default, Serialize)]
pub struct MedicineItem {
    pub medicine: String,
    pub quantity: i32,
    pub dosage: String,
}

#[derive(Default, Serialize)]
pub struct PrescriptionGroup {
    pub id: i64,
    pub doctor_name: String,
    pub note: String,
    pub time: String,
    pub medicines: Vec<MedicineItem>,
}

#[derive(Default, Serialize)]
pub struct ExamItem {
    pub symptoms: String,
    pub diagnosis: String,
    pub conclusion: String,
    pub time: String,
}

#[derive(Default, Serialize)]
pub struct VisitItem {
    pub id: i64,
    pub scheduled_time: String,
    pub doctor_name: String,
    pub visit_type: String,
    pub status: String,
    pub exam: Option<ExamItem>,
    pub prescriptions: Vec<PrescriptionGroup>,
}

#[derive(Default, Serialize)]
pub struct HistoryResponse {
    pub success: bool,
    pub err: String,
    pub patient_name: String,
    pub visits: Vec<VisitItem>,
}

crate::impl_err_response! {
    SearchResponse,
    HistoryResponse,
}
