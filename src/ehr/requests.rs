use serde::Deserialize;

#[derive(Deserialize)]
pub struct SearchRequest {
    pub name: String,
    #[serde(default)]
    pub national_id: Option<String>,
}

#[derive(Deserialize)]
pub struct HistoryRequest {
    pub patient_id: i64,
}
