use serde::Deserialize;

#[derive(Deserialize)]
pub struct RecordRequest {
    pub login_token: String,
    pub medicine: String,
    pub quantity: i32,
    #[serde(default)]
    pub patient_name: String,
}

#[derive(Deserialize)]
pub struct ListRequest {
    #[serde(default)]
    pub medicine: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub first_index: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}
