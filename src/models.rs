use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/* -------------------------
   Reference data
--------------------------*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsultationType {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub duration_minutes: i32,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Professional {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub specialty: String,
}

/// A bookable interval. `start_time`/`end_time` are kept as the API sends
/// them (ISO datetime or bare `HH:MM[:SS]`); see `format::format_time`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub slot_id: i64,
    pub start_time: String,
    pub end_time: String,
}

/* -------------------------
   Patients
--------------------------*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patient {
    pub id: i64,
    pub full_name: String,
    pub cpf: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub birth_date: Option<NaiveDate>,
    #[serde(default)]
    pub health_conditions: Option<String>,
    #[serde(default = "default_true")]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub total: u64,
    pub page: u32,
    pub limit_per_page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientPage {
    pub data: Vec<Patient>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatientListParams {
    pub page: u32,
    pub limit_per_page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpf: Option<String>,
}

impl Default for PatientListParams {
    fn default() -> Self {
        Self {
            page: 1,
            limit_per_page: 10,
            cpf: None,
        }
    }
}

/* -------------------------
   Appointments
--------------------------*/

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentType {
    Consulta,
    Exame,
}

impl AppointmentType {
    pub fn label(self) -> &'static str {
        match self {
            AppointmentType::Consulta => "Consulta",
            AppointmentType::Exame => "Exame",
        }
    }
}

/// Body of `POST appointments/create`, assembled from a complete draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentRequest {
    pub appointment_type: AppointmentType,
    pub patient_id: i64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub consultation_type_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub professional_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub exam_type_id: Option<i64>,
    pub date: NaiveDate,
    pub slot_id: i64,
    #[serde(default)]
    pub observations: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentAck {
    pub message: String,
    #[serde(default)]
    pub appointment_id: Option<i64>,
}

/* -------------------------
   Auth
--------------------------*/

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

/* -------------------------
   Wire envelope
--------------------------*/

/// `{is_error, message, data?}` wrapper. Bodies without `data` carry the
/// payload at the top level, so decoding goes through `api::http` rather
/// than this type directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub is_error: bool,
    #[serde(default)]
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn ok(message: impl Into<String>, data: T) -> Self {
        Self {
            is_error: false,
            message: message.into(),
            data: Some(data),
        }
    }
}

fn default_true() -> bool {
    true
}
