use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::ApiResult;
use crate::models::{
    AppointmentAck, AppointmentRequest, ConsultationType, LoginRequest, LoginResponse, PatientListParams,
    PatientPage, Professional, TimeSlot,
};

pub mod http;

pub use http::HttpApi;

/// Everything the dashboard asks of the scheduling backend.
#[async_trait]
pub trait SchedulingApi: Send + Sync {
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<LoginResponse>;

    async fn list_patients(&self, params: &PatientListParams) -> ApiResult<PatientPage>;

    async fn list_consultation_types(&self) -> ApiResult<Vec<ConsultationType>>;

    async fn professionals_by_consultation_type(&self, consultation_type_id: i64) -> ApiResult<Vec<Professional>>;

    /// ISO `YYYY-MM-DD` strings, as sent by the server.
    async fn professional_available_days(&self, professional_id: i64) -> ApiResult<Vec<String>>;

    async fn professional_available_slots(&self, professional_id: i64, date: NaiveDate) -> ApiResult<Vec<TimeSlot>>;

    async fn create_appointment(&self, request: &AppointmentRequest) -> ApiResult<AppointmentAck>;
}
