// src/api/http.rs

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use super::SchedulingApi;
use crate::config::Config;
use crate::error::{ApiError, ApiResult, GENERIC_SERVER_MESSAGE};
use crate::models::{
    AppointmentAck, AppointmentRequest, ConsultationType, LoginRequest, LoginResponse, PatientListParams,
    PatientPage, Professional, TimeSlot,
};
use crate::session::SessionStore;

/// reqwest-backed client. Attaches `Authorization: Bearer` whenever the
/// session store holds a token, and folds status codes and `is_error`
/// bodies into `ApiError`.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    session: Arc<dyn SessionStore>,
}

impl HttpApi {
    pub fn new(base_url: &str, timeout: Duration, session: Arc<dyn SessionStore>) -> ApiResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Unexpected(format!("http client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn from_config(cfg: &Config, session: Arc<dyn SessionStore>) -> ApiResult<Self> {
        Self::new(&cfg.api_base_url, cfg.api_timeout, session)
    }

    pub fn session(&self) -> &Arc<dyn SessionStore> {
        &self.session
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}/{}", self.base_url, path.trim_start_matches('/'));
        let req = self.client.request(method, url);
        match self.session.token() {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn send(&self, method: Method, path: &str, req: RequestBuilder) -> ApiResult<Value> {
        debug!(%method, path, "api request");
        let resp = req.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;
        debug!(%method, path, status = status.as_u16(), "api response");
        classify(status, &bytes)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let req = self.request(Method::GET, path);
        payload(self.send(Method::GET, path, req).await?)
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> ApiResult<Value> {
        let req = self.request(Method::POST, path).json(body);
        self.send(Method::POST, path, req).await
    }
}

/// Status and envelope rules shared by every endpoint.
pub(crate) fn classify(status: StatusCode, bytes: &[u8]) -> ApiResult<Value> {
    let body: Option<Value> = if bytes.iter().all(u8::is_ascii_whitespace) {
        Some(Value::Null)
    } else {
        serde_json::from_slice(bytes).ok()
    };
    let message = body
        .as_ref()
        .and_then(|b| b.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string);

    if status == StatusCode::UNAUTHORIZED {
        return Err(ApiError::Unauthorized(message.unwrap_or_else(|| "Session expired".into())));
    }
    if status == StatusCode::FORBIDDEN {
        return Err(ApiError::Forbidden(message.unwrap_or_else(|| "Access denied".into())));
    }

    let is_error = body
        .as_ref()
        .and_then(|b| b.get("is_error"))
        .and_then(Value::as_bool)
        .unwrap_or(false);

    if !status.is_success() || is_error {
        return Err(ApiError::rejected(
            status.as_u16(),
            message.unwrap_or_else(|| GENERIC_SERVER_MESSAGE.into()),
        ));
    }

    body.ok_or_else(|| ApiError::Decode(format!("non-JSON body with status {status}")))
}

/// Payload either at the top level or under `data`.
pub(crate) fn payload<T: DeserializeOwned>(value: Value) -> ApiResult<T> {
    let top_level_err = match T::deserialize(&value) {
        Ok(v) => return Ok(v),
        Err(e) => e,
    };
    match value.get("data") {
        Some(data) if !data.is_null() => T::deserialize(data).map_err(ApiError::from),
        _ => Err(top_level_err.into()),
    }
}

#[async_trait]
impl SchedulingApi for HttpApi {
    async fn login(&self, credentials: &LoginRequest) -> ApiResult<LoginResponse> {
        payload(self.post("login", credentials).await?)
    }

    async fn list_patients(&self, params: &PatientListParams) -> ApiResult<PatientPage> {
        let req = self.request(Method::GET, "patients").query(params);
        payload(self.send(Method::GET, "patients", req).await?)
    }

    async fn list_consultation_types(&self) -> ApiResult<Vec<ConsultationType>> {
        self.get("consultationtype/list").await
    }

    async fn professionals_by_consultation_type(&self, consultation_type_id: i64) -> ApiResult<Vec<Professional>> {
        self.get(&format!("consultationtype/{consultation_type_id}/professionals"))
            .await
    }

    async fn professional_available_days(&self, professional_id: i64) -> ApiResult<Vec<String>> {
        self.get(&format!("professionals/{professional_id}/available-days"))
            .await
    }

    async fn professional_available_slots(&self, professional_id: i64, date: NaiveDate) -> ApiResult<Vec<TimeSlot>> {
        let path = format!("professionals/{professional_id}/available-slots");
        let req = self
            .request(Method::GET, &path)
            .query(&[("date", date.format("%Y-%m-%d").to_string())]);
        payload(self.send(Method::GET, &path, req).await?)
    }

    async fn create_appointment(&self, request: &AppointmentRequest) -> ApiResult<AppointmentAck> {
        let value = self.post("appointments/create", request).await?;
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let appointment_id = value
            .pointer("/data/appointment_id")
            .or_else(|| value.get("appointment_id"))
            .and_then(Value::as_i64);
        Ok(AppointmentAck {
            message,
            appointment_id,
        })
    }
}
