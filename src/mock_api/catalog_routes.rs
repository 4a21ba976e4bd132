// src/mock_api/catalog_routes.rs
//
// Consultation types, the professionals offering each, and their
// availability.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::get,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;

use super::MockState;
use super::auth_context::AuthContext;
use super::error::RouteError;
use crate::format::parse_date;
use crate::models::{ConsultationType, Professional, TimeSlot};

#[derive(Debug, Deserialize)]
pub struct SlotsQuery {
    pub date: Option<String>,
}

pub fn router() -> Router<MockState> {
    Router::new()
        .route("/consultationtype/list", get(list_consultation_types))
        .route("/consultationtype/{consultation_type_id}/professionals", get(list_professionals))
        .route("/professionals/{professional_id}/available-days", get(available_days))
        .route("/professionals/{professional_id}/available-slots", get(available_slots))
}

fn professional_not_found() -> RouteError {
    RouteError::NotFound("PROFESSIONAL_NOT_FOUND", "Professional not found".into())
}

/// Inactive types included; filtering is the client's call.
pub async fn list_consultation_types(
    State(state): State<MockState>,
    _auth: AuthContext,
) -> Json<Vec<ConsultationType>> {
    Json(state.data.read().await.consultation_types().to_vec())
}

pub async fn list_professionals(
    State(state): State<MockState>,
    _auth: AuthContext,
    Path(consultation_type_id): Path<i64>,
) -> Result<Json<Vec<Professional>>, RouteError> {
    state
        .data
        .read()
        .await
        .professionals_for(consultation_type_id)
        .map(Json)
        .ok_or_else(|| RouteError::NotFound("CONSULTATION_TYPE_NOT_FOUND", "Consultation type not found".into()))
}

pub async fn available_days(
    State(state): State<MockState>,
    _auth: AuthContext,
    Path(professional_id): Path<i64>,
) -> Result<Json<Vec<String>>, RouteError> {
    let today = Local::now().date_naive();
    let days = state
        .data
        .read()
        .await
        .available_days(professional_id, today)
        .ok_or_else(professional_not_found)?;
    Ok(Json(days.iter().map(|d| d.format("%Y-%m-%d").to_string()).collect()))
}

pub async fn available_slots(
    State(state): State<MockState>,
    _auth: AuthContext,
    Path(professional_id): Path<i64>,
    Query(q): Query<SlotsQuery>,
) -> Result<Json<Vec<TimeSlot>>, RouteError> {
    let date: NaiveDate = q
        .date
        .as_deref()
        .and_then(parse_date)
        .ok_or_else(|| RouteError::validation("date must be YYYY-MM-DD"))?;
    state
        .data
        .read()
        .await
        .available_slots(professional_id, date)
        .map(Json)
        .ok_or_else(professional_not_found)
}
