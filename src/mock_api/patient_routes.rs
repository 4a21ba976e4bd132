use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;

use super::MockState;
use super::auth_context::AuthContext;
use crate::models::PatientPage;

#[derive(Debug, Deserialize)]
pub struct PatientListQuery {
    pub page: Option<u32>,
    pub limit_per_page: Option<u32>,
    pub cpf: Option<String>,
}

pub fn router() -> Router<MockState> {
    Router::new().route("/patients", get(list_patients))
}

pub async fn list_patients(
    State(state): State<MockState>,
    _auth: AuthContext,
    Query(q): Query<PatientListQuery>,
) -> Json<PatientPage> {
    let data = state.data.read().await;
    Json(data.list_patients(
        q.page.unwrap_or(1),
        q.limit_per_page.unwrap_or(10),
        q.cpf.as_deref(),
    ))
}
