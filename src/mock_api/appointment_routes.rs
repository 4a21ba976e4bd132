use axum::{Json, Router, extract::State, routing::post};
use serde::Serialize;
use tracing::info;

use super::MockState;
use super::auth_context::AuthContext;
use super::error::RouteError;
use crate::models::{AppointmentRequest, Envelope};

#[derive(Debug, Serialize)]
pub struct CreatedAppointment {
    pub appointment_id: i64,
}

pub fn router() -> Router<MockState> {
    Router::new().route("/appointments/create", post(create_appointment))
}

pub async fn create_appointment(
    State(state): State<MockState>,
    auth: AuthContext,
    Json(req): Json<AppointmentRequest>,
) -> Result<Json<Envelope<CreatedAppointment>>, RouteError> {
    auth.ensure_staff()?;

    let appointment_id = state.data.write().await.book(auth.user_id, &req)?;
    info!(
        appointment_id,
        patient_id = req.patient_id,
        slot_id = req.slot_id,
        "appointment created"
    );

    Ok(Json(Envelope::ok(
        "Appointment created successfully",
        CreatedAppointment { appointment_id },
    )))
}
