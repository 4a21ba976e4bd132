use axum::{Json, Router, extract::State, routing::post};
use chrono::Utc;
use serde::Serialize;
use tracing::info;

use super::MockState;
use super::auth_context::AuthContext;
use super::credentials::verify_password;
use super::error::RouteError;
use crate::models::{Envelope, LoginRequest, LoginResponse};

/// `{is_error, message, token, user}`: the session sits beside the envelope
/// flags rather than under `data`.
#[derive(Debug, Serialize)]
pub struct LoginBody {
    pub is_error: bool,
    pub message: String,
    #[serde(flatten)]
    pub session: LoginResponse,
}

pub fn router() -> Router<MockState> {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
}

pub async fn login(
    State(state): State<MockState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginBody>, RouteError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(RouteError::validation("email and password are required"));
    }

    let mut data = state.data.write().await;
    let user = data
        .find_user_by_email(&req.email)
        .cloned()
        .ok_or_else(RouteError::invalid_credentials)?;

    if !user.active {
        return Err(RouteError::Forbidden("FORBIDDEN", "Account is disabled".into()));
    }
    if !verify_password(&req.password, &user.password_hash) {
        return Err(RouteError::invalid_credentials());
    }

    let token = data.open_session(user.id, Utc::now());
    info!(user_id = user.id, "login");

    Ok(Json(LoginBody {
        is_error: false,
        message: "Login successful".into(),
        session: LoginResponse {
            token,
            user: user.profile(),
        },
    }))
}

pub async fn logout(State(state): State<MockState>, auth: AuthContext) -> Json<Envelope<()>> {
    state.data.write().await.revoke_session(&auth.token_hash);
    Json(Envelope {
        is_error: false,
        message: "Logged out".into(),
        data: None,
    })
}
