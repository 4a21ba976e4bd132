// src/mock_api/mod.rs
//
// Development stand-in for the scheduling API. Serves every endpoint the
// client calls from in-memory data; `mock-api` runs it standalone and the
// integration tests spawn it on an ephemeral port.

use std::sync::Arc;

use axum::Router;
use axum::http::header;
use chrono::Local;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod appointment_routes;
pub mod auth_context;
pub mod auth_routes;
pub mod catalog_routes;
pub mod credentials;
pub mod data;
pub mod error;
pub mod patient_routes;

use crate::config::Config;
use data::MockData;

#[derive(Clone)]
pub struct MockState {
    pub data: Arc<RwLock<MockData>>,
}

impl MockState {
    pub fn new(data: MockData) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
        }
    }

    /// Seeded from today's date with the configured admin login.
    pub fn from_config(cfg: &Config) -> anyhow::Result<Self> {
        let data = MockData::seeded(
            &cfg.mock_admin_email,
            &cfg.mock_admin_password,
            Local::now().date_naive(),
        )?;
        Ok(Self::new(data))
    }
}

/// Everything under `/api`, matching the client's default base URL.
pub fn router(state: MockState) -> Router {
    let api = Router::new()
        .merge(auth_routes::router())
        .merge(patient_routes::router())
        .merge(catalog_routes::router())
        .merge(appointment_routes::router());

    // browser clients on another origin need the preflight answered
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT]);

    Router::new()
        .nest("/api", api)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
