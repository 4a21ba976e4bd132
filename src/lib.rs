//! Headless client for the health-scheduling dashboard: the new-appointment
//! wizard, table and pagination view-models, session handling, and an axum
//! stub of the scheduling API for development and tests.

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod format;
pub mod mock_api;
pub mod models;
pub mod pagination;
pub mod session;
pub mod store;
pub mod table;
pub mod wizard;

pub use api::{HttpApi, SchedulingApi};
pub use config::Config;
pub use error::{ApiError, ApiResult};
pub use store::UiState;
pub use wizard::WizardController;
