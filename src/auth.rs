// src/auth.rs
//
// Client-side session: sign in against the API, remember who is signed in,
// and answer role checks for the screens.

use std::sync::Arc;

use tracing::{info, warn};

use crate::api::SchedulingApi;
use crate::error::{ApiError, SessionError};
use crate::models::{LoginRequest, User};
use crate::session::SessionStore;
use crate::store::{DASHBOARD_PATH, LOGIN_PATH, UiState};

pub const LOGIN_FAILED_TITLE: &str = "Login failed";
pub const LOGIN_FAILED_MESSAGE: &str = "Invalid e-mail or password";

pub struct AuthSession {
    session: Arc<dyn SessionStore>,
}

impl AuthSession {
    pub fn new(session: Arc<dyn SessionStore>) -> Self {
        Self { session }
    }

    pub fn user(&self) -> Option<User> {
        self.session.user()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.token().is_some()
    }

    /// No required roles means anyone signed in passes; otherwise any
    /// overlap is enough.
    pub fn has_permission(&self, required_roles: &[&str]) -> bool {
        if required_roles.is_empty() {
            return true;
        }
        self.user()
            .is_some_and(|u| u.roles.iter().any(|r| required_roles.contains(&r.as_str())))
    }

    /// Returns whether the user is now signed in. Failures end up in the
    /// alert, never as an `Err`.
    pub async fn login(&self, api: &dyn SchedulingApi, ui: &mut UiState, email: &str, password: &str) -> bool {
        let credentials = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };

        ui.loading.set();
        let result = api.login(&credentials).await;
        ui.loading.clear();

        match result {
            Ok(resp) => {
                if let Err(e) = self.session.save(&resp.token, &resp.user) {
                    warn!(error = %e, "could not persist session");
                    ui.fail(LOGIN_FAILED_TITLE, "Could not store the session");
                    return false;
                }
                info!(email = %resp.user.email, "signed in");
                ui.navigate(DASHBOARD_PATH);
                true
            }
            Err(ApiError::Unauthorized(_)) => {
                ui.fail(LOGIN_FAILED_TITLE, LOGIN_FAILED_MESSAGE);
                false
            }
            Err(ApiError::Rejected { message, .. }) => {
                let message = if message.trim().is_empty() {
                    LOGIN_FAILED_MESSAGE.to_string()
                } else {
                    message
                };
                ui.fail(LOGIN_FAILED_TITLE, message);
                false
            }
            Err(e) => {
                ui.report(LOGIN_FAILED_TITLE, &e);
                false
            }
        }
    }

    pub fn logout(&self, ui: &mut UiState) -> Result<(), SessionError> {
        self.session.clear()?;
        info!("signed out");
        ui.navigate(LOGIN_PATH);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use chrono::NaiveDate;

    use super::*;
    use crate::error::ApiResult;
    use crate::models::{
        AppointmentAck, AppointmentRequest, ConsultationType, LoginResponse, PatientListParams, PatientPage,
        Professional, TimeSlot,
    };
    use crate::session::MemorySessionStore;
    use crate::store::AlertKind;

    struct LoginOnly;

    #[async_trait]
    impl SchedulingApi for LoginOnly {
        async fn login(&self, credentials: &LoginRequest) -> ApiResult<LoginResponse> {
            if credentials.password == "secret" {
                Ok(LoginResponse {
                    token: "tok".into(),
                    user: User {
                        full_name: "Ana Lima".into(),
                        email: credentials.email.clone(),
                        roles: vec!["receptionist".into()],
                    },
                })
            } else {
                Err(ApiError::rejected(400, "Credenciais inválidas"))
            }
        }

        async fn list_patients(&self, _: &PatientListParams) -> ApiResult<PatientPage> {
            unimplemented!()
        }

        async fn list_consultation_types(&self) -> ApiResult<Vec<ConsultationType>> {
            unimplemented!()
        }

        async fn professionals_by_consultation_type(&self, _: i64) -> ApiResult<Vec<Professional>> {
            unimplemented!()
        }

        async fn professional_available_days(&self, _: i64) -> ApiResult<Vec<String>> {
            unimplemented!()
        }

        async fn professional_available_slots(&self, _: i64, _: NaiveDate) -> ApiResult<Vec<TimeSlot>> {
            unimplemented!()
        }

        async fn create_appointment(&self, _: &AppointmentRequest) -> ApiResult<AppointmentAck> {
            unimplemented!()
        }
    }

    #[tokio::test]
    async fn test_login_persists_and_navigates() {
        let auth = AuthSession::new(Arc::new(MemorySessionStore::new()));
        let mut ui = UiState::default();

        assert!(auth.login(&LoginOnly, &mut ui, " ana@clinic.local ", "secret").await);

        assert!(auth.is_authenticated());
        assert_eq!(auth.user().map(|u| u.email), Some("ana@clinic.local".to_string()));
        assert_eq!(ui.location(), DASHBOARD_PATH);
        assert!(!ui.loading.is_active());
    }

    #[tokio::test]
    async fn test_login_failure_alerts() {
        let auth = AuthSession::new(Arc::new(MemorySessionStore::new()));
        let mut ui = UiState::default();

        assert!(!auth.login(&LoginOnly, &mut ui, "ana@clinic.local", "wrong").await);

        let alert = ui.alert.current().expect("alert shown");
        assert_eq!(alert.kind, AlertKind::Error);
        assert_eq!(alert.title, LOGIN_FAILED_TITLE);
        assert_eq!(alert.message, "Credenciais inválidas");
        assert!(!auth.is_authenticated());
        assert!(ui.history().is_empty());
    }

    #[tokio::test]
    async fn test_logout_clears_and_goes_to_login() {
        let auth = AuthSession::new(Arc::new(MemorySessionStore::new()));
        let mut ui = UiState::default();
        auth.login(&LoginOnly, &mut ui, "ana@clinic.local", "secret").await;

        auth.logout(&mut ui).unwrap();

        assert!(!auth.is_authenticated());
        assert_eq!(auth.user(), None);
        assert_eq!(ui.location(), LOGIN_PATH);
    }

    #[tokio::test]
    async fn test_has_permission() {
        let auth = AuthSession::new(Arc::new(MemorySessionStore::new()));
        assert!(auth.has_permission(&[]));
        assert!(!auth.has_permission(&["admin"]));

        let mut ui = UiState::default();
        auth.login(&LoginOnly, &mut ui, "ana@clinic.local", "secret").await;
        assert!(auth.has_permission(&["admin", "receptionist"]));
        assert!(!auth.has_permission(&["admin"]));
    }
}
