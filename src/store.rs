// src/store.rs
//
// View-state shared by every screen: the alert dialog, the global loading
// indicator and the current location. Owned by the caller and handed to
// operations as `&mut UiState`; there is no global instance.

use tracing::{error, info, warn};

use crate::error::{ApiError, UNEXPECTED_MESSAGE};

pub const DASHBOARD_PATH: &str = "/dashboard";
pub const LOGIN_PATH: &str = "/login";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    Error,
    Success,
    Warning,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub kind: AlertKind,
    pub message: String,
}

/// Single slot: showing a new alert replaces whatever was open.
#[derive(Debug, Default, Clone)]
pub struct AlertState {
    current: Option<Alert>,
}

impl AlertState {
    pub fn show(&mut self, title: impl Into<String>, kind: AlertKind, message: impl Into<String>) {
        self.current = Some(Alert {
            title: title.into(),
            kind,
            message: message.into(),
        });
    }

    pub fn hide(&mut self) {
        self.current = None;
    }

    pub fn is_open(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&Alert> {
        self.current.as_ref()
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct LoadingState {
    active: bool,
}

impl LoadingState {
    pub fn set(&mut self) {
        self.active = true;
    }

    pub fn clear(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Where 401 and 403 responses send the user. Kept configurable because the
/// two targets have historically differed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedirectPolicy {
    pub on_unauthorized: String,
    pub on_forbidden: String,
}

impl Default for RedirectPolicy {
    fn default() -> Self {
        Self {
            on_unauthorized: LOGIN_PATH.to_string(),
            on_forbidden: DASHBOARD_PATH.to_string(),
        }
    }
}

/// Navigations kept in `UiState::history`; older ones are dropped.
pub const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Clone)]
pub struct UiState {
    pub alert: AlertState,
    pub loading: LoadingState,
    pub redirects: RedirectPolicy,
    location: String,
    history: Vec<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new(RedirectPolicy::default())
    }
}

impl UiState {
    pub fn new(redirects: RedirectPolicy) -> Self {
        Self {
            alert: AlertState::default(),
            loading: LoadingState::default(),
            redirects,
            location: "/".to_string(),
            history: Vec::new(),
        }
    }

    /// Starts at `path` without recording a navigation.
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.location = path.into();
        self
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// The last `HISTORY_LIMIT` navigations, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn navigate(&mut self, path: impl Into<String>) {
        let path = path.into();
        info!(from = %self.location, to = %path, "navigate");
        if self.history.len() == HISTORY_LIMIT {
            self.history.remove(0);
        }
        self.history.push(path.clone());
        self.location = path;
    }

    pub fn success(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.alert.show(title, AlertKind::Success, message);
    }

    pub fn fail(&mut self, title: impl Into<String>, message: impl Into<String>) {
        self.alert.show(title, AlertKind::Error, message);
    }

    /// Routes an API failure: auth failures redirect without an alert,
    /// everything else opens the error dialog.
    pub fn report(&mut self, title: &str, err: &ApiError) {
        match err {
            ApiError::Unauthorized(_) => {
                warn!(error = %err, "session rejected, redirecting");
                let target = self.redirects.on_unauthorized.clone();
                self.navigate(target);
            }
            ApiError::Forbidden(_) => {
                warn!(error = %err, "access forbidden, redirecting");
                let target = self.redirects.on_forbidden.clone();
                self.navigate(target);
            }
            ApiError::Unexpected(detail) => {
                error!(%detail, "unexpected failure");
                self.fail(title, UNEXPECTED_MESSAGE);
            }
            _ => {
                warn!(error = %err, "request failed");
                self.fail(title, err.user_message());
            }
        }
    }
}
