use thiserror::Error;

pub const GENERIC_SERVER_MESSAGE: &str = "Server error, please try again later";
pub const UNEXPECTED_MESSAGE: &str = "An unexpected error occurred, please try again later";

/// Every `SchedulingApi` call resolves to this; callers never inspect
/// `is_error` or status codes themselves.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Business failure: `is_error: true` in the body, or a non-success
    /// status carrying a message.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    #[error("transport error: {0}")]
    Transport(String),

    #[error("could not decode response: {0}")]
    Decode(String),

    #[error("unexpected error: {0}")]
    Unexpected(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        ApiError::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Text for the alert dialog. Server-supplied messages win; everything
    /// else collapses to a generic line.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Rejected { message, .. } if !message.trim().is_empty() => message.clone(),
            ApiError::Rejected { .. } | ApiError::Transport(_) | ApiError::Decode(_) => {
                GENERIC_SERVER_MESSAGE.to_string()
            }
            ApiError::Unauthorized(msg) | ApiError::Forbidden(msg) => msg.clone(),
            ApiError::Unexpected(_) => UNEXPECTED_MESSAGE.to_string(),
        }
    }

    pub fn is_auth(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_) | ApiError::Forbidden(_))
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ApiError::Decode(e.to_string())
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::Decode(e.to_string())
    }
}

/// Schema failure on one draft field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Wizard operations that a rendered UI would have disabled.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("operation belongs to step {expected}, wizard is on step {actual}")]
    WrongStep { expected: u8, actual: u8 },

    #[error("wizard is already finished")]
    Finished,

    #[error("choose an appointment type first")]
    NoAppointmentType,

    #[error("operation requires a consultation appointment")]
    NotConsultation,

    #[error("operation requires an exam appointment")]
    NotExam,

    #[error("choose a professional first")]
    NoProfessional,

    #[error("choose a date first")]
    NoDate,

    #[error("date {0} is not available")]
    DateUnavailable(chrono::NaiveDate),

    #[error("unknown {kind} id {id}")]
    UnknownId { kind: &'static str, id: i64 },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session file io: {0}")]
    Io(#[from] std::io::Error),

    #[error("session file json: {0}")]
    Json(#[from] serde_json::Error),
}
