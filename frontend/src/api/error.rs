use shared::{ErrorResponse, SharedError};
use thiserror::Error;
use validator::ValidationErrors;

pub const SESSION_EXPIRED_CODE: &str = "SESSION_EXPIRED";
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired";

/// Everything a call through the API client can fail with.
///
/// [`status`](ApiError::status), [`message`](ApiError::message) and
/// [`code`](ApiError::code) give the uniform `{ status, message, code? }`
/// view hooks and forms work with.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Non-2xx answer from a service
    #[error("{message}")]
    Http {
        status: u16,
        message: String,
        code: Option<String>,
    },

    /// 401 that could not be recovered by refreshing the session
    #[error("Session expired")]
    SessionExpired,

    #[error("Network error: {0}")]
    Transport(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// 204 or empty body where the caller expected a value with no empty form
    #[error("Response had no content")]
    NoContent,

    #[error("Failed to serialize request body: {0}")]
    Encode(String),

    #[error("Invalid input: {0}")]
    Validation(String),
}

impl ApiError {
    pub fn from_response(status: u16, body: &str) -> Self {
        let ErrorResponse { message, code } = ErrorResponse::from_body(body);
        ApiError::Http {
            status,
            message,
            code,
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            ApiError::SessionExpired => Some(401),
            ApiError::NoContent => Some(204),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ApiError::Http { code, .. } => code.as_deref(),
            ApiError::SessionExpired => Some(SESSION_EXPIRED_CODE),
            ApiError::Transport(_) => Some("NETWORK_ERROR"),
            ApiError::Decode(_) => Some("DECODE_ERROR"),
            ApiError::NoContent => Some("NO_CONTENT"),
            ApiError::Encode(_) => Some("ENCODE_ERROR"),
            ApiError::Validation(_) => Some("VALIDATION_ERROR"),
        }
    }

    pub fn message(&self) -> String {
        match self {
            ApiError::Http { message, .. } => message.clone(),
            ApiError::SessionExpired => SESSION_EXPIRED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::SessionExpired)
    }

    /// Whether the pipeline shows this error as a toast. 401s are handled
    /// by the refresh path or the login redirect instead, and input errors
    /// belong to the form that produced them. An empty success answer is
    /// never an error for the user.
    pub fn is_user_visible(&self) -> bool {
        match self {
            ApiError::Http { status, .. } => *status != 401,
            ApiError::Transport(_) | ApiError::Decode(_) => true,
            ApiError::SessionExpired
            | ApiError::NoContent
            | ApiError::Encode(_)
            | ApiError::Validation(_) => false,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        ApiError::Validation(errors.to_string())
    }
}

impl From<SharedError> for ApiError {
    fn from(error: SharedError) -> Self {
        ApiError::Validation(error.to_string())
    }
}
