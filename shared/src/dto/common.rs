use serde::{Deserialize, Serialize};

/// Message shown when an error body cannot be parsed
pub const GENERIC_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Common error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human readable error message
    pub message: String,
    /// Machine readable error code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    /// Parses an error body, falling back to the generic message.
    pub fn from_body(body: &str) -> Self {
        serde_json::from_str(body).unwrap_or_else(|_| Self {
            message: GENERIC_ERROR_MESSAGE.to_string(),
            code: None,
        })
    }
}
