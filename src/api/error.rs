//! API Error Types
//!
//! Every wrapper returns [`ApiResult`]. Errors carry the underlying response
//! status and body unmodified; callers match on [`ApiError::kind`] rather
//! than inspecting message strings.

use crate::forms::ValidationErrors;
use crate::session::StorageError;
use thiserror::Error;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// No response was received (connect failure, reset, timeout, bad URL)
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-2xx status
    #[error("API error {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body did not match the expected shape
    #[error("Invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// Client-side validation blocked the request; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The session store could not be read or written
    #[error("Session storage error: {0}")]
    Storage(#[from] StorageError),

    /// A newer request for the same logical operation replaced this one
    #[error("Request superseded by a newer '{0}' request")]
    Superseded(String),
}

/// Coarse classification callers branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Unauthorized,
    Rejected,
    Decode,
    Validation,
    Storage,
    Cancelled,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_) => ErrorKind::Network,
            ApiError::Status { status: 401, .. } => ErrorKind::Unauthorized,
            ApiError::Status { .. } => ErrorKind::Rejected,
            ApiError::Decode(_) => ErrorKind::Decode,
            ApiError::Validation(_) => ErrorKind::Validation,
            ApiError::Storage(_) => ErrorKind::Storage,
            ApiError::Superseded(_) => ErrorKind::Cancelled,
        }
    }

    /// HTTP status, when the server responded
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Response body, when the server responded
    pub fn body(&self) -> Option<&str> {
        match self {
            ApiError::Status { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The server explicitly rejected the credential
    pub fn is_auth_failure(&self) -> bool {
        self.kind() == ErrorKind::Unauthorized
    }

    /// Short message suitable for showing to an end user
    pub fn user_message(&self) -> String {
        match self.kind() {
            ErrorKind::Network => "Could not reach the server".to_string(),
            ErrorKind::Unauthorized => "Your session has expired, please log in again".to_string(),
            ErrorKind::Rejected => format!(
                "The server rejected the request ({})",
                self.status().unwrap_or_default()
            ),
            ErrorKind::Decode => "The server sent an unexpected response".to_string(),
            ErrorKind::Validation => self.to_string(),
            ErrorKind::Storage => "Could not access the saved session".to_string(),
            ErrorKind::Cancelled => "Request was replaced by a newer one".to_string(),
        }
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
