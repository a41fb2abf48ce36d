use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    Unauthorized,
    NotFound,
    Validation,
    /// The request was well formed but the backend refused it, e.g. a
    /// duplicate mobile number.
    Rejected,
    Internal,
}

impl ErrorCode {
    /// Best guess for a failed response whose body is not an [`ApiError`].
    pub fn from_http_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Unauthorized,
            404 => Self::NotFound,
            400 | 422 => Self::Validation,
            409 => Self::Rejected,
            _ => Self::Internal,
        }
    }
}

/// Error body the backend sends with a non-success HTTP status. Doubles as
/// the error value surfaced to callers.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code:?}: {message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.code == ErrorCode::Unauthorized
    }
}

#[cfg(test)]
#[path = "tests/error_tests.rs"]
mod tests;
