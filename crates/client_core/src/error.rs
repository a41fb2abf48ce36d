use shared::error::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("backend connection not available")]
    NotConnected,
    /// The backend refused the operation and said why.
    #[error("{0}")]
    Rejected(String),
    #[error("{0}")]
    Validation(String),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("invalid backend payload: {0}")]
    Payload(#[from] serde_json::Error),
    #[error("invalid backend url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api(err) if err.is_unauthorized())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no route matches {0}")]
    NotFound(String),
    #[error("route {0} was allowed without the session it needs")]
    AccessMismatch(String),
    #[error("redirect loop while resolving {0}")]
    RedirectLoop(String),
}
