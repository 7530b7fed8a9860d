use thiserror::Error;

/// Failures local to a single route submission. None of them is fatal to the caller.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("No orders selected, select at least one order")]
    EmptySelection,

    #[error("Routing service request failed: {0}")]
    TransportError(String),

    #[error("Unexpected routing service response: {0}")]
    MalformedResponse(String),

    #[error("A route submission is already in progress")]
    SubmissionInProgress,
}

impl From<reqwest::Error> for RouteError {
    fn from(error: reqwest::Error) -> Self {
        RouteError::TransportError(error.to_string())
    }
}
