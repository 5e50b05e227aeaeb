use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure category reported across the presentation boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Invalid,
    NotFound,
    Conflict,
    InvalidState,
    CapacityExceeded,
    Internal,
}

/// Errors raised by the operations engine
///
/// Every variant except `Internal` is a recoverable business outcome and leaves state
/// untouched. `Internal` means an invariant the engine maintains itself was found broken.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    Invalid(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    #[error("internal inconsistency: {0}")]
    Internal(String),
}

pub type EngineResult<T> = Result<T, EngineError>;

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::Invalid(_) => ErrorKind::Invalid,
            EngineError::NotFound(_) => ErrorKind::NotFound,
            EngineError::Conflict(_) => ErrorKind::Conflict,
            EngineError::InvalidState(_) => ErrorKind::InvalidState,
            EngineError::CapacityExceeded(_) => ErrorKind::CapacityExceeded,
            EngineError::Internal(_) => ErrorKind::Internal,
        }
    }

    /// Human-readable detail without the category prefix
    pub fn detail(&self) -> &str {
        match self {
            EngineError::Invalid(detail)
            | EngineError::NotFound(detail)
            | EngineError::Conflict(detail)
            | EngineError::InvalidState(detail)
            | EngineError::CapacityExceeded(detail)
            | EngineError::Internal(detail) => detail,
        }
    }

    /// Build an `Internal` error and log it, since it indicates a defect
    pub(crate) fn internal(detail: impl Into<String>) -> Self {
        let detail = detail.into();
        log::error!("[Engine] invariant violated: {}", detail);
        EngineError::Internal(detail)
    }
}

/// Plain failure record handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Failure {
    pub kind: ErrorKind,
    pub detail: String,
}

impl From<&EngineError> for Failure {
    fn from(err: &EngineError) -> Self {
        Self {
            kind: err.kind(),
            detail: err.detail().to_string(),
        }
    }
}

impl From<EngineError> for Failure {
    fn from(err: EngineError) -> Self {
        Failure::from(&err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_and_detail() {
        let err = EngineError::CapacityExceeded("waiter already serves 4 tables".to_string());
        assert_eq!(err.kind(), ErrorKind::CapacityExceeded);
        assert_eq!(err.detail(), "waiter already serves 4 tables");
        assert_eq!(err.to_string(), "capacity exceeded: waiter already serves 4 tables");
    }

    #[test]
    fn test_failure_from_error() {
        let failure = Failure::from(EngineError::NotFound("table 9".to_string()));
        assert_eq!(failure.kind, ErrorKind::NotFound);
        assert_eq!(failure.detail, "table 9");
    }

    #[test]
    fn test_failure_wire_format() {
        let failure = Failure::from(EngineError::InvalidState("order 3 is READY".to_string()));
        let json = serde_json::to_string(&failure).unwrap();
        assert_eq!(json, r#"{"kind":"invalid_state","detail":"order 3 is READY"}"#);
    }
}
