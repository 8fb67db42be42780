//! Shared error type across meterwire crates.

use thiserror::Error;

/// Stable error codes surfaced to operators and HTTP clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid input / malformed configuration.
    BadRequest,
    /// A metric name could not be resolved.
    InvalidName,
    /// A metric name is already bound to another metric kind.
    Conflict,
    /// Unsupported config version.
    UnsupportedVersion,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in logs and responses.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::BadRequest => "BAD_REQUEST",
            ClientCode::InvalidName => "INVALID_NAME",
            ClientCode::Conflict => "CONFLICT",
            ClientCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, MeterwireError>;

/// Unified error type used by core and server.
#[derive(Debug, Error)]
pub enum MeterwireError {
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("invalid metric name: {0}")]
    InvalidName(String),
    #[error("metric {name} is already registered as a {existing}")]
    MetricTypeConflict {
        name: String,
        existing: &'static str,
    },
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("internal: {0}")]
    Internal(String),
}

impl MeterwireError {
    /// Map internal error to a stable code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            MeterwireError::BadRequest(_) => ClientCode::BadRequest,
            MeterwireError::InvalidName(_) => ClientCode::InvalidName,
            MeterwireError::MetricTypeConflict { .. } => ClientCode::Conflict,
            MeterwireError::UnsupportedVersion => ClientCode::UnsupportedVersion,
            MeterwireError::Internal(_) => ClientCode::Internal,
        }
    }
}
