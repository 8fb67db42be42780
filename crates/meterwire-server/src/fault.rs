//! Failure type for resource methods and entity reads.
//!
//! A handler returning `Err(Fault)` produces an error response that also
//! carries the fault in its extensions, so writer interceptors observe the
//! failure instead of an ordinary response.

use std::error::Error;
use std::fmt;
use std::io;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

type Cause = Arc<dyn Error + Send + Sync + 'static>;

/// HTTP status plus the error that caused it.
#[derive(Debug, Clone)]
pub struct Fault {
    status: StatusCode,
    cause: Cause,
}

impl Fault {
    pub fn new(status: StatusCode, cause: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self {
            status,
            cause: Arc::from(cause.into()),
        }
    }

    pub fn internal(cause: impl Into<Box<dyn Error + Send + Sync>>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, cause)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The underlying error, the one exception filters are matched against.
    pub fn cause(&self) -> &(dyn Error + Send + Sync + 'static) {
        &*self.cause
    }

    /// Render as a plain error response without tagging it as a fault.
    pub fn render(&self) -> Response {
        (self.status, self.cause.to_string()).into_response()
    }

    /// Pull a fault out of a handler response, if the handler failed.
    pub fn take_from(mut resp: Response) -> Result<Response, Fault> {
        match resp.extensions_mut().remove::<Fault>() {
            Some(fault) => Err(fault),
            None => Ok(resp),
        }
    }
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.status, self.cause)
    }
}

impl Error for Fault {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.cause())
    }
}

impl IntoResponse for Fault {
    fn into_response(self) -> Response {
        let mut resp = self.render();
        resp.extensions_mut().insert(self);
        resp
    }
}

impl From<io::Error> for Fault {
    fn from(e: io::Error) -> Self {
        Self::internal(e)
    }
}
