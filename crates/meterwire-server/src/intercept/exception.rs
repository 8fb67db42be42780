use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use bytes::Bytes;
use meterwire_core::{ExceptionFilter, Meter};

use super::{Proceed, ReaderInterceptor, WriterInterceptor};
use crate::fault::Fault;

/// Marks a meter for every fault whose cause passes the filter.
///
/// Read faults are returned unchanged. Write faults are consumed: the
/// interceptor answers with the fault's own error response, so the client
/// still sees the failure.
pub struct ExceptionMeteredInterceptor {
    meter: Arc<Meter>,
    cause: ExceptionFilter,
}

impl ExceptionMeteredInterceptor {
    pub fn new(meter: Arc<Meter>, cause: ExceptionFilter) -> Self {
        Self { meter, cause }
    }

    fn observe(&self, fault: &Fault) {
        if self.cause.matches(fault.cause()) {
            self.meter.mark();
            tracing::debug!(cause = self.cause.type_name(), status = %fault.status(), "exception metered");
        }
    }
}

#[async_trait]
impl ReaderInterceptor for ExceptionMeteredInterceptor {
    async fn around_read_from(&self, proceed: Proceed<'_, Bytes>) -> Result<Bytes, Fault> {
        proceed.await.map_err(|fault| {
            self.observe(&fault);
            fault
        })
    }
}

#[async_trait]
impl WriterInterceptor for ExceptionMeteredInterceptor {
    async fn around_write_to(&self, proceed: Proceed<'_, Response>) -> Result<Response, Fault> {
        match proceed.await {
            Ok(resp) => Ok(resp),
            Err(fault) => {
                self.observe(&fault);
                Ok(fault.render())
            }
        }
    }
}
