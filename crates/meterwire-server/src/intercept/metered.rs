use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use meterwire_core::Meter;

use super::{Proceed, WriterInterceptor};
use crate::fault::Fault;

/// Marks a meter before every response write.
pub struct MeteredInterceptor {
    meter: Arc<Meter>,
}

impl MeteredInterceptor {
    pub fn new(meter: Arc<Meter>) -> Self {
        Self { meter }
    }
}

#[async_trait]
impl WriterInterceptor for MeteredInterceptor {
    async fn around_write_to(&self, proceed: Proceed<'_, Response>) -> Result<Response, Fault> {
        self.meter.mark();
        proceed.await
    }
}
