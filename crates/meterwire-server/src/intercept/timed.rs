use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use meterwire_core::Timer;

use super::{Proceed, WriterInterceptor};
use crate::fault::Fault;

/// Times every response write.
pub struct TimedInterceptor {
    timer: Arc<Timer>,
}

impl TimedInterceptor {
    pub fn new(timer: Arc<Timer>) -> Self {
        Self { timer }
    }
}

#[async_trait]
impl WriterInterceptor for TimedInterceptor {
    async fn around_write_to(&self, proceed: Proceed<'_, Response>) -> Result<Response, Fault> {
        // records on drop: success, fault, or the request future being dropped
        let _ctx = self.timer.time();
        proceed.await
    }
}
