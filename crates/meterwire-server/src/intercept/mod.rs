//! Read/write interceptors and the per-method chain that runs them.
//!
//! An interceptor receives the rest of the phase as a boxed `proceed` future
//! and decides what to do around it. The first interceptor registered for a
//! method is the outermost one.

mod exception;
mod metered;
mod timed;

use std::sync::Arc;

use async_trait::async_trait;
use axum::response::Response;
use bytes::Bytes;
use futures_util::future::BoxFuture;

use crate::fault::Fault;

pub use exception::ExceptionMeteredInterceptor;
pub use metered::MeteredInterceptor;
pub use timed::TimedInterceptor;

/// Remainder of a phase, from the next interceptor down to the handler.
pub type Proceed<'a, T> = BoxFuture<'a, Result<T, Fault>>;

/// Runs around reading the request entity.
#[async_trait]
pub trait ReaderInterceptor: Send + Sync {
    async fn around_read_from(&self, proceed: Proceed<'_, Bytes>) -> Result<Bytes, Fault>;
}

/// Runs around the resource method producing and writing its response.
#[async_trait]
pub trait WriterInterceptor: Send + Sync {
    async fn around_write_to(&self, proceed: Proceed<'_, Response>) -> Result<Response, Fault>;
}

/// Ordered interceptors bound to one resource method.
#[derive(Default, Clone)]
pub struct InterceptorChain {
    readers: Vec<Arc<dyn ReaderInterceptor>>,
    writers: Vec<Arc<dyn WriterInterceptor>>,
}

impl InterceptorChain {
    pub(crate) fn new(
        readers: Vec<Arc<dyn ReaderInterceptor>>,
        writers: Vec<Arc<dyn WriterInterceptor>>,
    ) -> Self {
        Self { readers, writers }
    }

    pub fn is_empty(&self) -> bool {
        self.readers.is_empty() && self.writers.is_empty()
    }

    pub fn reader_count(&self) -> usize {
        self.readers.len()
    }

    pub fn writer_count(&self) -> usize {
        self.writers.len()
    }

    /// Wrap `inner` in every reader, first registered outermost.
    pub fn read<'a>(&'a self, inner: Proceed<'a, Bytes>) -> Proceed<'a, Bytes> {
        self.readers
            .iter()
            .rev()
            .fold(inner, |next, i| i.around_read_from(next))
    }

    /// Wrap `inner` in every writer, first registered outermost.
    pub fn write<'a>(&'a self, inner: Proceed<'a, Response>) -> Proceed<'a, Response> {
        self.writers
            .iter()
            .rev()
            .fold(inner, |next, i| i.around_write_to(next))
    }
}
