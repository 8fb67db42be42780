//! Startup-time features that bind interceptors to resource methods.

mod metrics;

use std::sync::Arc;

use meterwire_core::{ResourceInfo, Result};

use crate::intercept::{InterceptorChain, ReaderInterceptor, WriterInterceptor};

pub use metrics::MetricsFeature;

/// Inspects each resource method once, before the router is built.
pub trait DynamicFeature: Send + Sync {
    fn configure(&self, resource: &ResourceInfo, ctx: &mut FeatureContext) -> Result<()>;
}

/// Interceptors collected for one resource method.
#[derive(Default)]
pub struct FeatureContext {
    readers: Vec<Arc<dyn ReaderInterceptor>>,
    writers: Vec<Arc<dyn WriterInterceptor>>,
}

impl FeatureContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_reader(&mut self, interceptor: Arc<dyn ReaderInterceptor>) {
        self.readers.push(interceptor);
    }

    pub fn register_writer(&mut self, interceptor: Arc<dyn WriterInterceptor>) {
        self.writers.push(interceptor);
    }

    /// Register an interceptor on both phases.
    pub fn register<I>(&mut self, interceptor: Arc<I>)
    where
        I: ReaderInterceptor + WriterInterceptor + 'static,
    {
        self.register_reader(interceptor.clone());
        self.register_writer(interceptor);
    }

    pub fn into_chain(self) -> InterceptorChain {
        InterceptorChain::new(self.readers, self.writers)
    }
}
