//! Shared application state for meterwire-server.

use std::sync::Arc;

use meterwire_core::{MetricRegistry, SharedMetricRegistries};

use crate::config::ServerConfig;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    cfg: ServerConfig,
    registry: Arc<MetricRegistry>,
}

impl AppState {
    /// State bound to the shared registry named in `metrics.registry`.
    pub fn new(cfg: ServerConfig) -> Self {
        let registry = SharedMetricRegistries::get_or_create(&cfg.metrics.registry);
        Self::with_registry(cfg, registry)
    }

    pub fn with_registry(cfg: ServerConfig, registry: Arc<MetricRegistry>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { cfg, registry }),
        }
    }

    pub fn cfg(&self) -> &ServerConfig {
        &self.inner.cfg
    }

    pub fn registry(&self) -> Arc<MetricRegistry> {
        Arc::clone(&self.inner.registry)
    }
}
