//! Process-wide registries addressed by name.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::Lazy;

use super::MetricRegistry;

static REGISTRIES: Lazy<DashMap<String, Arc<MetricRegistry>>> = Lazy::new(DashMap::new);

/// Named registries shared by every component in the process.
pub struct SharedMetricRegistries;

impl SharedMetricRegistries {
    /// Return the registry called `name`, creating it on first use.
    pub fn get_or_create(name: &str) -> Arc<MetricRegistry> {
        REGISTRIES
            .entry(name.to_string())
            .or_insert_with(|| {
                tracing::debug!(registry = %name, "shared registry created");
                Arc::new(MetricRegistry::new())
            })
            .value()
            .clone()
    }

    pub fn names() -> Vec<String> {
        let mut names: Vec<String> = REGISTRIES.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn remove(name: &str) -> Option<Arc<MetricRegistry>> {
        REGISTRIES.remove(name).map(|(_, r)| r)
    }
}
