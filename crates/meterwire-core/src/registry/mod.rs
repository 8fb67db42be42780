//! Named metric registry.
//!
//! Metrics are created on first request and reused afterwards; a name is
//! bound to one metric kind for the registry's lifetime (until removed).

mod render;
pub mod shared;

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::Serialize;

use crate::error::{MeterwireError, Result};
use crate::metric::{Meter, MeterSnapshot, Metric, Timer, TimerSnapshot};

pub use shared::SharedMetricRegistries;

#[derive(Debug, Default)]
pub struct MetricRegistry {
    metrics: DashMap<String, Metric>,
}

impl MetricRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the timer registered under `name`.
    pub fn timer(&self, name: &str) -> Result<Arc<Timer>> {
        match self.get_or_insert(name, || Metric::Timer(Arc::new(Timer::new())))? {
            Metric::Timer(t) => Ok(t),
            other => Err(conflict(name, &other)),
        }
    }

    /// Get or create the meter registered under `name`.
    pub fn meter(&self, name: &str) -> Result<Arc<Meter>> {
        match self.get_or_insert(name, || Metric::Meter(Arc::new(Meter::new())))? {
            Metric::Meter(m) => Ok(m),
            other => Err(conflict(name, &other)),
        }
    }

    fn get_or_insert(&self, name: &str, make: impl FnOnce() -> Metric) -> Result<Metric> {
        if name.is_empty() {
            return Err(MeterwireError::InvalidName("metric name must not be empty".into()));
        }
        let metric = match self.metrics.entry(name.to_string()) {
            Entry::Occupied(e) => e.get().clone(),
            Entry::Vacant(e) => {
                let metric = make();
                tracing::debug!(metric = %name, kind = metric.kind(), "metric registered");
                e.insert(metric.clone());
                metric
            }
        };
        Ok(metric)
    }

    pub fn get(&self, name: &str) -> Option<Metric> {
        self.metrics.get(name).map(|m| m.value().clone())
    }

    pub fn remove(&self, name: &str) -> bool {
        self.metrics.remove(name).is_some()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.metrics.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.metrics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    /// Render every metric in Prometheus text exposition format.
    ///
    /// Names that flatten to an already rendered family are skipped; the
    /// first name in sort order wins.
    pub fn render_prometheus(&self) -> String {
        let mut entries: Vec<(String, Metric)> = self
            .metrics
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut seen = HashSet::new();
        let mut out = String::new();
        for (name, metric) in &entries {
            let family = render::family(name, metric);
            if !seen.insert(family.clone()) {
                tracing::warn!(metric = %name, family = %family, "prometheus family collision, metric skipped");
                continue;
            }
            match metric {
                Metric::Timer(t) => render::timer(&family, &t.snapshot(), &mut out),
                Metric::Meter(m) => render::meter(&family, &m.snapshot(), &mut out),
            }
        }
        out
    }

    pub fn snapshot(&self) -> RegistrySnapshot {
        let mut snap = RegistrySnapshot::default();
        for e in self.metrics.iter() {
            match e.value() {
                Metric::Timer(t) => {
                    snap.timers.insert(e.key().clone(), t.snapshot());
                }
                Metric::Meter(m) => {
                    snap.meters.insert(e.key().clone(), m.snapshot());
                }
            }
        }
        snap
    }
}

/// Serializable view of a whole registry.
#[derive(Debug, Default, Serialize)]
pub struct RegistrySnapshot {
    pub timers: BTreeMap<String, TimerSnapshot>,
    pub meters: BTreeMap<String, MeterSnapshot>,
}

fn conflict(name: &str, existing: &Metric) -> MeterwireError {
    MeterwireError::MetricTypeConflict {
        name: name.to_string(),
        existing: existing.kind(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ClientCode;
    use std::time::Duration;

    #[test]
    fn existing_entries_are_reused() {
        let registry = MetricRegistry::new();
        let a = registry.timer("svc.Users.list").unwrap();
        let b = registry.timer("svc.Users.list").unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        let m1 = registry.meter("svc.Users.create").unwrap();
        m1.mark();
        assert_eq!(registry.meter("svc.Users.create").unwrap().count(), 1);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn kind_conflict_is_rejected() {
        let registry = MetricRegistry::new();
        registry.meter("hits").unwrap();
        let err = registry.timer("hits").unwrap_err();
        assert_eq!(err.client_code(), ClientCode::Conflict);
        assert!(err.to_string().contains("meter"));
    }

    #[test]
    fn empty_name_is_rejected() {
        let registry = MetricRegistry::new();
        let err = registry.meter("").unwrap_err();
        assert_eq!(err.client_code(), ClientCode::InvalidName);
    }

    #[test]
    fn remove_and_names() {
        let registry = MetricRegistry::new();
        registry.meter("b").unwrap();
        registry.timer("a").unwrap();
        assert_eq!(registry.names(), vec!["a".to_string(), "b".to_string()]);
        assert!(registry.remove("a"));
        assert!(!registry.remove("a"));
        assert!(registry.get("a").is_none());
    }

    #[test]
    fn renders_sorted_prometheus_text() {
        let registry = MetricRegistry::new();
        registry.meter("app.Users.create").unwrap().mark();
        registry
            .timer("app.Users.list")
            .unwrap()
            .update(Duration::from_millis(2));

        let text = registry.render_prometheus();
        let meter_at = text.find("# TYPE app_Users_create_total counter").unwrap();
        let timer_at = text.find("# TYPE app_Users_list_micros histogram").unwrap();
        assert!(meter_at < timer_at);
        assert!(text.contains("app_Users_create_total 1\n"));
        assert!(text.contains("app_Users_list_micros_bucket{le=\"5000\"} 1\n"));
        assert!(text.contains("app_Users_list_micros_count 1\n"));
    }

    #[test]
    fn colliding_families_render_once() {
        let registry = MetricRegistry::new();
        registry.meter("app.Users.list").unwrap().mark();
        registry.meter("app_Users.list").unwrap().mark_n(5);
        // different kinds get different families
        registry.timer("app.Users.create").unwrap();
        registry.meter("app.Users.create_micros").unwrap();

        let text = registry.render_prometheus();
        assert_eq!(text.matches("# TYPE app_Users_list_total counter").count(), 1);
        assert!(text.contains("app_Users_list_total 1\n"));
        assert!(!text.contains("app_Users_list_total 5\n"));
        assert_eq!(text.matches("# TYPE app_Users_create_micros histogram").count(), 1);
        assert!(text.contains("# TYPE app_Users_create_micros_total counter"));
    }

    #[test]
    fn snapshot_serializes_to_json() {
        let registry = MetricRegistry::new();
        registry.meter("hits").unwrap().mark_n(3);
        let json = serde_json::to_value(registry.snapshot()).unwrap();
        assert_eq!(json["meters"]["hits"]["count"], 3);
        assert!(json["timers"].as_object().unwrap().is_empty());
    }
}
