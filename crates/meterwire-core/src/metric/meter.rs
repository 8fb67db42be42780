use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

use serde::Serialize;

/// Event counter with a mean rate since creation.
#[derive(Debug)]
pub struct Meter {
    count: AtomicU64,
    created: Instant,
}

impl Default for Meter {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            created: Instant::now(),
        }
    }
}

impl Meter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one event.
    pub fn mark(&self) {
        self.mark_n(1);
    }

    pub fn mark_n(&self, n: u64) {
        self.count.fetch_add(n, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Events per second since the meter was created.
    pub fn mean_rate(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            return 0.0;
        }
        let secs = self.created.elapsed().as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        count as f64 / secs
    }

    pub fn snapshot(&self) -> MeterSnapshot {
        MeterSnapshot {
            count: self.count(),
            mean_rate: self.mean_rate(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MeterSnapshot {
    pub count: u64,
    pub mean_rate: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_accumulate() {
        let meter = Meter::new();
        assert_eq!(meter.mean_rate(), 0.0);
        meter.mark();
        meter.mark_n(4);
        assert_eq!(meter.count(), 5);
        assert!(meter.mean_rate() >= 0.0);
    }
}
