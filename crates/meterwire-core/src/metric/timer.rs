use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::Serialize;

// Fixed buckets in microseconds
// 100us, 500us, 1ms, 5ms, 10ms, 50ms, 100ms, 500ms, 1s
pub const BUCKETS_MICROS: [u64; 9] = [100, 500, 1_000, 5_000, 10_000, 50_000, 100_000, 500_000, 1_000_000];

/// Duration histogram with a running count. Lock-free; safe to share.
#[derive(Debug)]
pub struct Timer {
    count: AtomicU64,
    sum_micros: AtomicU64,
    max_micros: AtomicU64,
    buckets: [AtomicU64; 9],
}

impl Default for Timer {
    fn default() -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_micros: AtomicU64::new(0),
            max_micros: AtomicU64::new(0),
            buckets: Default::default(),
        }
    }
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start timing. The returned context records on `stop` or drop, whichever
    /// comes first.
    pub fn time(&self) -> TimerContext<'_> {
        TimerContext {
            timer: self,
            start: Instant::now(),
            stopped: false,
        }
    }

    /// Record one observation.
    pub fn update(&self, duration: Duration) {
        let micros = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);

        self.count.fetch_add(1, Ordering::Relaxed);
        self.sum_micros.fetch_add(micros, Ordering::Relaxed);
        self.max_micros.fetch_max(micros, Ordering::Relaxed);

        // cumulative: every bucket at or above the value
        for (i, &b) in BUCKETS_MICROS.iter().enumerate() {
            if micros <= b {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
            }
        }
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        let count = self.count();
        let sum_micros = self.sum_micros.load(Ordering::Relaxed);
        TimerSnapshot {
            count,
            sum_micros,
            max_micros: self.max_micros.load(Ordering::Relaxed),
            mean_micros: if count == 0 { 0 } else { sum_micros / count },
            buckets: BUCKETS_MICROS
                .iter()
                .zip(self.buckets.iter())
                .map(|(&le, c)| (le, c.load(Ordering::Relaxed)))
                .collect(),
        }
    }
}

/// Point-in-time view of a [`Timer`].
#[derive(Debug, Clone, Serialize)]
pub struct TimerSnapshot {
    pub count: u64,
    pub sum_micros: u64,
    pub max_micros: u64,
    pub mean_micros: u64,
    /// `(upper bound in micros, cumulative count)`
    pub buckets: Vec<(u64, u64)>,
}

/// In-flight timing started by [`Timer::time`].
#[must_use = "dropping the context immediately records a near-zero duration"]
pub struct TimerContext<'a> {
    timer: &'a Timer,
    start: Instant,
    stopped: bool,
}

impl TimerContext<'_> {
    /// Record the elapsed time and return it.
    pub fn stop(mut self) -> Duration {
        self.record()
    }

    fn record(&mut self) -> Duration {
        let elapsed = self.start.elapsed();
        if !self.stopped {
            self.stopped = true;
            self.timer.update(elapsed);
        }
        elapsed
    }
}

impl Drop for TimerContext<'_> {
    fn drop(&mut self) {
        self.record();
    }
}
