//! Metric primitives.
//!
//! Both kinds are plain atomics so interceptors can record from any request
//! task without locking. Timer histogram buckets are fixed in microseconds to
//! avoid floating point math on the hot path.

pub mod meter;
pub mod timer;

use std::sync::Arc;

pub use meter::{Meter, MeterSnapshot};
pub use timer::{Timer, TimerContext, TimerSnapshot};

/// A registered metric.
#[derive(Debug, Clone)]
pub enum Metric {
    Timer(Arc<Timer>),
    Meter(Arc<Meter>),
}

impl Metric {
    pub fn kind(&self) -> &'static str {
        match self {
            Metric::Timer(_) => "timer",
            Metric::Meter(_) => "meter",
        }
    }
}
