//! meterwire core: metric primitives, the named registry, metric naming, and
//! the resource descriptors that declare which metrics a method carries.
//!
//! This crate carries no HTTP or runtime dependencies; the axum integration
//! lives in `meterwire-server`.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Registry misuse (empty names, kind conflicts) surfaces as
//! `MeterwireError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod metric;
pub mod naming;
pub mod registry;
pub mod resource;

/// Shared result type.
pub use error::{ClientCode, MeterwireError, Result};
pub use metric::{Meter, Metric, Timer, TimerContext};
pub use registry::{MetricRegistry, SharedMetricRegistries};
pub use resource::{ExceptionFilter, ExceptionMetered, Metered, ResourceInfo, Timed};
