//! meterwire server library entry.
//!
//! Binds metric declarations on resource methods to interceptors and serves
//! the result through axum. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod demo;
pub mod fault;
pub mod feature;
pub mod intercept;
pub mod ops;
pub mod resource;
pub mod router;

pub use fault::Fault;
pub use feature::{DynamicFeature, FeatureContext, MetricsFeature};
pub use resource::{ResourceConfig, ResourceMethod};
