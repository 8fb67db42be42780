//! Axum router wiring: instrumented resources plus ops endpoints.

use axum::{routing::get, Router};

use meterwire_core::Result;

use crate::app_state::AppState;
use crate::demo::InstrumentedResource;
use crate::feature::MetricsFeature;
use crate::ops;
use crate::resource::ResourceConfig;

pub fn build_router(state: AppState) -> Result<Router> {
    let resources = ResourceConfig::new()
        .max_entity_bytes(state.cfg().server.max_entity_bytes)
        .register_feature(MetricsFeature::new(state.registry()))
        .register_methods(InstrumentedResource::methods())
        .build()?;

    let ops = Router::new()
        .route("/healthz", get(ops::healthz))
        .route("/metrics", get(ops::metrics))
        .route("/metrics/json", get(ops::metrics_json))
        .with_state(state);

    Ok(resources.merge(ops))
}
