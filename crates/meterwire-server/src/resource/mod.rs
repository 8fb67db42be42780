//! Resource registration: descriptors + handlers in, axum `Router` out.
//!
//! Every registered feature sees every method once. Methods that end up
//! with interceptors get a route layer that runs the write phase (handler +
//! response) through the chain, and the read phase (entity buffering) only
//! when the method has reader interceptors.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::MethodRouter;
use axum::Router;

use http_body_util::LengthLimitError;
use meterwire_core::{ExceptionFilter, ResourceInfo, Result};

use crate::fault::Fault;
use crate::feature::{DynamicFeature, FeatureContext};
use crate::intercept::InterceptorChain;

const DEFAULT_MAX_ENTITY_BYTES: usize = 1024 * 1024;

/// One resource method: where it is routed, what it declares, how it runs.
pub struct ResourceMethod {
    path: String,
    info: ResourceInfo,
    route: MethodRouter,
}

impl ResourceMethod {
    pub fn new(path: impl Into<String>, info: ResourceInfo, route: MethodRouter) -> Self {
        Self {
            path: path.into(),
            info,
            route,
        }
    }
}

pub struct ResourceConfig {
    features: Vec<Box<dyn DynamicFeature>>,
    methods: Vec<ResourceMethod>,
    max_entity_bytes: usize,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            features: Vec::new(),
            methods: Vec::new(),
            max_entity_bytes: DEFAULT_MAX_ENTITY_BYTES,
        }
    }
}

impl ResourceConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_feature(mut self, feature: impl DynamicFeature + 'static) -> Self {
        self.features.push(Box::new(feature));
        self
    }

    pub fn register_method(mut self, method: ResourceMethod) -> Self {
        self.methods.push(method);
        self
    }

    pub fn register_methods(mut self, methods: impl IntoIterator<Item = ResourceMethod>) -> Self {
        self.methods.extend(methods);
        self
    }

    /// Upper bound for buffered request entities.
    pub fn max_entity_bytes(mut self, limit: usize) -> Self {
        self.max_entity_bytes = limit;
        self
    }

    /// Run every feature against every method and build the router.
    pub fn build(self) -> Result<Router> {
        let mut router = Router::new();

        for method in self.methods {
            let mut ctx = FeatureContext::new();
            for feature in &self.features {
                feature.configure(&method.info, &mut ctx)?;
            }
            let chain = ctx.into_chain();

            tracing::debug!(
                path = %method.path,
                resource = %method.info.resource_type(),
                method = %method.info.method(),
                readers = chain.reader_count(),
                writers = chain.writer_count(),
                "resource method configured"
            );

            let route = if chain.is_empty() {
                method.route
            } else {
                let pipeline = Arc::new(MethodPipeline {
                    chain,
                    max_entity_bytes: self.max_entity_bytes,
                });
                method
                    .route
                    .route_layer(middleware::from_fn_with_state(pipeline, intercept))
            };
            router = router.route(&method.path, route);
        }

        Ok(router)
    }
}

struct MethodPipeline {
    chain: InterceptorChain,
    max_entity_bytes: usize,
}

async fn intercept(
    State(pipeline): State<Arc<MethodPipeline>>,
    req: Request,
    next: Next,
) -> Response {
    let (parts, body) = req.into_parts();

    let body = if pipeline.chain.reader_count() > 0 && has_entity(&parts.headers) {
        let limit = pipeline.max_entity_bytes;
        let read = pipeline.chain.read(Box::pin(async move {
            axum::body::to_bytes(body, limit).await.map_err(entity_fault)
        }));
        match read.await {
            Ok(bytes) => Body::from(bytes),
            Err(fault) => return fault.render(),
        }
    } else {
        body
    };

    let req = Request::from_parts(parts, body);
    let write = pipeline
        .chain
        .write(Box::pin(async move { Fault::take_from(next.run(req).await) }));

    match write.await {
        Ok(resp) => resp,
        Err(fault) => fault.render(),
    }
}

/// Map a failed entity read: over the limit is 413, anything else 400.
fn entity_fault(err: axum::Error) -> Fault {
    let status = if ExceptionFilter::of::<LengthLimitError>().matches(&err) {
        StatusCode::PAYLOAD_TOO_LARGE
    } else {
        StatusCode::BAD_REQUEST
    };
    Fault::new(status, err)
}

fn has_entity(headers: &HeaderMap) -> bool {
    if headers.contains_key(header::TRANSFER_ENCODING) {
        return true;
    }
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<u64>().ok())
        .is_some_and(|n| n > 0)
}
