#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::routing::post;
use axum::Router;
use bytes::Bytes;
use tower::ServiceExt;

use meterwire_core::naming::name;
use meterwire_core::{MetricRegistry, ResourceInfo, Timed};
use meterwire_server::app_state::AppState;
use meterwire_server::demo::InstrumentedResource;
use meterwire_server::{config, router, MetricsFeature, ResourceConfig, ResourceMethod};

fn app(max_entity_bytes: usize) -> (Router, Arc<MetricRegistry>) {
    let yaml = format!("version: 1\nserver:\n  max_entity_bytes: {max_entity_bytes}\n");
    let cfg = config::load_from_str(&yaml).unwrap();
    let registry = Arc::new(MetricRegistry::new());
    let state = AppState::with_registry(cfg, registry.clone());
    (router::build_router(state).unwrap(), registry)
}

fn resource_type() -> String {
    ResourceInfo::of::<InstrumentedResource>("").resource_type().to_string()
}

async fn get(app: &Router, uri: &str) -> Response {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(resp: Response) -> String {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn timed_methods_are_timed() {
    let (app, registry) = app(1024);

    let resp = get(&app, "/timed").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "yay");

    let timer = registry.timer(&name(&resource_type(), &["timed"])).unwrap();
    assert_eq!(timer.count(), 1);
}

#[tokio::test]
async fn metered_methods_are_metered() {
    let (app, registry) = app(1024);

    let resp = get(&app, "/metered").await;
    assert_eq!(body_text(resp).await, "woo");

    let meter = registry.meter(&name(&resource_type(), &["metered"])).unwrap();
    assert_eq!(meter.count(), 1);
}

#[tokio::test]
async fn exception_metered_methods_are_exception_metered() {
    let (app, registry) = app(1024);
    let meter = registry
        .meter(&name(&resource_type(), &["exceptionMetered", "exceptions"]))
        .unwrap();

    let resp = get(&app, "/exception-metered").await;
    assert_eq!(body_text(resp).await, "fuh");
    assert_eq!(meter.count(), 0);

    let resp = get(&app, "/exception-metered?splode=true").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(resp).await, "AUGH");
    assert_eq!(meter.count(), 1);
}

#[tokio::test]
async fn oversized_entity_is_metered_on_read() {
    let (app, registry) = app(8);

    let small = Request::builder()
        .method("POST")
        .uri("/echo")
        .header(header::CONTENT_LENGTH, "5")
        .body(Body::from("hello"))
        .unwrap();
    let resp = app.clone().oneshot(small).await.unwrap();
    assert_eq!(body_text(resp).await, "hello");

    let big = Request::builder()
        .method("POST")
        .uri("/echo")
        .header(header::CONTENT_LENGTH, "32")
        .body(Body::from(vec![b'x'; 32]))
        .unwrap();
    let resp = app.clone().oneshot(big).await.unwrap();
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let exceptions = registry
        .meter(&name(&resource_type(), &["echo", "exceptions"]))
        .unwrap();
    assert_eq!(exceptions.count(), 1);
    // read failures never reach the write phase
    assert_eq!(registry.timer("demo.echo").unwrap().count(), 1);
}

#[tokio::test]
async fn metrics_endpoints_expose_registry() {
    let (app, _registry) = app(1024);
    get(&app, "/timed").await;

    let resp = get(&app, "/metrics").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let text = body_text(resp).await;
    assert!(text.contains("InstrumentedResource_timed_micros_count 1"));
    assert!(text.contains("InstrumentedResource_metered_total 0"));

    let resp = get(&app, "/metrics/json").await;
    let json: serde_json::Value = serde_json::from_str(&body_text(resp).await).unwrap();
    let timed = name(&resource_type(), &["timed"]);
    assert_eq!(json["timers"][timed.as_str()]["count"], 1);

    assert_eq!(get(&app, "/healthz").await.status(), StatusCode::OK);
}

async fn echo(body: Bytes) -> Bytes {
    body
}

fn oversized_post(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_LENGTH, "32")
        .body(Body::from(vec![b'x'; 32]))
        .unwrap()
}

#[tokio::test]
async fn write_only_metrics_leave_entity_untouched() {
    let registry = Arc::new(MetricRegistry::new());
    let app = ResourceConfig::new()
        .max_entity_bytes(8)
        .register_feature(MetricsFeature::new(registry.clone()))
        .register_method(ResourceMethod::new(
            "/plain",
            ResourceInfo::new("app.Upload", "plain"),
            post(echo),
        ))
        .register_method(ResourceMethod::new(
            "/timed",
            ResourceInfo::new("app.Upload", "timed").timed(Timed::default()),
            post(echo),
        ))
        .build()
        .unwrap();

    let plain = app.clone().oneshot(oversized_post("/plain")).await.unwrap();
    let timed = app.clone().oneshot(oversized_post("/timed")).await.unwrap();

    assert_eq!(plain.status(), timed.status());
    assert_eq!(timed.status(), StatusCode::OK);
    assert_eq!(body_text(timed).await.len(), 32);
    assert_eq!(registry.timer("app.Upload.timed").unwrap().count(), 1);
}
