//! Demo resource served by the binary and exercised by integration tests.

use std::io;

use axum::extract::Query;
use axum::routing::{get, post};
use bytes::Bytes;
use serde::Deserialize;

use meterwire_core::{ExceptionMetered, Metered, ResourceInfo, Timed};

use crate::fault::Fault;
use crate::resource::ResourceMethod;

/// Resource type whose methods each carry one kind of metric.
pub struct InstrumentedResource;

impl InstrumentedResource {
    pub fn methods() -> Vec<ResourceMethod> {
        vec![
            ResourceMethod::new(
                "/timed",
                ResourceInfo::of::<InstrumentedResource>("timed").timed(Timed::default()),
                get(timed),
            ),
            ResourceMethod::new(
                "/metered",
                ResourceInfo::of::<InstrumentedResource>("metered").metered(Metered::default()),
                get(metered),
            ),
            ResourceMethod::new(
                "/exception-metered",
                ResourceInfo::of::<InstrumentedResource>("exceptionMetered")
                    .exception_metered(ExceptionMetered::caused_by::<io::Error>()),
                get(exception_metered),
            ),
            ResourceMethod::new(
                "/echo",
                ResourceInfo::of::<InstrumentedResource>("echo")
                    .timed(Timed::absolute("demo.echo"))
                    .exception_metered(ExceptionMetered::caused_by::<axum::Error>()),
                post(echo),
            ),
        ]
    }
}

async fn timed() -> &'static str {
    "yay"
}

async fn metered() -> &'static str {
    "woo"
}

#[derive(Debug, Deserialize)]
struct SplodeQuery {
    #[serde(default)]
    splode: bool,
}

async fn exception_metered(Query(q): Query<SplodeQuery>) -> Result<&'static str, Fault> {
    if q.splode {
        return Err(io::Error::new(io::ErrorKind::Other, "AUGH").into());
    }
    Ok("fuh")
}

async fn echo(body: Bytes) -> Bytes {
    body
}
