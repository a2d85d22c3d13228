//! Request timing middleware.
//!
//! Installed with `Router::layer`, so it runs after routing: matched requests
//! are labelled with their route template and everything that falls through
//! to the 404 fallback shares one `UNMATCHED_ROUTE` label. Scrapes of
//! `/metrics` are not recorded. The observation is taken after the handler
//! returns, for every status.

use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};

use crate::app_state::AppState;

/// Route label for requests no route matched.
pub const UNMATCHED_ROUTE: &str = "<unmatched>";

/// Path excluded from request metrics.
pub const METRICS_PATH: &str = "/metrics";

pub async fn track_metrics(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let route = match req.extensions().get::<MatchedPath>() {
        Some(p) if p.as_str() == METRICS_PATH => return next.run(req).await,
        Some(p) => p.as_str().to_owned(),
        None => UNMATCHED_ROUTE.to_owned(),
    };
    let started = Instant::now();
    let method = req.method().to_string();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    let labels = [
        ("method", method.as_str()),
        ("route", route.as_str()),
        ("status_code", status.as_str()),
    ];
    let metrics = state.metrics();
    metrics.http_requests.inc(&labels);
    metrics.http_request_duration.observe(&labels, started.elapsed());

    response
}
