//! Axum router wiring.
//!
//! Layer order, outermost first: access log, CORS, request metrics, handler.
//! Every request is logged; every request except `/metrics` scrapes is timed,
//! unmatched ones included.

use axum::{
    http::{header, Method},
    middleware,
    routing::{delete, get},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::{api::goals, app_state::AppState, obs, ops};

pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(obs::middleware::METRICS_PATH, get(ops::metrics))
        .route("/healthz", get(ops::healthz))
        .route("/goals", get(goals::list_goals).post(goals::create_goal))
        .route("/goals/:id", delete(goals::delete_goal))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            obs::middleware::track_metrics,
        ))
        .layer(cors_layer())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            obs::access_log::log_access,
        ))
        .with_state(state)
}
