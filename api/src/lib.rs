pub mod app_middleware;
pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod observability;
pub mod routes;
pub mod state;
pub mod user_service;
pub mod validation;

use axum::{middleware, Router};
use tower_http::services::ServeDir;

use crate::state::AppState;

/// Build the full application router.
pub fn app(state: AppState) -> Router {
    let api = routes::api_routes().route_layer(middleware::from_fn(app_middleware::strong_etag));

    Router::new()
        .merge(api)
        .nest_service("/public", ServeDir::new(routes::PUBLIC_DIR))
        .fallback(handlers::route_not_found)
        .layer(middleware::from_fn(app_middleware::security_headers))
        .layer(middleware::from_fn(app_middleware::request_logger))
        .with_state(state)
}
