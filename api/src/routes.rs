use axum::{middleware, routing::post, Router};

use crate::{
    handlers,
    state::AppState,
    validation::{self, create_user_schema, process_request_body},
};

/// Static assets served under `/public`
pub const PUBLIC_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/public");

/// Everything mounted below `/api`
pub fn api_routes() -> Router<AppState> {
    Router::new().merge(user_routes())
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users", post(handlers::create_user))
        .route("/api/v1/users/", post(handlers::create_user))
        .route_layer(middleware::from_fn_with_state(
            process_request_body(create_user_schema()),
            validation::enforce,
        ))
}
