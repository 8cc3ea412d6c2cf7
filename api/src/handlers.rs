use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::{
    error::{ApiError, ErrorCode},
    models::CreateUserRequest,
    state::AppState,
    validation::ValidatedBody,
};

pub async fn create_user(
    State(state): State<AppState>,
    ValidatedBody(request): ValidatedBody<CreateUserRequest>,
) -> impl IntoResponse {
    let user = state.users.create_user(request);
    (StatusCode::CREATED, Json(user))
}

pub async fn route_not_found() -> ApiError {
    ApiError::new(ErrorCode::NotFound)
}
