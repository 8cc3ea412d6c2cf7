//! Typed extractors over validated request fields
//!
//! These read the [`RequestContext`] left in the request extensions by
//! [`enforce`](super::middleware::enforce) and deserialize one of its fields,
//! so handlers can take `ValidatedBody<CreateUserRequest>` instead of raw
//! JSON. They do no validation of their own.

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::de::DeserializeOwned;

use super::context::{FieldKind, RequestContext};
use crate::error::ApiError;

/// Validated (and, in normalize mode, sanitized) request body
#[derive(Debug)]
pub struct ValidatedBody<T>(pub T);

/// Validated route parameters
#[derive(Debug)]
pub struct ValidatedParams<T>(pub T);

/// Validated query string
#[derive(Debug)]
pub struct ValidatedQuery<T>(pub T);

fn typed_field<T: DeserializeOwned>(parts: &Parts, kind: FieldKind) -> Result<T, ApiError> {
    // A missing context means the route was registered without a validator.
    let ctx = parts.extensions.get::<RequestContext>().ok_or_else(|| {
        ApiError::internal(format!(
            "no request validator mounted for {}",
            parts.uri.path()
        ))
    })?;

    serde_json::from_value(ctx.field(kind).clone()).map_err(|err| {
        ApiError::internal(format!(
            "validated {kind:?} does not match handler type: {err}"
        ))
    })
}

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        typed_field(parts, FieldKind::Body).map(ValidatedBody)
    }
}

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        typed_field(parts, FieldKind::Params).map(ValidatedParams)
    }
}

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        typed_field(parts, FieldKind::Query).map(ValidatedQuery)
    }
}

impl<T> std::ops::Deref for ValidatedBody<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
