//! Request validation middleware
//!
//! A [`RequestValidator`] holds the schemas configured for a route and runs
//! them in the fixed order params, query, body. Every configured field is
//! checked even after an earlier one fails, so a single 400 response can
//! report several fields at once.
//!
//! Two modes exist:
//!
//! - **validate-only** (`validate_request*`): fields are checked but keep
//!   their raw values;
//! - **normalize** (`process_request*`): fields are checked and replaced by
//!   the parsed value on success.
//!
//! ```ignore
//! Router::new()
//!     .route("/api/v1/users", post(create_user))
//!     .route_layer(middleware::from_fn_with_state(
//!         process_request_body(create_user_schema()),
//!         validation::enforce,
//!     ))
//! ```

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        HeaderValue, StatusCode,
    },
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use super::context::{read_body, FieldKind, RequestContext};
use super::schema::{Schema, SchemaError, SharedSchema};
use crate::error::ApiError;

/// One failed request field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorItem {
    #[serde(rename = "type")]
    pub kind: FieldKind,
    pub errors: SchemaError,
}

impl ErrorItem {
    pub fn new(kind: FieldKind, errors: SchemaError) -> Self {
        Self { kind, errors }
    }
}

/// Aggregated validation failure, sent as a 400 with a JSON array body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRejection {
    pub errors: Vec<ErrorItem>,
}

impl ValidationRejection {
    pub fn new(errors: Vec<ErrorItem>) -> Self {
        Self { errors }
    }
}

impl IntoResponse for ValidationRejection {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(self.errors)).into_response()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    ValidateOnly,
    Normalize,
}

/// Per-field schemas for the combined validators
#[derive(Clone, Default)]
pub struct RequestSchemas {
    params: Option<SharedSchema>,
    query: Option<SharedSchema>,
    body: Option<SharedSchema>,
}

impl RequestSchemas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn params<S: Schema + 'static>(mut self, schema: S) -> Self {
        self.params = Some(Arc::new(schema));
        self
    }

    pub fn query<S: Schema + 'static>(mut self, schema: S) -> Self {
        self.query = Some(Arc::new(schema));
        self
    }

    pub fn body<S: Schema + 'static>(mut self, schema: S) -> Self {
        self.body = Some(Arc::new(schema));
        self
    }

    fn get(&self, kind: FieldKind) -> Option<&SharedSchema> {
        match kind {
            FieldKind::Params => self.params.as_ref(),
            FieldKind::Query => self.query.as_ref(),
            FieldKind::Body => self.body.as_ref(),
        }
    }
}

#[derive(Clone)]
pub struct RequestValidator {
    schemas: RequestSchemas,
    mode: Mode,
}

impl RequestValidator {
    pub fn new(schemas: RequestSchemas, mode: Mode) -> Self {
        Self { schemas, mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Check every configured field of `ctx`, rewriting fields in normalize
    /// mode. `ctx` is only modified when the whole run succeeds.
    pub fn run(&self, ctx: &mut RequestContext) -> Result<(), ValidationRejection> {
        let mut errors = Vec::new();
        let mut parsed = Vec::new();

        for kind in FieldKind::ALL {
            let Some(schema) = self.schemas.get(kind) else {
                continue;
            };
            match schema.parse_value(ctx.field(kind)) {
                Ok(value) => parsed.push((kind, value)),
                Err(detail) => errors.push(ErrorItem::new(kind, detail)),
            }
        }

        if !errors.is_empty() {
            return Err(ValidationRejection::new(errors));
        }

        if self.mode == Mode::Normalize {
            for (kind, value) in parsed {
                ctx.set_field(kind, value);
            }
        }
        Ok(())
    }

    fn rewrites_body(&self) -> bool {
        self.mode == Mode::Normalize && self.schemas.body.is_some()
    }
}

pub fn validate_request(schemas: RequestSchemas) -> RequestValidator {
    RequestValidator::new(schemas, Mode::ValidateOnly)
}

pub fn validate_request_body<S: Schema + 'static>(schema: S) -> RequestValidator {
    validate_request(RequestSchemas::new().body(schema))
}

pub fn validate_request_params<S: Schema + 'static>(schema: S) -> RequestValidator {
    validate_request(RequestSchemas::new().params(schema))
}

pub fn validate_request_query<S: Schema + 'static>(schema: S) -> RequestValidator {
    validate_request(RequestSchemas::new().query(schema))
}

pub fn process_request(schemas: RequestSchemas) -> RequestValidator {
    RequestValidator::new(schemas, Mode::Normalize)
}

pub fn process_request_body<S: Schema + 'static>(schema: S) -> RequestValidator {
    process_request(RequestSchemas::new().body(schema))
}

pub fn process_request_params<S: Schema + 'static>(schema: S) -> RequestValidator {
    process_request(RequestSchemas::new().params(schema))
}

pub fn process_request_query<S: Schema + 'static>(schema: S) -> RequestValidator {
    process_request(RequestSchemas::new().query(schema))
}

/// Middleware entry point, mounted with `from_fn_with_state`.
///
/// Validators stacked on the same route share one [`RequestContext`], so a
/// later validator sees the values normalized by an earlier one.
pub async fn enforce(
    State(validator): State<RequestValidator>,
    request: Request,
    next: Next,
) -> Response {
    let (mut parts, body) = request.into_parts();

    let (mut ctx, body) = match parts.extensions.remove::<RequestContext>() {
        Some(ctx) => (ctx, body),
        None => {
            let bytes = match read_body(&parts.headers, body).await {
                Ok(bytes) => bytes,
                Err(err) => return err.into_response(),
            };
            match RequestContext::extract(&mut parts, &bytes).await {
                Ok(ctx) => (ctx, Body::from(bytes)),
                Err(err) => return err.into_response(),
            }
        }
    };

    if let Err(rejection) = validator.run(&mut ctx) {
        tracing::debug!(
            path = %parts.uri.path(),
            failed = ?rejection.errors.iter().map(|e| e.kind).collect::<Vec<_>>(),
            "request validation failed"
        );
        return rejection.into_response();
    }

    let body = if validator.rewrites_body() {
        match serde_json::to_vec(&ctx.body) {
            Ok(bytes) => {
                parts
                    .headers
                    .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                parts.headers.remove(CONTENT_LENGTH);
                Body::from(bytes)
            }
            Err(err) => return ApiError::internal(err.to_string()).into_response(),
        }
    } else {
        body
    };

    parts.extensions.insert(ctx);
    next.run(Request::from_parts(parts, body)).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::schema::{schema_fn, Outcome};
    use serde_json::{json, Value};

    fn trimmed_string(field: &'static str) -> impl Fn(&Value) -> Outcome<Value> + Send + Sync {
        move |raw: &Value| match raw.get(field).and_then(Value::as_str) {
            Some(s) => Ok(json!({ field: s.trim() })),
            None => Err(SchemaError::custom(field, "is required")),
        }
    }

    fn ctx() -> RequestContext {
        RequestContext::new(
            json!({"id": " 7 "}),
            json!({"q": " rust "}),
            json!({"name": " Ada "}),
        )
    }

    #[test]
    fn test_normalize_rewrites_configured_fields() {
        let validator = process_request(
            RequestSchemas::new()
                .params(schema_fn(trimmed_string("id")))
                .body(schema_fn(trimmed_string("name"))),
        );
        let mut ctx = ctx();
        validator.run(&mut ctx).unwrap();

        assert_eq!(ctx.params, json!({"id": "7"}));
        assert_eq!(ctx.body, json!({"name": "Ada"}));
        // no schema for query: untouched
        assert_eq!(ctx.query, json!({"q": " rust "}));
    }

    #[test]
    fn test_validate_only_keeps_raw_values() {
        let validator = validate_request(
            RequestSchemas::new()
                .params(schema_fn(trimmed_string("id")))
                .query(schema_fn(trimmed_string("q")))
                .body(schema_fn(trimmed_string("name"))),
        );
        let mut ctx = ctx();
        validator.run(&mut ctx).unwrap();
        assert_eq!(ctx, self::ctx());
    }

    #[test]
    fn test_errors_are_batched_in_field_order() {
        let validator = process_request(
            RequestSchemas::new()
                .body(schema_fn(trimmed_string("name")))
                .query(schema_fn(trimmed_string("missing_q")))
                .params(schema_fn(trimmed_string("missing_id"))),
        );
        let mut ctx = ctx();
        let rejection = validator.run(&mut ctx).unwrap_err();

        let kinds: Vec<_> = rejection.errors.iter().map(|e| e.kind).collect();
        assert_eq!(kinds, vec![FieldKind::Params, FieldKind::Query]);
        // failed runs leave the context untouched
        assert_eq!(ctx, self::ctx());
    }

    #[test]
    fn test_single_field_helpers_report_one_item() {
        let mut ctx = RequestContext::default();
        for (validator, kind) in [
            (validate_request_params(schema_fn(trimmed_string("id"))), FieldKind::Params),
            (validate_request_query(schema_fn(trimmed_string("q"))), FieldKind::Query),
            (process_request_body(schema_fn(trimmed_string("name"))), FieldKind::Body),
        ] {
            let rejection = validator.run(&mut ctx).unwrap_err();
            assert_eq!(rejection.errors.len(), 1);
            assert_eq!(rejection.errors[0].kind, kind);
        }
    }

    #[test]
    fn test_error_item_serialization() {
        let item = ErrorItem::new(FieldKind::Body, SchemaError::custom("email", "is required"));
        assert_eq!(
            serde_json::to_value(&item).unwrap(),
            json!({
                "type": "Body",
                "errors": {"issues": [{"code": "custom", "path": "email", "message": "is required"}]}
            })
        );
    }

    #[test]
    fn test_modes() {
        assert_eq!(validate_request_body(schema_fn(trimmed_string("a"))).mode(), Mode::ValidateOnly);
        assert_eq!(process_request_query(schema_fn(trimmed_string("a"))).mode(), Mode::Normalize);
        assert_eq!(process_request_params(schema_fn(trimmed_string("a"))).mode(), Mode::Normalize);
    }
}
