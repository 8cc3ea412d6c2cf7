//! Input Validation Module
//!
//! Schema-driven validation of route params, query string and body.
//!
//! # Overview
//!
//! 1. **Schemas** - the [`Schema`] trait and its adapters ([`ModelSchema`]
//!    over serde models implementing [`Validatable`], [`FnSchema`] over
//!    closures)
//! 2. **Context** - [`RequestContext`], the params/query/body view of a request
//! 3. **Middleware** - [`RequestValidator`] and the `validate_request*` /
//!    `process_request*` constructors, mounted through [`enforce`]
//! 4. **Extractors** - `ValidatedBody<T>` and friends for handlers
//! 5. **Validators / Sanitizers** - reusable field rules
//!
//! # Usage
//!
//! ```ignore
//! use axum::{middleware, routing::post, Router};
//! use crate::validation::{self, process_request_body, ValidatedBody};
//!
//! let users = Router::new()
//!     .route("/api/v1/users", post(create_user))
//!     .route_layer(middleware::from_fn_with_state(
//!         process_request_body(create_user_schema()),
//!         validation::enforce,
//!     ));
//!
//! async fn create_user(ValidatedBody(req): ValidatedBody<CreateUserRequest>) {
//!     // req.name is already trimmed
//! }
//! ```
//!
//! ## Validation Error Response
//!
//! When any configured field fails, a 400 Bad Request is returned with one
//! entry per failed field, in params, query, body order:
//!
//! ```json
//! [
//!   {"type": "Params", "errors": {"issues": [{"code": "custom", "path": "id", "message": "must be numeric"}]}},
//!   {"type": "Query", "errors": {"issues": [{"code": "invalid_type", "path": "", "message": "missing field `page`"}]}}
//! ]
//! ```

pub mod context;
pub mod extractors;
pub mod middleware;
pub mod requests;
pub mod sanitizers;
pub mod schema;
pub mod validators;

pub use context::{FieldKind, RequestContext};
pub use extractors::{ValidatedBody, ValidatedParams, ValidatedQuery};
pub use middleware::{
    enforce, process_request, process_request_body, process_request_params,
    process_request_query, validate_request, validate_request_body, validate_request_params,
    validate_request_query, ErrorItem, Mode, RequestSchemas, RequestValidator,
    ValidationRejection,
};
pub use requests::create_user_schema;
pub use schema::{
    schema_fn, FieldError, FnSchema, ModelSchema, Outcome, Schema, SchemaError, Validatable,
    ValidationBuilder,
};
