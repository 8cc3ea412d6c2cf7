//! Schema adapters
//!
//! A schema turns a raw JSON value taken from the request into a parsed,
//! possibly transformed value, or into a structured [`SchemaError`]. Malformed
//! input is never a panic: it is an ordinary `Err` outcome.

use std::marker::PhantomData;
use std::sync::Arc;

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result of parsing one request field.
pub type Outcome<T> = Result<T, SchemaError>;

/// Category of a single schema issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueCode {
    /// The value could not be read into the expected shape at all
    InvalidType,
    /// The value has the right shape but a field rule rejected it
    Custom,
}

/// One problem found while parsing a value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub code: IssueCode,
    pub path: String,
    pub message: String,
}

impl Issue {
    pub fn new(code: IssueCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code,
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Structured failure detail returned by a schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("schema rejected value with {} issue(s)", .issues.len())]
pub struct SchemaError {
    pub issues: Vec<Issue>,
}

impl SchemaError {
    pub fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn single(code: IssueCode, path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(vec![Issue::new(code, path, message)])
    }

    /// Convenience for hand-written schemas rejecting a single field.
    pub fn custom(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::single(IssueCode::Custom, path, message)
    }

    fn from_serde(err: serde_json::Error) -> Self {
        Self::single(IssueCode::InvalidType, "", err.to_string())
    }

    fn from_field_errors(errors: Vec<FieldError>) -> Self {
        Self::new(
            errors
                .into_iter()
                .map(|e| Issue::new(IssueCode::Custom, e.field, e.message))
                .collect(),
        )
    }
}

/// A field-level validation error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Builder for accumulating validation errors
#[derive(Debug, Default)]
pub struct ValidationBuilder {
    errors: Vec<FieldError>,
}

impl ValidationBuilder {
    pub fn new() -> Self {
        Self { errors: vec![] }
    }

    /// Add an error if the result is Err
    pub fn check<F>(&mut self, field: &str, validator: F) -> &mut Self
    where
        F: FnOnce() -> Result<(), String>,
    {
        if let Err(message) = validator() {
            self.errors.push(FieldError::new(field, message));
        }
        self
    }

    /// Finish building and return Result
    pub fn build(&mut self) -> Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(std::mem::take(&mut self.errors))
        }
    }
}

/// Trait for request models that can be sanitized and validated
///
/// `sanitize` runs first and must be idempotent, so that parsing an already
/// parsed value yields the same value again.
pub trait Validatable: Sized {
    /// Sanitize the data in-place (trim whitespace, normalize, etc.)
    fn sanitize(&mut self);

    /// Validate the data and return any field errors
    fn validate(&self) -> Result<(), Vec<FieldError>>;
}

/// A validation rule for one part of a request.
///
/// Schemas are built once when routes are registered and shared read-only by
/// every request, hence the `Send + Sync` bound.
pub trait Schema: Send + Sync {
    type Output: Serialize;

    fn parse(&self, raw: &Value) -> Outcome<Self::Output>;
}

/// Object-safe view of a [`Schema`] producing plain JSON.
pub trait DynSchema: Send + Sync {
    fn parse_value(&self, raw: &Value) -> Outcome<Value>;
}

impl<S: Schema> DynSchema for S {
    fn parse_value(&self, raw: &Value) -> Outcome<Value> {
        let parsed = self.parse(raw)?;
        serde_json::to_value(parsed).map_err(SchemaError::from_serde)
    }
}

pub type SharedSchema = Arc<dyn DynSchema>;

/// Schema backed by a serde model implementing [`Validatable`].
///
/// Keys the model does not declare are dropped from the parsed value.
pub struct ModelSchema<T> {
    _model: PhantomData<fn() -> T>,
}

impl<T> ModelSchema<T> {
    pub fn new() -> Self {
        Self {
            _model: PhantomData,
        }
    }
}

impl<T> Default for ModelSchema<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Schema for ModelSchema<T>
where
    T: DeserializeOwned + Serialize + Validatable,
{
    type Output = T;

    fn parse(&self, raw: &Value) -> Outcome<T> {
        let mut model: T = serde_json::from_value(raw.clone()).map_err(SchemaError::from_serde)?;
        model.sanitize();
        model.validate().map_err(SchemaError::from_field_errors)?;
        Ok(model)
    }
}

/// Schema backed by a parsing closure, for coercions and ad-hoc transforms.
pub struct FnSchema<F, T> {
    parse: F,
    _output: PhantomData<fn() -> T>,
}

impl<F, T> Schema for FnSchema<F, T>
where
    F: Fn(&Value) -> Outcome<T> + Send + Sync,
    T: Serialize,
{
    type Output = T;

    fn parse(&self, raw: &Value) -> Outcome<T> {
        (self.parse)(raw)
    }
}

pub fn schema_fn<F, T>(parse: F) -> FnSchema<F, T>
where
    F: Fn(&Value) -> Outcome<T> + Send + Sync,
    T: Serialize,
{
    FnSchema {
        parse,
        _output: PhantomData,
    }
}
