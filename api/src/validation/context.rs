//! Request field extraction
//!
//! [`RequestContext`] is the mutable view of a request that validators read
//! from and write parsed values back into.

use axum::{
    body::{to_bytes, Body, Bytes},
    extract::{rejection::RawPathParamsRejection, FromRequestParts, RawPathParams},
    http::{
        header::{CONTENT_LENGTH, CONTENT_TYPE},
        request::Parts,
        HeaderMap,
    },
};
use http_body_util::LengthLimitError;
use serde::Serialize;
use serde_json::{map::Entry, Map, Value};

use crate::error::ApiError;

/// Maximum accepted request body, matching the usual 100kb JSON parser limit
pub const BODY_LIMIT_BYTES: usize = 100 * 1024;

/// Which part of a request a schema or an error applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FieldKind {
    Params,
    Query,
    Body,
}

impl FieldKind {
    /// Evaluation order used by every validator
    pub const ALL: [FieldKind; 3] = [FieldKind::Params, FieldKind::Query, FieldKind::Body];
}

#[derive(Debug, Clone, PartialEq)]
pub struct RequestContext {
    pub params: Value,
    pub query: Value,
    pub body: Value,
}

impl Default for RequestContext {
    fn default() -> Self {
        Self {
            params: Value::Object(Map::new()),
            query: Value::Object(Map::new()),
            body: Value::Object(Map::new()),
        }
    }
}

impl RequestContext {
    pub fn new(params: Value, query: Value, body: Value) -> Self {
        Self {
            params,
            query,
            body,
        }
    }

    pub fn field(&self, kind: FieldKind) -> &Value {
        match kind {
            FieldKind::Params => &self.params,
            FieldKind::Query => &self.query,
            FieldKind::Body => &self.body,
        }
    }

    pub fn set_field(&mut self, kind: FieldKind, value: Value) {
        match kind {
            FieldKind::Params => self.params = value,
            FieldKind::Query => self.query = value,
            FieldKind::Body => self.body = value,
        }
    }

    /// Build the context from routed request parts and the buffered body.
    pub async fn extract(parts: &mut Parts, body: &Bytes) -> Result<Self, ApiError> {
        let params = match RawPathParams::from_request_parts(parts, &()).await {
            Ok(raw) => Value::Object(
                raw.iter()
                    .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
                    .collect(),
            ),
            Err(RawPathParamsRejection::MissingPathParams(_)) => Value::Object(Map::new()),
            Err(rejection) => return Err(ApiError::bad_request(rejection.body_text())),
        };

        let query = decode_form(parts.uri.query().unwrap_or_default().as_bytes());
        let body = decode_body(&parts.headers, body)?;

        Ok(Self::new(params, query, body))
    }
}

/// Buffer the request body, refusing anything over [`BODY_LIMIT_BYTES`].
pub async fn read_body(headers: &HeaderMap, body: Body) -> Result<Bytes, ApiError> {
    let declared = headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    if declared.is_some_and(|len| len > BODY_LIMIT_BYTES) {
        return Err(ApiError::payload_too_large(format!(
            "request body exceeds {BODY_LIMIT_BYTES} bytes"
        )));
    }

    to_bytes(body, BODY_LIMIT_BYTES).await.map_err(|err| {
        tracing::debug!(error = %err, "failed to buffer request body");
        if exceeds_limit(err) {
            ApiError::payload_too_large(format!("request body exceeds {BODY_LIMIT_BYTES} bytes"))
        } else {
            ApiError::bad_request("Failed to read request body")
        }
    })
}

fn exceeds_limit(err: axum::Error) -> bool {
    let inner = err.into_inner();
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(inner.as_ref());
    while let Some(err) = source {
        if err.is::<LengthLimitError>() {
            return true;
        }
        source = err.source();
    }
    false
}

/// Decode a body according to its content type. Bodies of other types, and
/// empty bodies, decode to an empty object.
pub fn decode_body(headers: &HeaderMap, body: &Bytes) -> Result<Value, ApiError> {
    if body.is_empty() {
        return Ok(Value::Object(Map::new()));
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime == "application/json" || mime.ends_with("+json") {
        let value: Value = serde_json::from_slice(body)
            .map_err(|err| ApiError::bad_request(format!("JSON syntax error: {err}")))?;
        // strict: top-level primitives are refused before any schema sees them
        if !(value.is_object() || value.is_array()) {
            return Err(ApiError::bad_request(
                "JSON syntax error: expected an object or array at the top level",
            ));
        }
        Ok(value)
    } else if mime == "application/x-www-form-urlencoded" {
        Ok(decode_form(body))
    } else {
        Ok(Value::Object(Map::new()))
    }
}

/// Decode `application/x-www-form-urlencoded` pairs into an object of
/// strings. A repeated key collects its values into an array.
pub fn decode_form(input: &[u8]) -> Value {
    let mut fields = Map::new();
    for (key, value) in url::form_urlencoded::parse(input) {
        let value = Value::String(value.into_owned());
        match fields.entry(key.into_owned()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::Array(values) => values.push(value),
                first => *first = Value::Array(vec![first.take(), value]),
            },
        }
    }
    Value::Object(fields)
}
