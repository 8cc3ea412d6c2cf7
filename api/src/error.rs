use std::fmt;

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Known API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NotFound,
    InvalidRequest,
    PayloadTooLarge,
    InternalError,
}

/// Default message, status and exposure for an [`ErrorCode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDetails {
    pub message: &'static str,
    pub status: StatusCode,
    /// Whether a custom message may be shown to clients
    pub is_public: bool,
}

impl ErrorCode {
    pub const fn details(self) -> ErrorDetails {
        match self {
            ErrorCode::NotFound => ErrorDetails {
                message: "Not found",
                status: StatusCode::NOT_FOUND,
                is_public: true,
            },
            ErrorCode::InvalidRequest => ErrorDetails {
                message: "Invalid request",
                status: StatusCode::BAD_REQUEST,
                is_public: true,
            },
            ErrorCode::PayloadTooLarge => ErrorDetails {
                message: "Payload too large",
                status: StatusCode::PAYLOAD_TOO_LARGE,
                is_public: true,
            },
            ErrorCode::InternalError => ErrorDetails {
                message: "Internal server error",
                status: StatusCode::INTERNAL_SERVER_ERROR,
                is_public: false,
            },
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::InvalidRequest => "INVALID_REQUEST",
            ErrorCode::PayloadTooLarge => "PAYLOAD_TOO_LARGE",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("{code}: {message}")]
pub struct ApiError {
    code: ErrorCode,
    message: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: &'static str,
    message: String,
    code: u16,
    timestamp: String,
    correlation_id: String,
}

impl ApiError {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: code.details().message.to_string(),
        }
    }

    pub fn with_message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InvalidRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::NotFound, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::PayloadTooLarge, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::with_message(ErrorCode::InternalError, message)
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn status(&self) -> StatusCode {
        self.code.details().status
    }

    /// Message safe to send to clients
    pub fn public_message(&self) -> &str {
        let details = self.code.details();
        if details.is_public {
            &self.message
        } else {
            details.message
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let correlation_id = Uuid::new_v4().to_string();
        if !self.code.details().is_public {
            tracing::error!(code = %self.code, correlation_id = %correlation_id, "{}", self.message);
        }

        let payload = ErrorResponse {
            error: self.code.as_str(),
            message: self.public_message().to_string(),
            code: self.status().as_u16(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            correlation_id: correlation_id.clone(),
        };

        let mut response = (self.status(), Json(payload)).into_response();
        if let Ok(value) = HeaderValue::from_str(&correlation_id) {
            response.headers_mut().insert(header::HeaderName::from_static("x-correlation-id"), value);
        }
        response
    }
}
