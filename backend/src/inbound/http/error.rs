//! HTTP adapter mapping for domain errors.
//!
//! Purpose: keep the domain error type HTTP-agnostic while giving every
//! failing response the same JSON envelope. [`envelope_for`] is the pure
//! mapping; the error normaliser middleware attaches the request path and
//! renders it once per failing request.

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::http::header::{self, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::domain::{Error, ErrorCode, TraceId};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Challenge sent with every `401` response.
pub const BASIC_CHALLENGE: &str = "Basic realm=\"animes\"";

/// Message substituted for internal errors when no trace was requested.
pub const REDACTED_MESSAGE: &str = "Internal server error";

/// Status line for a domain error code.
pub fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
        ErrorCode::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Best matching domain code for a failing status produced outside the
/// domain (routing, extractors, framework defaults).
///
/// Unlisted client errors become `InvalidRequest`; anything else is an
/// internal error.
pub fn code_for_status(status: StatusCode) -> ErrorCode {
    match status {
        StatusCode::BAD_REQUEST => ErrorCode::InvalidRequest,
        StatusCode::UNAUTHORIZED => ErrorCode::Unauthorized,
        StatusCode::FORBIDDEN => ErrorCode::Forbidden,
        StatusCode::NOT_FOUND => ErrorCode::NotFound,
        StatusCode::METHOD_NOT_ALLOWED => ErrorCode::MethodNotAllowed,
        StatusCode::UNSUPPORTED_MEDIA_TYPE => ErrorCode::UnsupportedMediaType,
        StatusCode::SERVICE_UNAVAILABLE => ErrorCode::ServiceUnavailable,
        other if other.is_client_error() => ErrorCode::InvalidRequest,
        _ => ErrorCode::InternalError,
    }
}

/// JSON body of every failing response.
///
/// `traceId`, `details` and `stackTrace` are omitted when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorEnvelope {
    pub timestamp: String,
    pub path: String,
    pub status: u16,
    pub error: String,
    pub code: ErrorCode,
    pub message: String,
    pub developer_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stack_trace: Option<String>,
}

/// Build the envelope for `error`.
///
/// Internal errors are redacted unless `trace_requested`; a stack trace is
/// attached only when it is.
///
/// # Examples
/// ```
/// use anime_backend::domain::Error;
/// use anime_backend::inbound::http::error::envelope_for;
///
/// let envelope = envelope_for(&Error::not_found("Anime not found"), false).at_path("/animes/9");
/// assert_eq!(envelope.status, 404);
/// assert_eq!(envelope.error, "Not Found");
/// assert_eq!(envelope.path, "/animes/9");
/// assert!(envelope.stack_trace.is_none());
/// ```
pub fn envelope_for(error: &Error, trace_requested: bool) -> ErrorEnvelope {
    let status = status_for(error.code());
    let redact = error.code() == ErrorCode::InternalError && !trace_requested;
    let (message, developer_message, details) = if redact {
        (REDACTED_MESSAGE.to_owned(), REDACTED_MESSAGE.to_owned(), None)
    } else {
        (
            error.message().to_owned(),
            error.developer_message().to_owned(),
            error.details().cloned(),
        )
    };
    let trace_id = error
        .trace_id()
        .map(str::to_owned)
        .or_else(|| TraceId::current().map(|id| id.to_string()));

    ErrorEnvelope {
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        path: String::new(),
        status: status.as_u16(),
        error: reason_phrase(status),
        code: error.code(),
        message,
        developer_message,
        trace_id,
        details,
        stack_trace: trace_requested.then(|| error.stack_trace()),
    }
}

fn reason_phrase(status: StatusCode) -> String {
    status
        .canonical_reason()
        .unwrap_or("Unknown Status")
        .to_owned()
}

impl ErrorEnvelope {
    /// Attach the request path.
    #[must_use]
    pub fn at_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Report `status` instead of the one implied by the error code.
    ///
    /// Used when a framework response carries a status the domain has no
    /// code for, such as `413 Payload Too Large`.
    #[must_use]
    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status.as_u16();
        self.error = reason_phrase(status);
        self
    }

    /// Status line carried by this envelope.
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Render as a JSON response, adding the Basic challenge to `401`s.
    pub fn into_response(self) -> HttpResponse {
        let status = self.status_code();
        let mut builder = HttpResponse::build(status);
        if status == StatusCode::UNAUTHORIZED {
            builder.insert_header((
                header::WWW_AUTHENTICATE,
                HeaderValue::from_static(BASIC_CHALLENGE),
            ));
        }
        builder.json(self)
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        envelope_for(self, false).into_response()
    }
}

/// `JsonConfig` error handler turning body failures into domain errors.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected request body");
    let domain = match &err {
        JsonPayloadError::ContentType => {
            Error::new(ErrorCode::UnsupportedMediaType, "Unsupported media type")
        }
        JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
            Error::invalid_request("Request body too large")
        }
        _ => Error::invalid_request("Malformed JSON request"),
    };
    domain.with_developer_message(err.to_string()).into()
}

/// `PathConfig` error handler for identifiers that do not parse.
pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected path parameter");
    Error::invalid_request("Invalid path parameter")
        .with_developer_message(err.to_string())
        .into()
}

#[cfg(test)]
mod tests;
