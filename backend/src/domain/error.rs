//! Domain-level error type.
//!
//! Errors are transport agnostic. Inbound adapters decide how a [`ErrorCode`]
//! maps onto a status line and how the payload is rendered; the domain only
//! records what went wrong, for whom, and why.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::fmt::{self, Write as _};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TraceId;

/// Stable machine-readable error code describing the failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// Authentication failed or is missing.
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The resource exists but does not support the request method.
    MethodNotAllowed,
    /// The request body uses a media type the endpoint cannot read.
    UnsupportedMediaType,
    /// A backing service (database, credential store) is unreachable.
    ServiceUnavailable,
    /// An unexpected error occurred inside the domain.
    InternalError,
}

impl ErrorCode {
    /// Snake-case identifier used on the wire and in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRequest => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::Forbidden => "forbidden",
            Self::NotFound => "not_found",
            Self::MethodNotAllowed => "method_not_allowed",
            Self::UnsupportedMediaType => "unsupported_media_type",
            Self::ServiceUnavailable => "service_unavailable",
            Self::InternalError => "internal_error",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type Source = Arc<dyn std::error::Error + Send + Sync + 'static>;

/// Domain error payload.
///
/// Carries a user-facing `message`, an optional developer-facing message,
/// the trace identifier in scope when it was raised, and an optional cause
/// chain used to render stack traces on request.
///
/// # Examples
/// ```
/// use anime_backend::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("Anime not found")
///     .with_developer_message("no anime with id 7");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "Anime not found");
/// assert_eq!(err.developer_message(), "no anime with id 7");
/// ```
#[derive(Debug, Clone)]
pub struct Error {
    code: ErrorCode,
    message: String,
    developer_message: Option<String>,
    trace_id: Option<String>,
    details: Option<Value>,
    source: Option<Source>,
    backtrace: Arc<Backtrace>,
}

impl Error {
    /// Create a new error.
    ///
    /// Captures the current trace identifier if one is in scope, and a
    /// backtrace when `RUST_BACKTRACE` or `RUST_LIB_BACKTRACE` enables it.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            developer_message: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
            source: None,
            backtrace: Arc::new(Backtrace::capture()),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// Human-readable message returned to clients.
    pub fn message(&self) -> &str {
        self.message.as_str()
    }

    /// Developer-facing message; falls back to [`Error::message`].
    pub fn developer_message(&self) -> &str {
        self.developer_message.as_deref().unwrap_or(&self.message)
    }

    /// Correlation identifier captured when the error was raised.
    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    /// Supplementary error details for adapters.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Attach a developer-facing message.
    pub fn with_developer_message(mut self, message: impl Into<String>) -> Self {
        self.developer_message = Some(message.into());
        self
    }

    /// Attach a trace identifier to the error.
    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach structured details to the error.
    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Record the underlying cause.
    ///
    /// # Examples
    /// ```
    /// use anime_backend::domain::Error;
    ///
    /// let io = std::io::Error::other("socket closed");
    /// let err = Error::service_unavailable("store unavailable").with_source(io);
    /// assert!(err.stack_trace().contains("Caused by: socket closed"));
    /// ```
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Arc::new(source));
        self
    }

    /// Render the error, its cause chain, and any captured backtrace.
    pub fn stack_trace(&self) -> String {
        let mut rendered = format!("{}: {}", self.code, self.developer_message());
        let mut cause = std::error::Error::source(self);
        while let Some(err) = cause {
            // Writing into a String cannot fail.
            let _ = write!(rendered, "\nCaused by: {err}");
            cause = err.source();
        }
        if self.backtrace.status() == BacktraceStatus::Captured {
            let _ = write!(rendered, "\n{}", self.backtrace);
        }
        rendered
    }

    /// Convenience constructor for [`ErrorCode::InvalidRequest`].
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    /// Convenience constructor for [`ErrorCode::Unauthorized`].
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// Convenience constructor for [`ErrorCode::Forbidden`].
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// Convenience constructor for [`ErrorCode::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Convenience constructor for [`ErrorCode::ServiceUnavailable`].
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    /// Convenience constructor for [`ErrorCode::InternalError`].
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests;
