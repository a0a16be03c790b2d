//! OpenAPI schema definitions for domain and envelope types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their JSON shape and are registered with utoipa under
//! the domain type names.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::Anime`].
#[derive(ToSchema)]
#[schema(as = Anime)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct AnimeSchema {
    /// Store-assigned identifier. Ignored on create.
    #[schema(example = 1)]
    id: Option<i32>,
    /// Display name. Must not be empty on create or update.
    #[schema(example = "Naruto")]
    name: String,
}

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    #[schema(rename = "unauthorized")]
    Unauthorized,
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    #[schema(rename = "method_not_allowed")]
    MethodNotAllowed,
    #[schema(rename = "unsupported_media_type")]
    UnsupportedMediaType,
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::inbound::http::error::ErrorEnvelope`].
///
/// Body of every failing response.
#[derive(ToSchema)]
#[schema(as = ErrorEnvelope)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorEnvelopeSchema {
    /// RFC 3339 time the failure was rendered.
    #[schema(example = "2024-05-01T12:00:00.000Z")]
    timestamp: String,
    /// Request path.
    #[schema(example = "/animes/99")]
    path: String,
    /// HTTP status code.
    #[schema(example = 404)]
    status: u16,
    /// HTTP reason phrase.
    #[schema(example = "Not Found")]
    error: String,
    /// Stable machine-readable error code.
    code: ErrorCodeSchema,
    /// Human-readable message.
    #[schema(example = "Anime not found")]
    message: String,
    /// Message aimed at developers; redacted for internal errors.
    developer_message: String,
    /// Request correlation identifier.
    trace_id: Option<String>,
    /// Structured detail about the failure.
    details: Option<serde_json::Value>,
    /// Cause chain, present only when `trace=true` was requested.
    stack_trace: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn anime_schema_is_registered_under_domain_name() {
        assert_eq!(AnimeSchema::name(), "Anime");
        let json = schema_to_json::<AnimeSchema>();
        assert!(json.contains("\"name\""));
        assert!(json.contains("\"id\""));
    }

    #[test]
    fn envelope_schema_uses_camel_case_fields() {
        assert_eq!(ErrorEnvelopeSchema::name(), "ErrorEnvelope");
        let json = schema_to_json::<ErrorEnvelopeSchema>();
        for field in ["developerMessage", "traceId", "stackTrace", "timestamp"] {
            assert!(json.contains(field), "missing {field}");
        }
    }

    #[test]
    fn error_code_schema_lists_every_code() {
        let json = schema_to_json::<ErrorCodeSchema>();
        for code in [
            "invalid_request",
            "unauthorized",
            "forbidden",
            "not_found",
            "method_not_allowed",
            "unsupported_media_type",
            "service_unavailable",
            "internal_error",
        ] {
            assert!(json.contains(code), "missing {code}");
        }
    }
}
