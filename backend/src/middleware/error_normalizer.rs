//! Single exit point for failing requests.
//!
//! [`NormalizeErrors`] wraps the whole application. Any response with a 4xx
//! or 5xx status is re-rendered as an
//! [`ErrorEnvelope`](crate::inbound::http::error::ErrorEnvelope) carrying the
//! request path. Adding `trace=true` to the query string attaches the stack
//! trace and lifts redaction of internal errors.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::StatusCode;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, error, warn};

use crate::domain::Error as DomainError;
use crate::inbound::http::error::{code_for_status, envelope_for};

const TRACE_PARAMETER: &str = "trace=true";

/// Whether the query string asks for a stack trace, i.e. contains
/// `trace=true` anywhere.
///
/// # Examples
/// ```
/// use anime_backend::middleware::error_normalizer::trace_requested;
///
/// assert!(trace_requested("page=2&trace=true"));
/// assert!(trace_requested("notrace=true"));
/// assert!(!trace_requested("trace=TRUE"));
/// assert!(!trace_requested(""));
/// ```
pub fn trace_requested(query: &str) -> bool {
    !query.is_empty() && query.contains(TRACE_PARAMETER)
}

/// Recover the domain error behind a failure, if there is one.
///
/// Failures raised outside the domain are rebuilt from their status and
/// returned alongside it so the envelope can keep the original status line.
fn domain_error_for(
    failure: Option<&Error>,
    status: StatusCode,
) -> (DomainError, Option<StatusCode>) {
    if let Some(domain) = failure.and_then(|err| err.as_error::<DomainError>()) {
        return (domain.clone(), None);
    }
    let message = status.canonical_reason().unwrap_or("Unknown Status");
    let rebuilt = DomainError::new(code_for_status(status), message);
    let rebuilt = match failure {
        Some(err) => rebuilt.with_developer_message(err.to_string()),
        None => rebuilt,
    };
    (rebuilt, Some(status))
}

fn render(
    failure: Option<&Error>,
    status: StatusCode,
    path: &str,
    trace: bool,
) -> actix_web::HttpResponse<BoxBody> {
    let (domain, original_status) = domain_error_for(failure, status);
    let mut envelope = envelope_for(&domain, trace).at_path(path);
    if let Some(status) = original_status {
        envelope = envelope.with_status(status);
    }

    let rendered = envelope.status_code();
    let trace_id = envelope.trace_id.as_deref().unwrap_or("-");
    if rendered.is_server_error() {
        error!(
            status = rendered.as_u16(),
            code = %envelope.code,
            trace_id,
            path,
            error = %domain.stack_trace(),
            "request failed"
        );
    } else {
        debug!(
            status = rendered.as_u16(),
            code = %envelope.code,
            trace_id,
            path,
            "request rejected"
        );
    }
    envelope.into_response()
}

/// Middleware factory rendering every failure as a JSON envelope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use anime_backend::middleware::NormalizeErrors;
///
/// let app = App::new().wrap(NormalizeErrors);
/// ```
#[derive(Clone)]
pub struct NormalizeErrors;

impl<S, B> Transform<S, ServiceRequest> for NormalizeErrors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = NormalizeErrorsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(NormalizeErrorsMiddleware { service }))
    }
}

/// Service wrapper produced by [`NormalizeErrors`].
pub struct NormalizeErrorsMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for NormalizeErrorsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let path = req.path().to_owned();
        let trace = trace_requested(req.query_string());
        let fut = self.service.call(req);

        Box::pin(async move {
            let res = match fut.await {
                Ok(res) => res,
                Err(err) => {
                    // Rendered by actix through `ResponseError`.
                    warn!(path = %path, error = %err, "failure escaped the service");
                    return Err(err);
                }
            };
            let status = res.status();
            if !(status.is_client_error() || status.is_server_error()) {
                return Ok(res.map_into_boxed_body());
            }
            let response = render(res.response().error(), status, &path, trace);
            let (req, _) = res.into_parts();
            Ok(ServiceResponse::new(req, response))
        })
    }
}

#[cfg(test)]
#[path = "error_normalizer_tests.rs"]
mod tests;
