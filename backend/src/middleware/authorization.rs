//! Authorization gate applying the access policy to every request.
//!
//! The gate decodes `Authorization: Basic` credentials, verifies them through
//! the [`Authenticator`] port and evaluates the [`AccessPolicy`] for the
//! request method and path. Allowed requests continue with the verified
//! [`Principal`] in the request extensions; refused ones are answered with
//! `401` or `403` before any handler runs. The refusal response carries the
//! domain error so the error normaliser can render it.
//!
//! Presented credentials are always verified, so a wrong password fails with
//! `401` even on public paths.

use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;

use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{Error, HttpMessage};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{debug, warn};

use crate::domain::ports::Authenticator;
use crate::domain::{AccessPolicy, Decision, Error as DomainError, Principal, RequestMethod};
use crate::inbound::http::basic_auth::parse_authorization;

/// Middleware factory enforcing an [`AccessPolicy`].
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use actix_web::App;
/// use anime_backend::domain::{AccessPolicy, AccountAuthenticator};
/// use anime_backend::middleware::AuthorizationGate;
/// use anime_backend::outbound::memory::InMemoryUserAccountRepository;
///
/// let accounts = Arc::new(InMemoryUserAccountRepository::new());
/// let gate = AuthorizationGate::new(
///     Arc::new(AccountAuthenticator::new(accounts)),
///     AccessPolicy::default(),
/// );
/// let _app = App::new().wrap(gate);
/// ```
#[derive(Clone)]
pub struct AuthorizationGate {
    authenticator: Arc<dyn Authenticator>,
    policy: Arc<AccessPolicy>,
}

impl AuthorizationGate {
    pub fn new(authenticator: Arc<dyn Authenticator>, policy: AccessPolicy) -> Self {
        Self {
            authenticator,
            policy: Arc::new(policy),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthorizationGate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthorizationMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthorizationMiddleware {
            service: Rc::new(service),
            authenticator: Arc::clone(&self.authenticator),
            policy: Arc::clone(&self.policy),
        }))
    }
}

/// Service wrapper produced by [`AuthorizationGate`].
pub struct AuthorizationMiddleware<S> {
    service: Rc<S>,
    authenticator: Arc<dyn Authenticator>,
    policy: Arc<AccessPolicy>,
}

/// Verify any presented credentials. `Ok(None)` means the caller is
/// anonymous.
async fn resolve_principal(
    authenticator: &dyn Authenticator,
    req: &ServiceRequest,
) -> Result<Option<Principal>, DomainError> {
    let credentials = parse_authorization(req.headers().get(AUTHORIZATION)).inspect_err(|_| {
        warn!(path = %req.path(), "rejected malformed Authorization header");
    })?;
    let Some(credentials) = credentials else {
        return Ok(None);
    };
    let principal = authenticator.authenticate(&credentials).await?;
    Ok(Some(principal))
}

impl<S, B> Service<ServiceRequest> for AuthorizationMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let authenticator = Arc::clone(&self.authenticator);
        let policy = Arc::clone(&self.policy);

        Box::pin(async move {
            let principal = match resolve_principal(authenticator.as_ref(), &req).await {
                Ok(principal) => principal,
                Err(error) => return Ok(req.error_response(error).map_into_right_body()),
            };
            let method = match RequestMethod::from_str(req.method().as_str()) {
                Ok(method) => method,
                Err(never) => match never {},
            };

            match policy.evaluate(method, req.path(), principal.as_ref()) {
                Decision::Allow => {
                    debug!(
                        path = %req.path(),
                        user = principal.as_ref().map(Principal::username),
                        "request allowed"
                    );
                    if let Some(principal) = principal {
                        req.extensions_mut().insert(principal);
                    }
                    service
                        .call(req)
                        .await
                        .map(ServiceResponse::map_into_left_body)
                }
                Decision::Deny(denial) => {
                    debug!(
                        path = %req.path(),
                        user = principal.as_ref().map(Principal::username),
                        ?denial,
                        "request denied"
                    );
                    Ok(req
                        .error_response(DomainError::from(denial))
                        .map_into_right_body())
                }
            }
        })
    }
}

#[cfg(test)]
#[path = "authorization_tests.rs"]
mod tests;
