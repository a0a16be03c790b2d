//! Test helpers for inbound HTTP components.

use actix_web::HttpMessage;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};

use crate::domain::{Principal, Role};

/// Principal holding only the USER role.
pub fn user_principal() -> Principal {
    Principal::new("user", [Role::User])
}

/// Principal holding USER and ADMIN.
pub fn admin_principal() -> Principal {
    Principal::new("admin", [Role::User, Role::Admin])
}

/// Middleware that attaches a fixed principal the way the authorization gate
/// would, so handlers can be exercised without credentials.
#[derive(Clone)]
pub struct FixedPrincipal(pub Option<Principal>);

impl<S, B> Transform<S, ServiceRequest> for FixedPrincipal
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = FixedPrincipalMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(FixedPrincipalMiddleware {
            service,
            principal: self.0.clone(),
        }))
    }
}

pub struct FixedPrincipalMiddleware<S> {
    service: S,
    principal: Option<Principal>,
}

impl<S, B> Service<ServiceRequest> for FixedPrincipalMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    actix_web::dev::forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Some(principal) = &self.principal {
            req.extensions_mut().insert(principal.clone());
        }
        Box::pin(self.service.call(req))
    }
}
