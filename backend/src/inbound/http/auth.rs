//! Principal extractor used by HTTP handlers.
//!
//! The authorization gate stores the verified [`Principal`] in the request
//! extensions. Handlers take [`Authenticated`] to read it and to apply their
//! own role checks on top of the path policy.

use std::future::{Ready, ready};

use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};

use crate::domain::{Error, Principal, Role};

/// The caller's verified identity.
#[derive(Debug, Clone)]
pub struct Authenticated(Principal);

impl Authenticated {
    pub fn principal(&self) -> &Principal {
        &self.0
    }

    /// Require `role`, failing with `403 Forbidden` otherwise.
    pub fn require_role(&self, role: Role) -> Result<&Principal, Error> {
        if self.0.has_role(role) {
            Ok(&self.0)
        } else {
            Err(Error::forbidden("Access is denied")
                .with_developer_message(format!("{role} is required")))
        }
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let principal = req.extensions().get::<Principal>().cloned();
        ready(principal.map(Self).ok_or_else(|| {
            Error::unauthorized("Full authentication is required to access this resource")
        }))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use actix_web::test::TestRequest;

    async fn extract(req: &HttpRequest) -> Result<Authenticated, Error> {
        Authenticated::from_request(req, &mut Payload::None).await
    }

    #[actix_web::test]
    async fn missing_principal_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        let err = extract(&req).await.expect_err("no principal");
        assert_eq!(err.code(), ErrorCode::Unauthorized);
    }

    #[actix_web::test]
    async fn role_checks_follow_granted_roles() {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut()
            .insert(Principal::new("user", [Role::User]));

        let caller = extract(&req).await.expect("principal present");
        assert_eq!(caller.principal().username(), "user");
        assert!(caller.require_role(Role::User).is_ok());
        let err = caller.require_role(Role::Admin).expect_err("not admin");
        assert_eq!(err.code(), ErrorCode::Forbidden);
    }
}
