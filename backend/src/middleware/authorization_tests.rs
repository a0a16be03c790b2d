//! Tests for the authorization gate.

use super::*;
use crate::domain::ports::MockAuthenticator;
use crate::domain::{ErrorCode, Role};
use crate::inbound::http::auth::Authenticated;
use actix_web::http::StatusCode;
use actix_web::http::header::WWW_AUTHENTICATE;
use actix_web::body::BoxBody;
use actix_web::{App, HttpResponse, test as actix_test, web};
use rstest::rstest;

// base64("admin:devdojo") and base64("user:devdojo")
const ADMIN_BASIC: &str = "Basic YWRtaW46ZGV2ZG9qbw==";
const USER_BASIC: &str = "Basic dXNlcjpkZXZkb2pv";

fn authenticator() -> MockAuthenticator {
    let mut mock = MockAuthenticator::new();
    mock.expect_authenticate().returning(|credentials| {
        match (credentials.username(), credentials.password()) {
            ("admin", "devdojo") => Ok(Principal::new("admin", [Role::User, Role::Admin])),
            ("user", "devdojo") => Ok(Principal::new("user", [Role::User])),
            _ => Err(DomainError::unauthorized("invalid credentials")),
        }
    });
    mock
}

async fn whoami(caller: Authenticated) -> HttpResponse {
    HttpResponse::Ok().body(caller.principal().username().to_owned())
}

type GateResponse = ServiceResponse<EitherBody<BoxBody>>;

async fn send(mock: MockAuthenticator, req: actix_test::TestRequest) -> GateResponse {
    let app = actix_test::init_service(
        App::new()
            .wrap(AuthorizationGate::new(Arc::new(mock), AccessPolicy::default()))
            .route("/animes", web::get().to(whoami))
            .route("/animes", web::post().to(whoami))
            .route("/health/ready", web::get().to(HttpResponse::Ok))
            .route("/other", web::get().to(whoami)),
    )
    .await;
    actix_test::call_service(&app, req.to_request()).await
}

fn refusal(res: &GateResponse) -> (StatusCode, DomainError) {
    let domain = res
        .response()
        .error()
        .and_then(|err| err.as_error::<DomainError>())
        .cloned()
        .expect("refusal carries a domain error");
    (res.status(), domain)
}

#[actix_web::test]
async fn anonymous_requests_to_protected_paths_are_unauthorized() {
    let res = send(authenticator(), actix_test::TestRequest::get().uri("/animes")).await;
    let (status, error) = refusal(&res);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error.code(), ErrorCode::Unauthorized);
}

#[actix_web::test]
async fn unauthorized_refusals_carry_the_basic_challenge() {
    let res = send(authenticator(), actix_test::TestRequest::get().uri("/animes")).await;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert!(res.headers().contains_key(WWW_AUTHENTICATE));
}

#[actix_web::test]
async fn public_paths_need_no_credentials() {
    let mut mock = MockAuthenticator::new();
    mock.expect_authenticate().never();
    let res = send(mock, actix_test::TestRequest::get().uri("/health/ready"))
        .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn wrong_password_fails_even_on_public_paths() {
    let res = send(
        authenticator(),
        actix_test::TestRequest::get()
            .uri("/health/ready")
            // base64("admin:wrong")
            .insert_header((AUTHORIZATION, "Basic YWRtaW46d3Jvbmc=")),
    )
    .await;
    assert_eq!(refusal(&res).0, StatusCode::UNAUTHORIZED);
}

#[rstest]
#[case(USER_BASIC, "user")]
#[case(ADMIN_BASIC, "admin")]
#[actix_web::test]
async fn verified_principal_reaches_the_handler(#[case] header: &str, #[case] expected: &str) {
    let res = send(
        authenticator(),
        actix_test::TestRequest::get()
            .uri("/animes")
            .insert_header((AUTHORIZATION, header)),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let body = actix_test::read_body(res).await;
    assert_eq!(body.as_ref(), expected.as_bytes());
}

#[actix_web::test]
async fn users_cannot_write() {
    let res = send(
        authenticator(),
        actix_test::TestRequest::post()
            .uri("/animes")
            .insert_header((AUTHORIZATION, USER_BASIC)),
    )
    .await;
    let (status, error) = refusal(&res);
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error.message(), "Access is denied");
}

#[actix_web::test]
async fn admins_can_write() {
    let res = send(
        authenticator(),
        actix_test::TestRequest::post()
            .uri("/animes")
            .insert_header((AUTHORIZATION, ADMIN_BASIC)),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn other_paths_need_only_a_login() {
    let res = send(
        authenticator(),
        actix_test::TestRequest::get()
            .uri("/other")
            .insert_header((AUTHORIZATION, USER_BASIC)),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[rstest]
#[case("Basic !!!")]
#[case("Basic ")]
// base64("nocolon")
#[case("Basic bm9jb2xvbg==")]
#[actix_web::test]
async fn malformed_basic_headers_are_unauthorized(#[case] header: &str) {
    let mut mock = MockAuthenticator::new();
    mock.expect_authenticate().never();
    let res = send(
        mock,
        actix_test::TestRequest::get()
            .uri("/health/ready")
            .insert_header((AUTHORIZATION, header)),
    )
    .await;
    assert_eq!(refusal(&res).0, StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn other_schemes_are_treated_as_anonymous() {
    let mut mock = MockAuthenticator::new();
    mock.expect_authenticate().never();
    let res = send(
        mock,
        actix_test::TestRequest::get()
            .uri("/animes")
            .insert_header((AUTHORIZATION, "Bearer token")),
    )
    .await;
    let (status, error) = refusal(&res);
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        error.message(),
        "Full authentication is required to access this resource"
    );
}

#[actix_web::test]
async fn store_outages_surface_as_service_unavailable() {
    let mut mock = MockAuthenticator::new();
    mock.expect_authenticate()
        .returning(|_| Err(DomainError::service_unavailable("account store unavailable")));
    let res = send(
        mock,
        actix_test::TestRequest::get()
            .uri("/animes")
            .insert_header((AUTHORIZATION, USER_BASIC)),
    )
    .await;
    assert_eq!(refusal(&res).0, StatusCode::SERVICE_UNAVAILABLE);
}
