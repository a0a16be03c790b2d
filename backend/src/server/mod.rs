//! Server construction and middleware wiring.

mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod state_builders;

pub use config::ServerConfig;
#[cfg(feature = "metrics")]
pub use metrics::make_metrics;
pub use state_builders::{
    AppPorts, DEMO_ADMIN, DEMO_USER, SeedError, build_ports, demo_accounts, seed_demo_accounts,
};

#[cfg(feature = "metrics")]
use metrics::MetricsLayer;

use actix_web::body::BoxBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header;
use actix_web::{App, HttpResponse, HttpServer, web};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::doc::ApiDoc;
use crate::domain::AccessPolicy;
use crate::domain::ports::Authenticator;
use crate::inbound::http::animes;
use crate::inbound::http::error::{json_error_handler, path_error_handler};
use crate::inbound::http::health::{self, HealthState};
use crate::inbound::http::state::HttpState;
use crate::middleware::{AuthorizationGate, NormalizeErrors, Trace};

/// Everything one worker's [`App`] needs.
#[derive(Clone)]
pub struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    authenticator: Arc<dyn Authenticator>,
    policy: AccessPolicy,
}

impl AppDependencies {
    /// Dependencies using the default access policy.
    pub fn new(health_state: web::Data<HealthState>, ports: &AppPorts) -> Self {
        Self {
            health_state,
            http_state: web::Data::new(ports.http_state()),
            authenticator: Arc::clone(&ports.authenticator),
            policy: AccessPolicy::default(),
        }
    }

    #[must_use]
    pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
        self.policy = policy;
        self
    }
}

async fn swagger_ui_redirect() -> HttpResponse {
    HttpResponse::PermanentRedirect()
        .insert_header((header::LOCATION, "/swagger-ui/"))
        .finish()
}

/// Assemble the application: routes, documentation, extractor error
/// handlers and the middleware stack.
///
/// # Examples
/// ```
/// use actix_web::web;
/// use anime_backend::inbound::http::health::HealthState;
/// use anime_backend::server::{AppDependencies, AppPorts, build_app};
///
/// let deps = AppDependencies::new(web::Data::new(HealthState::new()), &AppPorts::in_memory());
/// let _app = build_app(deps);
/// ```
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<BoxBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        authenticator,
        policy,
    } = deps;

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .wrap(AuthorizationGate::new(authenticator, policy))
        .wrap(NormalizeErrors)
        .wrap(Trace)
        .configure(animes::configure)
        .configure(health::configure)
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
        )
        .route("/swagger-ui.html", web::get().to(swagger_ui_redirect))
}

/// Construct an Actix HTTP server over `ports`.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
    ports: AppPorts,
) -> std::io::Result<Server> {
    let deps = AppDependencies::new(health_state.clone(), &ports);
    let ServerConfig {
        bind_addr,
        db_pool: _,
        #[cfg(feature = "metrics")]
        prometheus,
    } = config;

    #[cfg(feature = "metrics")]
    let metrics_layer = MetricsLayer::from_option(prometheus);

    let server = HttpServer::new(move || {
        let app = build_app(deps.clone());

        #[cfg(feature = "metrics")]
        let app = app.wrap(metrics_layer.clone());

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
