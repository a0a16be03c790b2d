//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers the catalogue and health endpoints, the schema
//! wrappers from [`crate::inbound::http::schemas`] and the HTTP Basic
//! security scheme. The document is served at `/api-docs/openapi.json`,
//! browsed through Swagger UI at `/swagger-ui/`, and exported by the
//! `openapi-dump` binary.

use crate::inbound::http::schemas::{AnimeSchema, ErrorCodeSchema, ErrorEnvelopeSchema};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the security scheme every catalogue operation requires.
pub const BASIC_AUTH_SCHEME: &str = "BasicAuth";

/// Enrich the generated document with the Basic security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BASIC_AUTH_SCHEME,
            SecurityScheme::Http(Http::new(HttpAuthScheme::Basic)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Anime catalogue API",
        description = "CRUD access to the anime catalogue. Reads need ROLE_USER, writes need ROLE_ADMIN."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BasicAuth" = [])),
    paths(
        crate::inbound::http::animes::list_animes,
        crate::inbound::http::animes::get_anime,
        crate::inbound::http::animes::create_anime,
        crate::inbound::http::animes::create_animes_batch,
        crate::inbound::http::animes::update_anime,
        crate::inbound::http::animes::delete_anime,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(AnimeSchema, ErrorEnvelopeSchema, ErrorCodeSchema)),
    tags(
        (name = "animes", description = "Anime catalogue operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
