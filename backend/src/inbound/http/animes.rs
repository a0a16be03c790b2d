//! Anime catalogue HTTP handlers.
//!
//! ```text
//! GET    /animes
//! GET    /animes/{id}
//! POST   /animes        {"name":"Naruto"}
//! POST   /animes/batch  [{"name":"Naruto"},{"name":"Bleach"}]
//! PUT    /animes/{id}   {"name":"Naruto Shippuden"}
//! DELETE /animes/{id}
//! ```
//!
//! The authorization gate has already applied the path policy by the time a
//! handler runs; handlers repeat the role check through [`Authenticated`].

use actix_web::{HttpResponse, web};
use serde_json::json;

use crate::domain::{Anime, AnimeId, AnimeValidationError, Error, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{AnimeSchema, ErrorEnvelopeSchema};
use crate::inbound::http::state::HttpState;

fn validation_error(err: AnimeValidationError) -> Error {
    match err {
        AnimeValidationError::EmptyName => Error::invalid_request(err.to_string())
            .with_details(json!({ "field": "name", "code": "empty_name" })),
    }
}

/// Register the catalogue resources.
///
/// Resources are declared explicitly so an unsupported method on a known
/// path answers `405` rather than `404`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/animes")
            .route(web::get().to(list_animes))
            .route(web::post().to(create_anime)),
    )
    .service(web::resource("/animes/batch").route(web::post().to(create_animes_batch)))
    .service(
        web::resource("/animes/{id}")
            .route(web::get().to(get_anime))
            .route(web::put().to(update_anime))
            .route(web::delete().to(delete_anime)),
    );
}

/// List every anime.
#[utoipa::path(
    get,
    path = "/animes",
    responses(
        (status = 200, description = "All animes", body = [AnimeSchema]),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema)
    ),
    tags = ["animes"],
    operation_id = "listAnimes"
)]
pub async fn list_animes(
    state: web::Data<HttpState>,
    caller: Authenticated,
) -> ApiResult<web::Json<Vec<Anime>>> {
    caller.require_role(Role::User)?;
    state.animes.find_all().await.map(web::Json)
}

/// Fetch one anime by id.
#[utoipa::path(
    get,
    path = "/animes/{id}",
    params(("id" = i32, Path, description = "Anime identifier")),
    responses(
        (status = 200, description = "The anime", body = AnimeSchema),
        (status = 400, description = "Identifier is not an integer", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 404, description = "Anime not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["animes"],
    operation_id = "getAnime"
)]
pub async fn get_anime(
    state: web::Data<HttpState>,
    _caller: Authenticated,
    path: web::Path<i32>,
) -> ApiResult<web::Json<Anime>> {
    let id = AnimeId::new(path.into_inner());
    state.animes.find_by_id(id).await.map(web::Json)
}

/// Create one anime. Any `id` in the body is ignored.
#[utoipa::path(
    post,
    path = "/animes",
    request_body = AnimeSchema,
    responses(
        (status = 201, description = "Created", body = AnimeSchema),
        (status = 400, description = "Empty name or malformed body", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema)
    ),
    tags = ["animes"],
    operation_id = "createAnime"
)]
pub async fn create_anime(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<Anime>,
) -> ApiResult<HttpResponse> {
    caller.require_role(Role::Admin)?;
    let anime = payload.into_inner().without_id();
    anime.validate().map_err(validation_error)?;
    let saved = state.anime_commands.save(anime).await?;
    Ok(HttpResponse::Created().json(saved))
}

/// Create several animes in one transaction.
///
/// Names are checked only after the batch is stored, so a `400` here may
/// leave records behind.
#[utoipa::path(
    post,
    path = "/animes/batch",
    request_body = [AnimeSchema],
    responses(
        (status = 201, description = "Created", body = [AnimeSchema]),
        (status = 400, description = "A record had an empty name", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema)
    ),
    tags = ["animes"],
    operation_id = "createAnimesBatch"
)]
pub async fn create_animes_batch(
    state: web::Data<HttpState>,
    caller: Authenticated,
    payload: web::Json<Vec<Anime>>,
) -> ApiResult<HttpResponse> {
    caller.require_role(Role::Admin)?;
    let animes = payload.into_inner().into_iter().map(Anime::without_id).collect();
    let saved = state.anime_commands.save_all(animes).await?;
    Ok(HttpResponse::Created().json(saved))
}

/// Replace an existing anime.
#[utoipa::path(
    put,
    path = "/animes/{id}",
    params(("id" = i32, Path, description = "Anime identifier")),
    request_body = AnimeSchema,
    responses(
        (status = 204, description = "Updated"),
        (status = 400, description = "Empty name or malformed body", body = ErrorEnvelopeSchema),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema),
        (status = 404, description = "Anime not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["animes"],
    operation_id = "updateAnime"
)]
pub async fn update_anime(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i32>,
    payload: web::Json<Anime>,
) -> ApiResult<HttpResponse> {
    caller.require_role(Role::Admin)?;
    let anime = payload.into_inner();
    anime.validate().map_err(validation_error)?;
    state
        .anime_commands
        .update(AnimeId::new(path.into_inner()), anime)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Delete an anime.
#[utoipa::path(
    delete,
    path = "/animes/{id}",
    params(("id" = i32, Path, description = "Anime identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 401, description = "Unauthorised", body = ErrorEnvelopeSchema),
        (status = 403, description = "Forbidden", body = ErrorEnvelopeSchema),
        (status = 404, description = "Anime not found", body = ErrorEnvelopeSchema)
    ),
    tags = ["animes"],
    operation_id = "deleteAnime"
)]
pub async fn delete_anime(
    state: web::Data<HttpState>,
    caller: Authenticated,
    path: web::Path<i32>,
) -> ApiResult<HttpResponse> {
    caller.require_role(Role::Admin)?;
    state
        .anime_commands
        .delete(AnimeId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "animes_tests.rs"]
mod tests;
