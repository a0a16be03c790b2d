//! Domain primitives, services, and ports.
//!
//! Purpose: hold the catalogue entity, the authorization policy, and the
//! transport-agnostic error type. Nothing here depends on actix-web or
//! Diesel; adapters live under `inbound` and `outbound`.
//!
//! Public surface:
//! - Anime / AnimeId: catalogue record and its store-assigned identifier.
//! - AccessPolicy: ordered rules deciding who may call what.
//! - AnimeService / AccountAuthenticator: driving port implementations.
//! - Error / ErrorCode: failure payload shared by every layer.

pub mod access_policy;
pub mod anime;
pub mod anime_service;
pub mod auth;
pub mod authentication_service;
pub mod error;
pub mod password;
pub mod ports;
pub mod principal;
pub mod trace_id;

pub use self::access_policy::{
    AccessPolicy, AccessRule, Decision, Denial, PathPattern, RequestMethod,
};
pub use self::anime::{Anime, AnimeId, AnimeValidationError};
pub use self::anime_service::AnimeService;
pub use self::auth::{BasicCredentials, CredentialsValidationError};
pub use self::authentication_service::AccountAuthenticator;
pub use self::error::{Error, ErrorCode};
pub use self::password::{PasswordHash, PasswordHashError};
pub use self::principal::{Principal, Role, UnknownRole, UserAccount};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use anime_backend::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("Anime not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
