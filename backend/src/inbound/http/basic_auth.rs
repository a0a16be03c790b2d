//! `Authorization: Basic` header parsing.
//!
//! Other schemes are treated as if no header was sent. A Basic header that
//! cannot be decoded is rejected outright.

use actix_web::http::header::HeaderValue;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use zeroize::Zeroizing;

use crate::domain::{BasicCredentials, Error};

const BASIC_SCHEME: &str = "Basic";

fn malformed(reason: &str) -> Error {
    Error::unauthorized("Invalid basic authentication token")
        .with_developer_message(format!("malformed Basic credentials: {reason}"))
}

/// Extract Basic credentials from an `Authorization` header value.
///
/// Returns `Ok(None)` when the header is absent or uses another scheme.
///
/// # Examples
/// ```
/// use actix_web::http::header::HeaderValue;
/// use anime_backend::inbound::http::basic_auth::parse_authorization;
///
/// // "admin:devdojo"
/// let header = HeaderValue::from_static("Basic YWRtaW46ZGV2ZG9qbw==");
/// let creds = parse_authorization(Some(&header)).unwrap().unwrap();
/// assert_eq!(creds.username(), "admin");
///
/// let bearer = HeaderValue::from_static("Bearer token");
/// assert!(parse_authorization(Some(&bearer)).unwrap().is_none());
/// ```
pub fn parse_authorization(value: Option<&HeaderValue>) -> Result<Option<BasicCredentials>, Error> {
    let Some(value) = value else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| malformed("header is not visible ASCII"))?
        .trim();
    let (scheme, token) = raw.split_once(' ').unwrap_or((raw, ""));
    if !scheme.eq_ignore_ascii_case(BASIC_SCHEME) {
        return Ok(None);
    }

    let token = token.trim();
    if token.is_empty() {
        return Err(malformed("missing token"));
    }
    let decoded = Zeroizing::new(
        STANDARD
            .decode(token)
            .map_err(|_| malformed("token is not base64"))?,
    );
    let text = std::str::from_utf8(&decoded).map_err(|_| malformed("token is not UTF-8"))?;
    let (username, password) = text
        .split_once(':')
        .ok_or_else(|| malformed("token has no `:` separator"))?;
    BasicCredentials::try_from_parts(username, password)
        .map(Some)
        .map_err(|err| malformed(&err.to_string()))
}
