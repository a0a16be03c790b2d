//! Salted password digests for stored accounts.
//!
//! Stored form: `{bcrypt}$2a$<cost>$<salt+digest>`, the delegating-encoder
//! layout used by the `devdojo_user.password` column.

use std::fmt;
use std::str::FromStr;

use bcrypt::Version;
use rand::RngCore;

const SCHEME_PREFIX: &str = "{bcrypt}";
const SALT_LEN: usize = 16;
const ENCODED_TAIL_LEN: usize = 53;

/// Work factor used for new hashes.
pub const DEFAULT_COST: u32 = 10;

/// Errors raised when a hash cannot be produced or decoded.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    #[error("password hash must start with {SCHEME_PREFIX}")]
    UnknownScheme,
    #[error("password hash is not a bcrypt string")]
    Malformed,
    #[error("password hashing failed: {0}")]
    Hashing(String),
}

/// Parsed password hash.
///
/// # Examples
/// ```
/// use anime_backend::domain::PasswordHash;
///
/// let hash = PasswordHash::generate_with_cost("devdojo", 4).unwrap();
/// assert!(hash.verify("devdojo"));
/// assert!(!hash.verify("wrong"));
///
/// let stored = hash.to_string();
/// let parsed: PasswordHash = stored.parse().unwrap();
/// assert!(parsed.verify("devdojo"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    encoded: String,
}

impl PasswordHash {
    /// Hash `password` at [`DEFAULT_COST`] under a fresh random salt.
    pub fn generate(password: &str) -> Result<Self, PasswordHashError> {
        Self::generate_with_cost(password, DEFAULT_COST)
    }

    /// Hash `password` at `cost` under a fresh random salt.
    pub fn generate_with_cost(password: &str, cost: u32) -> Result<Self, PasswordHashError> {
        let mut salt = [0_u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self::with_salt(password, cost, salt)
    }

    /// Hash `password` under a caller-provided salt.
    pub fn with_salt(
        password: &str,
        cost: u32,
        salt: [u8; SALT_LEN],
    ) -> Result<Self, PasswordHashError> {
        let parts = bcrypt::hash_with_salt(password, cost, salt)
            .map_err(|err| PasswordHashError::Hashing(err.to_string()))?;
        Ok(Self {
            encoded: parts.format_for_version(Version::TwoA),
        })
    }

    /// Check `candidate` against the stored digest.
    pub fn verify(&self, candidate: &str) -> bool {
        bcrypt::verify(candidate, &self.encoded).unwrap_or(false)
    }
}

/// `$2?$NN$<53 chars>`
fn is_bcrypt(encoded: &str) -> bool {
    let mut fields = encoded.split('$');
    match (
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
        fields.next(),
    ) {
        (Some(""), Some("2a" | "2b" | "2x" | "2y"), Some(cost), Some(tail), None) => {
            cost.len() == 2
                && cost.bytes().all(|b| b.is_ascii_digit())
                && tail.len() == ENCODED_TAIL_LEN
        }
        _ => false,
    }
}

impl FromStr for PasswordHash {
    type Err = PasswordHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let encoded = s
            .strip_prefix(SCHEME_PREFIX)
            .ok_or(PasswordHashError::UnknownScheme)?;
        if !is_bcrypt(encoded) {
            return Err(PasswordHashError::Malformed);
        }
        Ok(Self {
            encoded: encoded.to_owned(),
        })
    }
}

impl fmt::Display for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SCHEME_PREFIX}{}", self.encoded)
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}
