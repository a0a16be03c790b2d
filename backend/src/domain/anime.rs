//! Anime catalogue record.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Store-assigned anime identifier.
///
/// Serialises as a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimeId(i32);

impl AnimeId {
    /// Wrap a raw identifier.
    #[rustfmt::skip]
    pub const fn new(raw: i32) -> Self { Self(raw) }

    /// Raw integer value as stored.
    #[rustfmt::skip]
    pub const fn get(self) -> i32 { self.0 }
}

impl From<i32> for AnimeId {
    fn from(value: i32) -> Self {
        Self(value)
    }
}

impl fmt::Display for AnimeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Validation errors returned by [`Anime::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimeValidationError {
    /// The name is missing or the empty string.
    EmptyName,
}

impl fmt::Display for AnimeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "The anime name cannot be empty"),
        }
    }
}

impl std::error::Error for AnimeValidationError {}

/// A single catalogue entry.
///
/// `id` is `None` until the store assigns one. A JSON `null` or missing
/// `name` deserialises to the empty string so the emptiness check covers
/// both. Whitespace-only names are not considered empty.
///
/// # Examples
/// ```
/// use anime_backend::domain::{Anime, AnimeId};
///
/// let anime: Anime = serde_json::from_str(r#"{"name":"Naruto"}"#).unwrap();
/// assert_eq!(anime.id, None);
/// assert!(anime.validate().is_ok());
///
/// let stored = anime.with_id(AnimeId::new(3));
/// assert_eq!(serde_json::to_string(&stored).unwrap(), r#"{"id":3,"name":"Naruto"}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anime {
    /// Store-assigned identifier; ignored on create.
    #[serde(default)]
    pub id: Option<AnimeId>,
    /// Display name; must not be empty on create or update.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Anime {
    /// A record that has not been stored yet.
    pub fn unsaved(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
        }
    }

    /// Copy of this record carrying `id`.
    #[must_use]
    pub fn with_id(self, id: AnimeId) -> Self {
        Self {
            id: Some(id),
            ..self
        }
    }

    /// Copy of this record with the identifier cleared.
    #[must_use]
    pub fn without_id(self) -> Self {
        Self { id: None, ..self }
    }

    /// Check the name invariant.
    pub fn validate(&self) -> Result<(), AnimeValidationError> {
        if self.name.is_empty() {
            return Err(AnimeValidationError::EmptyName);
        }
        Ok(())
    }
}
