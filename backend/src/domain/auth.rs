//! Credentials presented by callers.
//!
//! Header parsing stays in the inbound adapter; this type only enforces the
//! shape the domain relies on before a lookup is attempted.

use std::fmt;

use zeroize::Zeroizing;

/// Domain error returned when presented credentials are unusable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialsValidationError {
    /// Username was missing or blank once trimmed.
    EmptyUsername,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for CredentialsValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for CredentialsValidationError {}

/// Username and password decoded from an `Authorization: Basic` header.
///
/// ## Invariants
/// - `username` is trimmed and non-empty.
/// - `password` is non-empty, keeps caller whitespace, and is wiped on drop.
///
/// # Examples
/// ```
/// use anime_backend::domain::BasicCredentials;
///
/// let creds = BasicCredentials::try_from_parts(" admin ", "devdojo").unwrap();
/// assert_eq!(creds.username(), "admin");
/// assert_eq!(creds.password(), "devdojo");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct BasicCredentials {
    username: String,
    password: Zeroizing<String>,
}

impl BasicCredentials {
    pub fn try_from_parts(
        username: &str,
        password: &str,
    ) -> Result<Self, CredentialsValidationError> {
        let normalized = username.trim();
        if normalized.is_empty() {
            return Err(CredentialsValidationError::EmptyUsername);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            username: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

impl fmt::Debug for BasicCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BasicCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "pw", CredentialsValidationError::EmptyUsername)]
    #[case("   ", "pw", CredentialsValidationError::EmptyUsername)]
    #[case("user", "", CredentialsValidationError::EmptyPassword)]
    fn rejects_blank_parts(
        #[case] username: &str,
        #[case] password: &str,
        #[case] expected: CredentialsValidationError,
    ) {
        let err = BasicCredentials::try_from_parts(username, password)
            .expect_err("blank inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn keeps_password_whitespace() {
        let creds = BasicCredentials::try_from_parts("user", " pass ").expect("valid");
        assert_eq!(creds.password(), " pass ");
    }

    #[rstest]
    fn debug_output_hides_password() {
        let creds = BasicCredentials::try_from_parts("user", "devdojo").expect("valid");
        assert!(!format!("{creds:?}").contains("devdojo"));
    }
}
