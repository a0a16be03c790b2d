//! Authenticated identities, roles, and stored account records.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use tracing::debug;

use super::PasswordHash;

/// Authority granted to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Role {
    /// May read the catalogue.
    User,
    /// May modify the catalogue.
    Admin,
}

impl Role {
    /// Authority string as stored and logged, e.g. `ROLE_ADMIN`.
    pub fn authority(self) -> &'static str {
        match self {
            Self::User => "ROLE_USER",
            Self::Admin => "ROLE_ADMIN",
        }
    }

    /// Parse a comma-separated authority list such as `ROLE_ADMIN,ROLE_USER`.
    ///
    /// Blank entries are skipped. Authorities this service does not know
    /// grant nothing and are dropped.
    ///
    /// # Examples
    /// ```
    /// use anime_backend::domain::Role;
    ///
    /// let roles = Role::parse_authorities("ROLE_ADMIN, ROLE_MANAGER");
    /// assert!(roles.contains(&Role::Admin));
    /// assert_eq!(roles.len(), 1);
    /// ```
    pub fn parse_authorities(raw: &str) -> BTreeSet<Self> {
        raw.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .filter_map(|part| {
                part.parse::<Self>()
                    .inspect_err(|err| debug!(%err, "ignoring unknown authority"))
                    .ok()
            })
            .collect()
    }

    /// Render roles as a comma-separated authority list.
    pub fn join_authorities(roles: &BTreeSet<Self>) -> String {
        roles
            .iter()
            .map(|role| role.authority())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.authority())
    }
}

/// Error returned when a role name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown role: {0}")]
pub struct UnknownRole(pub String);

impl FromStr for Role {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let bare = upper.strip_prefix("ROLE_").unwrap_or(&upper);
        match bare {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(UnknownRole(s.to_owned())),
        }
    }
}

/// Identity attached to a request once its credentials have been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    username: String,
    roles: BTreeSet<Role>,
}

impl Principal {
    pub fn new(username: impl Into<String>, roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            username: username.into(),
            roles: roles.into_iter().collect(),
        }
    }

    pub fn username(&self) -> &str {
        self.username.as_str()
    }

    pub fn roles(&self) -> &BTreeSet<Role> {
        &self.roles
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Stored credential record looked up during authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAccount {
    pub username: String,
    pub password_hash: PasswordHash,
    pub roles: BTreeSet<Role>,
}

impl UserAccount {
    /// Identity granted to a caller who proved knowledge of this account.
    pub fn principal(&self) -> Principal {
        Principal::new(self.username.clone(), self.roles.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("USER", Role::User)]
    #[case("user", Role::User)]
    #[case("ROLE_USER", Role::User)]
    #[case("ADMIN", Role::Admin)]
    #[case(" role_admin ", Role::Admin)]
    fn roles_parse_with_or_without_prefix(#[case] raw: &str, #[case] expected: Role) {
        assert_eq!(raw.parse::<Role>(), Ok(expected));
    }

    #[rstest]
    #[case("ROOT")]
    #[case("ROLE_")]
    #[case("")]
    fn unknown_roles_are_rejected(#[case] raw: &str) {
        assert!(raw.parse::<Role>().is_err());
    }

    #[rstest]
    fn authority_lists_round_trip_through_storage_format() {
        let roles = Role::parse_authorities("ROLE_USER,,ROLE_ADMIN");
        assert_eq!(Role::join_authorities(&roles), "ROLE_USER,ROLE_ADMIN");
    }

    #[rstest]
    #[case("ROLE_ADMIN,ROLE_MANAGER", &[Role::Admin])]
    #[case("ROLE_MANAGER", &[])]
    #[case("ROLE_USER, reporting ,ROLE_ADMIN", &[Role::User, Role::Admin])]
    fn unknown_authorities_grant_nothing(#[case] raw: &str, #[case] expected: &[Role]) {
        let roles = Role::parse_authorities(raw);
        assert_eq!(roles, expected.iter().copied().collect::<BTreeSet<_>>());
    }

    #[rstest]
    fn principal_reports_granted_roles() {
        let principal = Principal::new("user", [Role::User]);
        assert!(principal.has_role(Role::User));
        assert!(!principal.has_role(Role::Admin));
        assert_eq!(principal.username(), "user");
    }
}
