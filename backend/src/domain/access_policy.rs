//! Ordered request authorization rules.
//!
//! The policy is evaluated top to bottom and the first rule whose method and
//! path match decides. It knows nothing about the HTTP framework: callers
//! translate the request line into [`RequestMethod`] and a path string.

use std::fmt;
use std::str::FromStr;

use super::{Error, Principal, Role};

/// HTTP verbs understood by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Options,
    Other,
}

impl FromStr for RequestMethod {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_ascii_uppercase().as_str() {
            "GET" => Self::Get,
            "HEAD" => Self::Head,
            "POST" => Self::Post,
            "PUT" => Self::Put,
            "PATCH" => Self::Patch,
            "DELETE" => Self::Delete,
            "OPTIONS" => Self::Options,
            _ => Self::Other,
        })
    }
}

/// Ant-style path matcher.
///
/// `/x/**` matches `/x` and everything below it; `/**` matches every path.
/// Any other pattern matches the path exactly.
///
/// # Examples
/// ```
/// use anime_backend::domain::PathPattern;
///
/// let pattern = PathPattern::new("/animes/**");
/// assert!(pattern.matches("/animes"));
/// assert!(pattern.matches("/animes/7"));
/// assert!(!pattern.matches("/animesque"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathPattern {
    Exact(String),
    Subtree(String),
}

impl PathPattern {
    pub fn new(raw: &str) -> Self {
        match raw.strip_suffix("/**") {
            Some(prefix) => Self::Subtree(prefix.to_owned()),
            None => Self::Exact(raw.to_owned()),
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        match self {
            Self::Exact(expected) => path == expected,
            Self::Subtree(prefix) => match path.strip_prefix(prefix.as_str()) {
                Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.is_empty(),
                None => false,
            },
        }
    }
}

impl fmt::Display for PathPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(path) => f.write_str(path),
            Self::Subtree(prefix) => write!(f, "{prefix}/**"),
        }
    }
}

/// One entry of the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRule {
    /// Allow everyone, with or without credentials.
    PermitAll { pattern: PathPattern },
    /// Require `role` for the listed methods.
    RequireRole {
        methods: Vec<RequestMethod>,
        pattern: PathPattern,
        role: Role,
    },
    /// Require any authenticated principal.
    Authenticated { pattern: PathPattern },
}

impl AccessRule {
    pub fn permit_all(pattern: &str) -> Self {
        Self::PermitAll {
            pattern: PathPattern::new(pattern),
        }
    }

    pub fn require_role(
        methods: impl IntoIterator<Item = RequestMethod>,
        pattern: &str,
        role: Role,
    ) -> Self {
        Self::RequireRole {
            methods: methods.into_iter().collect(),
            pattern: PathPattern::new(pattern),
            role,
        }
    }

    pub fn authenticated(pattern: &str) -> Self {
        Self::Authenticated {
            pattern: PathPattern::new(pattern),
        }
    }

    fn applies_to(&self, method: RequestMethod, path: &str) -> bool {
        match self {
            Self::PermitAll { pattern } | Self::Authenticated { pattern } => pattern.matches(path),
            Self::RequireRole {
                methods, pattern, ..
            } => methods.contains(&method) && pattern.matches(path),
        }
    }

    fn decide(&self, principal: Option<&Principal>) -> Decision {
        match (self, principal) {
            (Self::PermitAll { .. }, _) => Decision::Allow,
            (_, None) => Decision::Deny(Denial::Unauthenticated),
            (Self::Authenticated { .. }, Some(_)) => Decision::Allow,
            (Self::RequireRole { role, .. }, Some(principal)) => {
                if principal.has_role(*role) {
                    Decision::Allow
                } else {
                    Decision::Deny(Denial::InsufficientRole { required: *role })
                }
            }
        }
    }
}

/// Why a request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Denial {
    /// No valid credentials were presented.
    Unauthenticated,
    /// The caller is known but lacks the required role.
    InsufficientRole { required: Role },
    /// The caller is known but no rule covers the request.
    NoMatchingRule,
}

impl From<Denial> for Error {
    fn from(value: Denial) -> Self {
        match value {
            Denial::Unauthenticated => Error::unauthorized(
                "Full authentication is required to access this resource",
            ),
            Denial::InsufficientRole { required } => Error::forbidden("Access is denied")
                .with_developer_message(format!("{required} is required")),
            Denial::NoMatchingRule => Error::forbidden("Access is denied")
                .with_developer_message("no access rule covers this request"),
        }
    }
}

/// Outcome of evaluating the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(Denial),
}

/// Ordered list of [`AccessRule`]s.
///
/// # Examples
/// ```
/// use anime_backend::domain::{AccessPolicy, Decision, Denial, Principal, RequestMethod, Role};
///
/// let policy = AccessPolicy::default();
/// let user = Principal::new("user", [Role::User]);
///
/// assert_eq!(policy.evaluate(RequestMethod::Get, "/animes", Some(&user)), Decision::Allow);
/// assert_eq!(
///     policy.evaluate(RequestMethod::Get, "/animes", None),
///     Decision::Deny(Denial::Unauthenticated),
/// );
/// assert_eq!(
///     policy.evaluate(RequestMethod::Delete, "/animes/1", Some(&user)),
///     Decision::Deny(Denial::InsufficientRole { required: Role::Admin }),
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }

    /// Decide whether `principal` may perform `method` on `path`.
    ///
    /// When no rule matches the request is refused: unauthenticated callers
    /// are asked to authenticate, authenticated ones are forbidden.
    pub fn evaluate(
        &self,
        method: RequestMethod,
        path: &str,
        principal: Option<&Principal>,
    ) -> Decision {
        self.rules
            .iter()
            .find(|rule| rule.applies_to(method, path))
            .map_or_else(
                || match principal {
                    None => Decision::Deny(Denial::Unauthenticated),
                    Some(_) => Decision::Deny(Denial::NoMatchingRule),
                },
                |rule| rule.decide(principal),
            )
    }
}

impl Default for AccessPolicy {
    /// Documentation and probes are public, writes need ADMIN, reads need
    /// USER, and everything else needs a login.
    fn default() -> Self {
        use RequestMethod::{Delete, Get, Post, Put};

        Self::new(vec![
            AccessRule::permit_all("/swagger-ui/**"),
            AccessRule::permit_all("/swagger-ui.html"),
            AccessRule::permit_all("/api-docs/**"),
            AccessRule::permit_all("/webjars/**"),
            AccessRule::permit_all("/health/**"),
            AccessRule::require_role([Post, Put, Delete], "/animes/**", Role::Admin),
            AccessRule::require_role([Get], "/animes/**", Role::User),
            AccessRule::authenticated("/**"),
        ])
    }
}
