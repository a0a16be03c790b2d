//! Application settings loaded via OrthoConfig.
//!
//! Values come from CLI arguments, `ANIME_*` environment variables and
//! configuration files, in that order of precedence.

use std::net::{IpAddr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::password::DEFAULT_COST;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DB_MAX_CONNECTIONS: u32 = 10;
const DEFAULT_DEMO_PASSWORD: &str = "devdojo";
const DEFAULT_RUN_MIGRATIONS: bool = true;

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind host `{host}`: {source}")]
    InvalidHost {
        host: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("db_max_connections must be at least 1")]
    EmptyPool,
}

/// Runtime configuration for the server binary.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "ANIME")]
pub struct AppSettings {
    /// Interface to bind. Defaults to `0.0.0.0`.
    pub host: Option<String>,
    /// Port to bind. Defaults to `8080`.
    pub port: Option<u16>,
    /// PostgreSQL URL. Without it the in-memory stores are used.
    pub database_url: Option<String>,
    /// Upper bound on pooled database connections.
    pub db_max_connections: Option<u32>,
    /// Apply embedded migrations at start-up. Defaults to `true`.
    pub run_migrations: Option<bool>,
    /// Create the `user` and `admin` demo accounts at start-up.
    pub seed_demo_accounts: Option<bool>,
    /// Password given to seeded demo accounts.
    pub demo_password: Option<String>,
    /// bcrypt work factor for seeded demo accounts.
    pub password_cost: Option<u32>,
    /// Expose Prometheus metrics when built with the `metrics` feature.
    pub metrics_enabled: Option<bool>,
}

impl AppSettings {
    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(DEFAULT_HOST)
    }

    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(DEFAULT_RUN_MIGRATIONS)
    }

    pub fn seed_demo_accounts(&self) -> bool {
        self.seed_demo_accounts.unwrap_or(false)
    }

    pub fn metrics_enabled(&self) -> bool {
        self.metrics_enabled.unwrap_or(false)
    }

    pub fn demo_password(&self) -> &str {
        self.demo_password.as_deref().unwrap_or(DEFAULT_DEMO_PASSWORD)
    }

    pub fn password_cost(&self) -> u32 {
        self.password_cost.unwrap_or(DEFAULT_COST)
    }

    /// Pool size, rejecting zero.
    pub fn db_max_connections(&self) -> Result<u32, SettingsError> {
        match self.db_max_connections.unwrap_or(DEFAULT_DB_MAX_CONNECTIONS) {
            0 => Err(SettingsError::EmptyPool),
            size => Ok(size),
        }
    }

    /// Socket address to bind.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidHost`] when `host` is not an IP
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host();
        let ip: IpAddr = host.parse().map_err(|source| SettingsError::InvalidHost {
            host: host.to_owned(),
            source,
        })?;
        Ok(SocketAddr::new(ip, self.port()))
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "ANIME_HOST",
        "ANIME_PORT",
        "ANIME_DATABASE_URL",
        "ANIME_DB_MAX_CONNECTIONS",
        "ANIME_RUN_MIGRATIONS",
        "ANIME_SEED_DEMO_ACCOUNTS",
        "ANIME_DEMO_PASSWORD",
        "ANIME_PASSWORD_COST",
        "ANIME_METRICS_ENABLED",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("anime-backend")])
            .expect("config should load")
    }

    fn cleared_except(
        overrides: &[(&'static str, &'static str)],
    ) -> Vec<(&'static str, Option<String>)> {
        VARS.iter()
            .map(|name| {
                let value = overrides
                    .iter()
                    .find(|(key, _)| key == name)
                    .map(|(_, value)| (*value).to_owned());
                (*name, value)
            })
            .collect()
    }

    #[rstest]
    fn defaults_are_used_when_missing() {
        let _guard = lock_env(cleared_except(&[]));

        let settings = load_from_empty_args();
        assert_eq!(settings.host(), DEFAULT_HOST);
        assert_eq!(settings.port(), DEFAULT_PORT);
        assert!(settings.database_url.is_none());
        assert_eq!(
            settings.db_max_connections().expect("default pool size"),
            DEFAULT_DB_MAX_CONNECTIONS
        );
        assert!(settings.run_migrations());
        assert!(!settings.seed_demo_accounts());
        assert_eq!(settings.demo_password(), DEFAULT_DEMO_PASSWORD);
        assert_eq!(settings.password_cost(), DEFAULT_COST);
        assert!(!settings.metrics_enabled());
        assert_eq!(
            settings.bind_addr().expect("default address").to_string(),
            "0.0.0.0:8080"
        );
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env(cleared_except(&[
            ("ANIME_HOST", "127.0.0.1"),
            ("ANIME_PORT", "9090"),
            ("ANIME_DATABASE_URL", "postgres://localhost/animes"),
            ("ANIME_DB_MAX_CONNECTIONS", "4"),
            ("ANIME_SEED_DEMO_ACCOUNTS", "true"),
            ("ANIME_DEMO_PASSWORD", "s3cret"),
            ("ANIME_PASSWORD_COST", "12"),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr().expect("valid address").to_string(),
            "127.0.0.1:9090"
        );
        assert_eq!(
            settings.database_url.as_deref(),
            Some("postgres://localhost/animes")
        );
        assert_eq!(settings.db_max_connections().expect("pool size"), 4);
        assert!(settings.seed_demo_accounts());
        assert_eq!(settings.demo_password(), "s3cret");
        assert_eq!(settings.password_cost(), 12);
    }

    #[rstest]
    #[case("true", true)]
    #[case("false", false)]
    fn boolean_switches_follow_the_environment(
        #[case] value: &'static str,
        #[case] expected: bool,
    ) {
        let _guard = lock_env(cleared_except(&[
            ("ANIME_RUN_MIGRATIONS", value),
            ("ANIME_SEED_DEMO_ACCOUNTS", value),
            ("ANIME_METRICS_ENABLED", value),
        ]));

        let settings = load_from_empty_args();
        assert_eq!(settings.run_migrations(), expected);
        assert_eq!(settings.seed_demo_accounts(), expected);
        assert_eq!(settings.metrics_enabled(), expected);
    }

    #[rstest]
    fn non_ip_hosts_are_rejected() {
        let _guard = lock_env(cleared_except(&[("ANIME_HOST", "localhost")]));

        let settings = load_from_empty_args();
        let err = settings.bind_addr().expect_err("hostname is not an IP");
        assert!(matches!(err, SettingsError::InvalidHost { .. }));
    }

    #[rstest]
    fn zero_sized_pool_is_rejected() {
        let _guard = lock_env(cleared_except(&[("ANIME_DB_MAX_CONNECTIONS", "0")]));

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.db_max_connections(),
            Err(SettingsError::EmptyPool)
        ));
    }
}
