//! Server configuration loaded from the environment

use crate::storage::RetryPolicy;
use anyhow::{anyhow, Context, Result};
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
pub const DEFAULT_DB_PORT: u16 = 5432;

/// Which storage backend serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Postgres,
    Memory,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" | "db" => Ok(BackendKind::Postgres),
            "memory" | "mem" | "in-memory" => Ok(BackendKind::Memory),
            other => Err(anyhow!(
                "Unknown backend '{}', expected 'postgres' or 'memory'",
                other
            )),
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Postgres => write!(f, "postgres"),
            BackendKind::Memory => write!(f, "memory"),
        }
    }
}

/// PostgreSQL connection parameters.
///
/// Only the port has a default. Missing values surface as connection
/// failures when the backend is used, not at startup.
#[derive(Clone)]
pub struct DbSettings {
    pub host: Option<String>,
    pub port: u16,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
}

impl Default for DbSettings {
    fn default() -> Self {
        Self {
            host: None,
            port: DEFAULT_DB_PORT,
            name: None,
            user: None,
            password: None,
        }
    }
}

impl std::fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub backend: BackendKind,
    pub db: DbSettings,
    pub retry: RetryPolicy,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_address =
            get("BIND_ADDRESS").unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string());

        let backend = match get("NEWS_BACKEND") {
            Some(raw) => raw.parse::<BackendKind>().context("Invalid NEWS_BACKEND")?,
            None => BackendKind::Postgres,
        };

        let port = parse_or(get("DB_PORT"), DEFAULT_DB_PORT).context("Invalid DB_PORT")?;

        let defaults = RetryPolicy::default();
        let max_attempts = parse_or(get("DB_CONNECT_ATTEMPTS"), defaults.max_attempts)
            .context("Invalid DB_CONNECT_ATTEMPTS")?;
        if max_attempts == 0 {
            return Err(anyhow!("DB_CONNECT_ATTEMPTS must be at least 1"));
        }
        let delay_secs = parse_or(get("DB_CONNECT_DELAY_SECS"), defaults.delay.as_secs())
            .context("Invalid DB_CONNECT_DELAY_SECS")?;

        Ok(Config {
            bind_address,
            backend,
            db: DbSettings {
                host: get("DB_HOST"),
                port,
                name: get("DB_NAME"),
                user: get("DB_USER"),
                password: get("DB_PASS"),
            },
            retry: RetryPolicy::new(max_attempts, Duration::from_secs(delay_secs)),
        })
    }
}

fn parse_or<T>(raw: Option<String>, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match raw {
        Some(value) => Ok(value.trim().parse()?),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:3000");
        assert_eq!(config.backend, BackendKind::Postgres);
        assert_eq!(config.db.port, 5432);
        assert!(config.db.host.is_none());
        assert!(config.db.password.is_none());
        assert_eq!(config.retry, RetryPolicy::default());
    }

    #[test]
    fn test_full_environment() {
        let config = Config::from_lookup(lookup(&[
            ("BIND_ADDRESS", "127.0.0.1:8080"),
            ("NEWS_BACKEND", "Memory"),
            ("DB_HOST", "db.internal"),
            ("DB_PORT", "6543"),
            ("DB_NAME", "news"),
            ("DB_USER", "reader"),
            ("DB_PASS", "hunter2"),
            ("DB_CONNECT_ATTEMPTS", "2"),
            ("DB_CONNECT_DELAY_SECS", "0"),
        ]))
        .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.backend, BackendKind::Memory);
        assert_eq!(config.db.host.as_deref(), Some("db.internal"));
        assert_eq!(config.db.port, 6543);
        assert_eq!(config.db.name.as_deref(), Some("news"));
        assert_eq!(config.db.user.as_deref(), Some("reader"));
        assert_eq!(config.db.password.as_deref(), Some("hunter2"));
        assert_eq!(config.retry, RetryPolicy::new(2, Duration::ZERO));
    }

    #[test]
    fn test_empty_values_are_unset() {
        let config =
            Config::from_lookup(lookup(&[("DB_HOST", ""), ("NEWS_BACKEND", " ")])).unwrap();
        assert!(config.db.host.is_none());
        assert_eq!(config.backend, BackendKind::Postgres);
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup(&[("NEWS_BACKEND", "redis")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DB_PORT", "not-a-port")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DB_CONNECT_ATTEMPTS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("DB_CONNECT_DELAY_SECS", "-1")])).is_err());
    }

    #[test]
    fn test_debug_hides_password() {
        let settings = DbSettings {
            password: Some("hunter2".to_string()),
            ..DbSettings::default()
        };
        let rendered = format!("{:?}", settings);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("***"));
    }
}
