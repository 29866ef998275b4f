//! Server configuration read from the environment.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use trivia_core::throttle::{SAFETY_MARGIN, SERVICE_LIMIT};
use trivia_opentdb::client::DEFAULT_BASE_URL;

use crate::error::AppError;

/// Runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interface to bind.
    pub host: String,
    /// Port to bind.
    pub port: u16,
    /// Open Trivia Database endpoint.
    pub opentdb_base_url: String,
    /// Per-request timeout towards the remote service.
    pub opentdb_timeout: Duration,
    /// Spacing between remote question requests.
    pub fetch_throttle: Duration,
    /// Seed for offline sampling; random when unset.
    pub store_seed: Option<u64>,
}

impl Config {
    /// Reads the configuration from process environment variables.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but malformed.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable is set but malformed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let default_throttle = u64::try_from((SERVICE_LIMIT + SAFETY_MARGIN).as_millis()).unwrap_or(6000);
        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_owned()),
            port: parse(&lookup, "PORT")?.unwrap_or(3000),
            opentdb_base_url: lookup("OPENTDB_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned()),
            opentdb_timeout: Duration::from_secs(parse(&lookup, "OPENTDB_TIMEOUT_SECS")?.unwrap_or(10)),
            fetch_throttle: Duration::from_millis(parse(&lookup, "FETCH_THROTTLE_MS")?.unwrap_or(default_throttle)),
            store_seed: parse(&lookup, "STORE_SEED")?,
        })
    }

    /// The address to listen on.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if host and port do not form a socket
    /// address.
    pub fn socket_addr(&self) -> Result<SocketAddr, AppError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| AppError::Config(format!("invalid HOST:PORT combination: {e}")))
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|raw| {
            raw.parse()
                .map_err(|e| AppError::Config(format!("{key} must be valid: {e}")))
        })
        .transpose()
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();

        assert_eq!(config.port, 3000);
        assert_eq!(config.opentdb_base_url, "https://opentdb.com");
        assert_eq!(config.fetch_throttle, Duration::from_secs(6));
        assert_eq!(config.store_seed, None);
        assert_eq!(config.socket_addr().unwrap().to_string(), "0.0.0.0:3000");
    }

    #[test]
    fn test_overrides_are_parsed() {
        let config = Config::from_lookup(lookup_from(&[
            ("PORT", "8080"),
            ("FETCH_THROTTLE_MS", "7500"),
            ("STORE_SEED", "42"),
        ]))
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.fetch_throttle, Duration::from_millis(7500));
        assert_eq!(config.store_seed, Some(42));
    }

    #[test]
    fn test_malformed_value_is_a_config_error() {
        let result = Config::from_lookup(lookup_from(&[("PORT", "eighty")]));

        match result {
            Err(AppError::Config(msg)) => assert!(msg.contains("PORT")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }
}
