//! Server configuration.

use std::net::SocketAddr;
use std::path::PathBuf;

/// Environment variable holding the listen address.
pub const BIND_ADDR_VAR: &str = "SUBWAY_BIND_ADDR";

/// Environment variable holding the snapshot file path.
pub const DATA_PATH_VAR: &str = "SUBWAY_DATA_PATH";

/// Error returned when the environment holds an unusable value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}: {message}")]
pub struct ConfigError {
    var: &'static str,
    message: String,
}

/// Configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to listen on.
    pub bind_addr: SocketAddr,

    /// Where to keep the JSON snapshot.
    /// `None` keeps everything in memory.
    pub data_path: Option<PathBuf>,
}

impl ServerConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(bind_addr: SocketAddr, data_path: Option<PathBuf>) -> Self {
        Self {
            bind_addr,
            data_path,
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// Unset variables fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(addr) = lookup(BIND_ADDR_VAR).filter(|s| !s.trim().is_empty()) {
            config.bind_addr = addr.trim().parse().map_err(|e| ConfigError {
                var: BIND_ADDR_VAR,
                message: format!("{addr:?}: {e}"),
            })?;
        }

        if let Some(path) = lookup(DATA_PATH_VAR).filter(|s| !s.trim().is_empty()) {
            config.data_path = Some(PathBuf::from(path.trim()));
        }

        Ok(config)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data_path: None,
        }
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
        move |var| map.get(var).cloned()
    }

    #[test]
    fn default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, SocketAddr::from(([127, 0, 0, 1], 3000)));
        assert_eq!(config.data_path, None);
    }

    #[test]
    fn empty_environment_gives_defaults() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn reads_both_variables() {
        let config = ServerConfig::from_lookup(lookup(&[
            (BIND_ADDR_VAR, "0.0.0.0:8080"),
            (DATA_PATH_VAR, "/var/lib/subway/state.json"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, SocketAddr::from(([0, 0, 0, 0], 8080)));
        assert_eq!(
            config.data_path,
            Some(PathBuf::from("/var/lib/subway/state.json"))
        );
    }

    #[test]
    fn blank_values_are_ignored() {
        let config =
            ServerConfig::from_lookup(lookup(&[(BIND_ADDR_VAR, "  "), (DATA_PATH_VAR, "")]))
                .unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn bad_address_is_an_error() {
        let err = ServerConfig::from_lookup(lookup(&[(BIND_ADDR_VAR, "localhost")])).unwrap_err();
        assert!(err.to_string().starts_with("invalid SUBWAY_BIND_ADDR"));
    }

    #[test]
    fn custom_config() {
        let addr = SocketAddr::from(([127, 0, 0, 1], 4000));
        let config = ServerConfig::new(addr, Some(PathBuf::from("x.json")));
        assert_eq!(config.bind_addr, addr);
        assert_eq!(config.data_path, Some(PathBuf::from("x.json")));
    }
}
