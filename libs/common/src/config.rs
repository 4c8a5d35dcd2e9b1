//! HTTP server configuration
//!
//! Settings are layered with the `config` crate: built-in defaults first,
//! then `<PREFIX>_*` environment variables.

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::ConfigError;

/// Listener and static asset settings for a service
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Interface to bind (default: "0.0.0.0")
    pub host: String,
    /// Port to bind
    pub port: u16,
    /// Directory served under `/images` (default: "images")
    pub static_dir: String,
}

impl ServerConfig {
    /// Load the configuration for a service
    ///
    /// # Environment Variables
    /// - `<PREFIX>_HOST`
    /// - `<PREFIX>_PORT` (default: `default_port`)
    /// - `<PREFIX>_STATIC_DIR`
    pub fn from_env(prefix: &str, default_port: u16) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(default_port))?
            .set_default("static_dir", "images")?
            .add_source(Environment::with_prefix(prefix).try_parsing(true))
            .build()?;

        Ok(settings.try_deserialize()?)
    }

    /// Socket address string for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_server_config_defaults() {
        let config = ServerConfig::from_env("CFGTEST", 8080).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.static_dir, "images");
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    #[serial]
    fn test_server_config_from_env_overrides() {
        unsafe {
            std::env::set_var("CFGTEST_HOST", "127.0.0.1");
            std::env::set_var("CFGTEST_PORT", "9000");
        }

        let config = ServerConfig::from_env("CFGTEST", 8080).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:9000");

        unsafe {
            std::env::remove_var("CFGTEST_HOST");
            std::env::remove_var("CFGTEST_PORT");
        }
    }

    #[test]
    #[serial]
    fn test_invalid_port_is_rejected() {
        unsafe {
            std::env::set_var("CFGTEST_PORT", "not-a-port");
        }

        assert!(ServerConfig::from_env("CFGTEST", 8080).is_err());

        unsafe {
            std::env::remove_var("CFGTEST_PORT");
        }
    }
}
