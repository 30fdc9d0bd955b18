//! Application configuration loaded from environment variables.
//!
//! The two backend connection parameters are required; starting without them
//! is a deployment misconfiguration and fails immediately.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the hosted backend (auth + data REST API)
    pub backend_url: String,
    /// Public (anon) API key sent with every backend request
    pub backend_anon_key: String,
    /// Server port
    pub port: u16,
    /// Whether session cookies are marked Secure
    pub cookie_secure: bool,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// `BACKEND_URL` and `BACKEND_ANON_KEY` are required. `PORT` and
    /// `COOKIE_SECURE` are optional with local-dev defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        Ok(Self {
            backend_url: env::var("BACKEND_URL")
                .map(|v| v.trim_end_matches('/').to_string())
                .map_err(|_| ConfigError::Missing("BACKEND_URL"))?,
            backend_anon_key: env::var("BACKEND_ANON_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("BACKEND_ANON_KEY"))?,
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            cookie_secure: env::var("COOKIE_SECURE")
                .map(|v| matches!(v.trim(), "1" | "true" | "yes" | "on"))
                .unwrap_or(false),
        })
    }

    /// Default config for testing only.
    pub fn test_default() -> Self {
        Self {
            backend_url: "http://localhost:54321".to_string(),
            backend_anon_key: "test_anon_key".to_string(),
            port: 8080,
            cookie_secure: false,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test because the process environment is shared across threads.
    #[test]
    fn test_config_from_env() {
        env::remove_var("BACKEND_URL");
        env::set_var("BACKEND_ANON_KEY", "test_key");

        let err = Config::from_env().expect_err("missing BACKEND_URL must fail");
        assert!(matches!(err, ConfigError::Missing("BACKEND_URL")));

        env::set_var("BACKEND_URL", "http://localhost:54321/");
        env::set_var("BACKEND_ANON_KEY", " test_key ");

        let config = Config::from_env().expect("Config should load");

        // Trailing slash and whitespace are normalized
        assert_eq!(config.backend_url, "http://localhost:54321");
        assert_eq!(config.backend_anon_key, "test_key");
        assert_eq!(config.port, 8080);
        assert!(!config.cookie_secure);
    }
}
