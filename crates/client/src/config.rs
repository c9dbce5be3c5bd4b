//! Client configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `MERCADITO_API_URL` - Base URL of the store API
//!   (default: `https://api.mercadito.store/api/v1/`)
//! - `MERCADITO_STATE_FILE` - Path of the persisted session state file
//!   (default: `$HOME/.mercadito/session.json`)
//! - `MERCADITO_TIMEOUT_SECS` - Blanket per-request deadline in seconds
//!   (default: 30)

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use url::Url;

/// Default base URL of the remote store API.
const DEFAULT_API_URL: &str = "https://api.mercadito.store/api/v1/";

/// Default per-request deadline, applied uniformly to every call.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Client application configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL of the store API. Always ends with a `/` so endpoint paths
    /// can be appended directly.
    pub api_url: Url,
    /// Path of the JSON file holding tokens and the cart identifier.
    pub state_file: PathBuf,
    /// Blanket per-request deadline.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a set variable cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_url = get_env_or_default("MERCADITO_API_URL", DEFAULT_API_URL);
        let api_url = parse_base_url(&api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("MERCADITO_API_URL".to_string(), e))?;

        let state_file = std::env::var("MERCADITO_STATE_FILE")
            .map_or_else(|_| default_state_file(), PathBuf::from);

        let timeout_secs = get_env_or_default(
            "MERCADITO_TIMEOUT_SECS",
            &DEFAULT_TIMEOUT_SECS.to_string(),
        )
        .parse::<u64>()
        .map_err(|e| {
            ConfigError::InvalidEnvVar("MERCADITO_TIMEOUT_SECS".to_string(), e.to_string())
        })?;

        Ok(Self {
            api_url,
            state_file,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Build a configuration for a given API base URL with default timeout
    /// and an explicit state file. Used by the CLI's `--api-url` override and
    /// by the integration tests.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the URL cannot be parsed.
    pub fn for_api_url(api_url: &str, state_file: PathBuf) -> Result<Self, ConfigError> {
        let api_url = parse_base_url(api_url)
            .map_err(|e| ConfigError::InvalidEnvVar("MERCADITO_API_URL".to_string(), e))?;

        Ok(Self {
            api_url,
            state_file,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }
}

/// Parse a base URL, normalizing it to end with a trailing slash.
fn parse_base_url(s: &str) -> Result<Url, String> {
    let normalized = if s.ends_with('/') {
        s.to_owned()
    } else {
        format!("{s}/")
    };

    let url = Url::parse(&normalized).map_err(|e| e.to_string())?;

    if url.cannot_be_a_base() {
        return Err("URL cannot be used as a base".to_string());
    }

    Ok(url)
}

/// Default state file location under the user's home directory.
fn default_state_file() -> PathBuf {
    std::env::var("HOME").map_or_else(
        |_| PathBuf::from(".mercadito/session.json"),
        |home| PathBuf::from(home).join(".mercadito/session.json"),
    )
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url_adds_trailing_slash() {
        let url = parse_base_url("http://127.0.0.1:8000/api/v1").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/v1/");
    }

    #[test]
    fn test_parse_base_url_keeps_trailing_slash() {
        let url = parse_base_url("http://127.0.0.1:8000/api/v1/").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/v1/");
    }

    #[test]
    fn test_parse_base_url_rejects_garbage() {
        assert!(parse_base_url("not a url").is_err());
    }

    #[test]
    fn test_for_api_url() {
        let config =
            ClientConfig::for_api_url("http://localhost:9999", PathBuf::from("/tmp/state.json"))
                .unwrap();
        assert_eq!(config.api_url.as_str(), "http://localhost:9999/");
        assert_eq!(config.timeout, Duration::from_secs(30));
    }
}
