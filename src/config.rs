//! Configuration loading and persistence
//!
//! The pipeline never reads process-wide state; everything it needs is
//! collected here and passed in at construction time.

use crate::{Error, Result};
use std::path::Path;
use std::time::Duration;

/// Model the original Google demo pins for image editing.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash-exp";

const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub request_timeout: Duration,
    /// Upper bound on accepted source image size. `None` means unlimited.
    pub max_input_bytes: Option<u64>,
}

impl Config {
    /// Load configuration from the environment, reading `.env` first.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let api_key = std::env::var("GEMINI_API_KEY")
            .map_err(|_| Error::InvalidInput("GEMINI_API_KEY not set".to_string()))?;

        let model =
            std::env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let request_timeout = std::env::var("GEMINI_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));

        let max_input_bytes = std::env::var("GEMINI_MAX_INPUT_BYTES")
            .ok()
            .and_then(|s| s.parse::<u64>().ok());

        Ok(Self {
            api_key,
            model,
            request_timeout,
            max_input_bytes,
        })
    }

    /// Build a config around an API key, using defaults for everything else.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            max_input_bytes: None,
        }
    }

    /// Persist an API key to a `.env` file, creating or overwriting it.
    pub fn save_api_key(env_path: &Path, api_key: &str) -> Result<()> {
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(Error::InvalidInput(
                "Cannot save an empty API key".to_string(),
            ));
        }

        std::fs::write(env_path, format!("GEMINI_API_KEY={}\n", api_key))?;
        tracing::info!("Saved API key to {}", env_path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_save_api_key_writes_env_file() {
        let dir = tempdir().unwrap();
        let env_path = dir.path().join(".env");

        Config::save_api_key(&env_path, "test-key-123").unwrap();

        let contents = std::fs::read_to_string(&env_path).unwrap();
        assert_eq!(contents, "GEMINI_API_KEY=test-key-123\n");
    }

    #[test]
    fn test_save_api_key_overwrites_existing_file() {
        let dir = tempdir().unwrap();
        let env_path = dir.path().join(".env");

        Config::save_api_key(&env_path, "old-key").unwrap();
        Config::save_api_key(&env_path, "new-key").unwrap();

        let contents = std::fs::read_to_string(&env_path).unwrap();
        assert_eq!(contents, "GEMINI_API_KEY=new-key\n");
    }

    #[test]
    fn test_save_api_key_rejects_empty_key() {
        let dir = tempdir().unwrap();
        let env_path = dir.path().join(".env");

        let err = Config::save_api_key(&env_path, "   ").unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
        assert!(!env_path.exists());
    }

    #[test]
    fn test_with_api_key_uses_defaults() {
        let config = Config::with_api_key("key");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(120));
        assert!(config.max_input_bytes.is_none());
    }
}
