use std::env;

use crate::error::ConfigError;

/// Trait for types that can retrieve their configuration key from environment variables
pub trait KeyFromEnv {
    /// The environment variable name for this client's API key
    const KEY_NAME: &'static str;

    /// Find the API key by checking environment variables first, then .env file.
    /// Blank values count as missing.
    fn find_key() -> Option<String> {
        // First try to load .env file (silently fail if not found)
        let _ = dotenvy::dotenv();

        env::var(Self::KEY_NAME)
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
    }

    /// Like `find_key`, but a missing key is a configuration error.
    fn require_key() -> Result<String, ConfigError> {
        Self::find_key().ok_or(ConfigError::MissingCredential { key_name: Self::KEY_NAME })
    }
}

/// Read an optional, non-blank setting from the environment (after loading `.env`).
pub fn optional_setting(name: &str) -> Option<String> {
    let _ = dotenvy::dotenv();
    env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// How strictly normalized multiple-choice questions are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Validation {
    /// Keep questions that miss the 4-option / answer-in-options contract, logging a warning.
    #[default]
    Lenient,
    /// Reject the whole response if any question misses the contract.
    Strict,
}
