use std::time::Duration;

use anyhow::{Context, Result};

use crate::conversation::session::SessionOptions;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub llm_timeout: Duration,
    pub role_selection: bool,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: parse_env("PORT", 8080)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            llm_timeout: Duration::from_secs(parse_env("LLM_TIMEOUT_SECS", 60)?),
            role_selection: parse_env("ENABLE_ROLE_SELECTION", true)?,
            max_upload_bytes: parse_env("MAX_UPLOAD_BYTES", 10 * 1024 * 1024)?,
        })
    }

    pub fn session_options(&self) -> SessionOptions {
        SessionOptions {
            role_selection: self.role_selection,
            ..SessionOptions::default()
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    let value = std::env::var(key)
        .with_context(|| format!("Required environment variable '{key}' is not set"))?;
    if value.trim().is_empty() {
        anyhow::bail!("Required environment variable '{key}' is empty");
    }
    Ok(value)
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} has an invalid value '{raw}'")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Each test uses its own variable names; the process environment is shared.

    #[test]
    fn test_parse_env_default_when_unset() {
        let port: u16 = parse_env("SCOUT_TEST_UNSET_PORT", 8080).unwrap();
        assert_eq!(port, 8080);
    }

    #[test]
    fn test_parse_env_reads_value() {
        std::env::set_var("SCOUT_TEST_TIMEOUT", " 15 ");
        let secs: u64 = parse_env("SCOUT_TEST_TIMEOUT", 60).unwrap();
        assert_eq!(secs, 15);
    }

    #[test]
    fn test_parse_env_rejects_garbage() {
        std::env::set_var("SCOUT_TEST_ROLE_FLAG", "maybe");
        let err = parse_env::<bool>("SCOUT_TEST_ROLE_FLAG", true).unwrap_err();
        assert!(err.to_string().contains("SCOUT_TEST_ROLE_FLAG"));
    }

    #[test]
    fn test_require_env_missing_is_error() {
        let err = require_env("SCOUT_TEST_MISSING_KEY").unwrap_err();
        assert!(err.to_string().contains("SCOUT_TEST_MISSING_KEY"));
    }

    #[test]
    fn test_require_env_blank_is_error() {
        std::env::set_var("SCOUT_TEST_BLANK_KEY", "  ");
        assert!(require_env("SCOUT_TEST_BLANK_KEY").is_err());
    }
}
