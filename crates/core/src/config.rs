//! Environment-based configuration loading
//!
//! Settings that carry credentials (the generative-text API key) are read from
//! the process environment rather than from config files. All variables use the
//! `CINEREC_` prefix; a few well-known unprefixed names are accepted as
//! fallbacks.
//!
//! # Example
//!
//! ```no_run
//! use cinerec_core::config::{load_dotenv, ConfigLoader, InsightConfig};
//!
//! # fn example() -> Result<(), cinerec_core::CineRecError> {
//! load_dotenv();
//!
//! let insight = InsightConfig::from_env()?;
//! insight.validate()?;
//! # Ok(())
//! # }
//! ```

use crate::error::CineRecError;
use std::time::Duration;
use url::Url;

/// Configuration loader trait
///
/// Provides standardized methods for loading and validating configuration from
/// environment variables.
pub trait ConfigLoader: Sized {
    /// Load configuration from environment variables, falling back to defaults
    /// for optional values.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if a value is present but cannot be parsed.
    fn from_env() -> Result<Self, CineRecError>;

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if any validation check fails.
    fn validate(&self) -> Result<(), CineRecError>;
}

/// Generative-text API configuration for notebook commentary
///
/// # Environment Variables
///
/// - `CINEREC_INSIGHT_API_KEY` (optional, falls back to `GEMINI_API_KEY` then `API_KEY`):
///   API credential. An empty key is allowed; requests then fail and the
///   offline fallback text is served.
/// - `CINEREC_INSIGHT_API_URL` (optional): API base URL
///   (default: `https://generativelanguage.googleapis.com/v1beta`)
/// - `CINEREC_INSIGHT_MODEL` (optional): model name (default: `gemini-3-flash-preview`)
/// - `CINEREC_INSIGHT_TIMEOUT_MS` (optional): request timeout (default: 15000)
/// - `CINEREC_INSIGHT_TEMPERATURE` (optional): sampling temperature (default: 0.7)
/// - `CINEREC_INSIGHT_TOP_P` (optional): nucleus sampling (default: 0.9)
#[derive(Debug, Clone)]
pub struct InsightConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub timeout: Duration,
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            timeout: Duration::from_millis(15_000),
            temperature: 0.7,
            top_p: 0.9,
        }
    }
}

impl InsightConfig {
    /// Whether a credential is configured at all
    pub fn has_api_key(&self) -> bool {
        !self.api_key.trim().is_empty()
    }
}

impl ConfigLoader for InsightConfig {
    fn from_env() -> Result<Self, CineRecError> {
        let defaults = InsightConfig::default();

        let api_key = std::env::var("CINEREC_INSIGHT_API_KEY")
            .or_else(|_| std::env::var("GEMINI_API_KEY"))
            .or_else(|_| std::env::var("API_KEY"))
            .unwrap_or_default();

        let api_url = std::env::var("CINEREC_INSIGHT_API_URL").unwrap_or(defaults.api_url);
        let model = std::env::var("CINEREC_INSIGHT_MODEL").unwrap_or(defaults.model);

        let timeout_ms = parse_env_var("CINEREC_INSIGHT_TIMEOUT_MS", 15_000u64)?;
        let temperature = parse_env_var("CINEREC_INSIGHT_TEMPERATURE", defaults.temperature)?;
        let top_p = parse_env_var("CINEREC_INSIGHT_TOP_P", defaults.top_p)?;

        Ok(Self {
            api_key,
            api_url,
            model,
            timeout: Duration::from_millis(timeout_ms),
            temperature,
            top_p,
        })
    }

    fn validate(&self) -> Result<(), CineRecError> {
        Url::parse(&self.api_url).map_err(|e| CineRecError::ConfigurationError {
            message: format!("Invalid insight API URL: {}", e),
            key: Some("CINEREC_INSIGHT_API_URL".to_string()),
        })?;

        if self.model.trim().is_empty() {
            return Err(CineRecError::ConfigurationError {
                message: "model must not be empty".to_string(),
                key: Some("CINEREC_INSIGHT_MODEL".to_string()),
            });
        }

        if self.timeout.is_zero() {
            return Err(CineRecError::ConfigurationError {
                message: "timeout must be greater than 0".to_string(),
                key: Some("CINEREC_INSIGHT_TIMEOUT_MS".to_string()),
            });
        }

        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(CineRecError::ConfigurationError {
                message: format!("temperature {} must be within 0.0..=2.0", self.temperature),
                key: Some("CINEREC_INSIGHT_TEMPERATURE".to_string()),
            });
        }

        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(CineRecError::ConfigurationError {
                message: format!("top_p {} must be within 0.0..=1.0", self.top_p),
                key: Some("CINEREC_INSIGHT_TOP_P".to_string()),
            });
        }

        Ok(())
    }
}

/// Parse an environment variable, returning `default` when it is unset
///
/// # Errors
///
/// Returns a `ConfigurationError` if the value cannot be parsed
pub fn parse_env_var<T>(key: &str, default: T) -> Result<T, CineRecError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    std::env::var(key)
        .ok()
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| CineRecError::ConfigurationError {
                    message: format!("Failed to parse {}: {}", key, e),
                    key: Some(key.to_string()),
                })
        })
        .unwrap_or(Ok(default))
}

/// Load `.env` file if present
///
/// A missing file is not an error.
pub fn load_dotenv() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            tracing::warn!(error = %e, "Failed to load .env file");
        }
    }
}
