//! Runtime configuration for the content provider.

use derive_getters::Getters;
use derive_more::{Display, Error};
use tracing::{debug, info, instrument};

/// Default Gemini model used for content generation.
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";

/// Environment variable holding the Gemini API key.
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Configuration for the Gemini content provider.
#[derive(Debug, Clone, Getters)]
pub struct GeminiConfig {
    /// API access credential.
    api_key: String,
    /// Model name, e.g. "gemini-1.5-flash".
    model: String,
}

impl GeminiConfig {
    /// Creates a new configuration.
    #[instrument(skip(api_key), fields(model = %model))]
    pub fn new(api_key: String, model: String) -> Self {
        debug!("Creating Gemini config");
        Self { api_key, model }
    }

    /// Loads the configuration from the environment.
    ///
    /// `GEMINI_API_KEY` is required; without it the process refuses to
    /// start, so the game never reaches a state it cannot serve.
    #[instrument(skip_all, fields(model = %model.as_ref()))]
    pub fn from_env(model: impl AsRef<str>) -> Result<Self, ConfigError> {
        let api_key = std::env::var(API_KEY_VAR).map_err(|_| {
            ConfigError::new(format!("{API_KEY_VAR} environment variable not set"))
        })?;
        info!("Loaded Gemini config from environment");
        Ok(Self::new(api_key, model.as_ref().to_string()))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}
