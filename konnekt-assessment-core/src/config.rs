use crate::domain::DEFAULT_MAX_CAPTURE_SECS;
use crate::error::ConfigError;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Environment variable overriding the synthesis endpoint
pub const SYNTHESIS_ENDPOINT_ENV: &str = "KONNEKT_SYNTHESIS_ENDPOINT";

/// Resolver and renderer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct AssessmentConfig {
    /// Endpoint that turns `text` into playable speech
    pub synthesis_endpoint: String,

    /// Language passed to the synthesis endpoint
    pub synthesis_language: String,

    /// Capture limit for spoken items without their own limit
    pub default_max_capture_secs: u32,

    /// Bumped to invalidate memoized dispatch results
    pub revision: u64,
}

impl Default for AssessmentConfig {
    fn default() -> Self {
        Self {
            synthesis_endpoint: "https://tts.konnektoren.help/synthesize".to_string(),
            synthesis_language: "de-DE".to_string(),
            default_max_capture_secs: DEFAULT_MAX_CAPTURE_SECS,
            revision: 0,
        }
    }
}

impl AssessmentConfig {
    pub fn new(synthesis_endpoint: String) -> Self {
        Self {
            synthesis_endpoint,
            ..Default::default()
        }
    }

    /// Parse and validate a JSON configuration
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply environment overrides
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(endpoint) = std::env::var(SYNTHESIS_ENDPOINT_ENV) {
            tracing::debug!("Synthesis endpoint overridden from environment: {}", endpoint);
            self.synthesis_endpoint = endpoint;
        }
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.synthesis_language = language.into();
        self
    }

    pub fn with_max_capture_secs(mut self, secs: u32) -> Self {
        self.default_max_capture_secs = secs;
        self
    }

    pub fn with_revision(mut self, revision: u64) -> Self {
        self.revision = revision;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        url::Url::parse(&self.synthesis_endpoint).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.synthesis_endpoint.clone(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
