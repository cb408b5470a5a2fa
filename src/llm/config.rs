//! Completion service configuration

use std::time::Duration;

/// Model used when `EXPERT_DESK_MODEL` is unset
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Sampling temperature for both the relevance check and answers.
/// Moderate variability: not deterministic, not maximally random.
pub const DEFAULT_TEMPERATURE: f32 = 0.5;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Configuration for the completion provider
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup; unparseable numbers fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let temperature = match lookup("EXPERT_DESK_TEMPERATURE") {
            Some(raw) => match raw.trim().parse::<f32>() {
                Ok(t) if (0.0..=2.0).contains(&t) => t,
                _ => {
                    tracing::warn!(value = %raw, "Invalid EXPERT_DESK_TEMPERATURE, using default");
                    defaults.temperature
                }
            },
            None => defaults.temperature,
        };

        let timeout = match lookup("EXPERT_DESK_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(value = %raw, "Invalid EXPERT_DESK_TIMEOUT_SECS, using default");
                    defaults.timeout
                }
            },
            None => defaults.timeout,
        };

        Self {
            api_key: lookup("OPENAI_API_KEY").filter(|k| !k.trim().is_empty()),
            base_url: lookup("OPENAI_BASE_URL")
                .filter(|u| !u.trim().is_empty())
                .unwrap_or(defaults.base_url),
            model: lookup("EXPERT_DESK_MODEL")
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(defaults.model),
            temperature,
            timeout,
        }
    }
}
