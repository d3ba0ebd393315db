//! Client configuration read from `SIGNALCAST_*` environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::backend::DEFAULT_ENDPOINT;
use crate::error::ConfigError;
use crate::retry::RetryConfig;

pub const DEFAULT_SIGNAL_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_ANALYSIS_MODEL: &str = "gemini-2.5-pro";
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BASE_DELAY_MS: u64 = 1_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 60_000;

/// Settings needed to build an [`crate::AnalystClient`] against Gemini.
#[derive(Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub endpoint: String,
    /// Model used for trading signals.
    pub signal_model: String,
    /// Model used for briefings, news and chat.
    pub analysis_model: String,
    pub max_retries: u32,
    pub base_delay_ms: u64,
    /// Per-attempt HTTP timeout.
    pub timeout_ms: u64,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("api_key", &"<redacted>")
            .field("endpoint", &self.endpoint)
            .field("signal_model", &self.signal_model)
            .field("analysis_model", &self.analysis_model)
            .field("max_retries", &self.max_retries)
            .field("base_delay_ms", &self.base_delay_ms)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

impl ClientConfig {
    /// Configuration with defaults for everything except the key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: String::from(DEFAULT_ENDPOINT),
            signal_model: String::from(DEFAULT_SIGNAL_MODEL),
            analysis_model: String::from(DEFAULT_ANALYSIS_MODEL),
            max_retries: DEFAULT_MAX_RETRIES,
            base_delay_ms: DEFAULT_BASE_DELAY_MS,
            timeout_ms: DEFAULT_TIMEOUT_MS,
        }
    }

    /// Reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Reads settings through `lookup`; blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty())
        };

        let api_key = read("SIGNALCAST_API_KEY")
            .or_else(|| read("GEMINI_API_KEY"))
            .ok_or(ConfigError::MissingApiKey)?;

        let mut config = Self::new(api_key);
        if let Some(endpoint) = read("SIGNALCAST_ENDPOINT") {
            config.endpoint = endpoint;
        }
        if let Some(model) = read("SIGNALCAST_SIGNAL_MODEL") {
            config.signal_model = model;
        }
        if let Some(model) = read("SIGNALCAST_ANALYSIS_MODEL") {
            config.analysis_model = model;
        }
        if let Some(value) = read("SIGNALCAST_MAX_RETRIES") {
            config.max_retries = parse_number("SIGNALCAST_MAX_RETRIES", value)?;
        }
        if let Some(value) = read("SIGNALCAST_BASE_DELAY_MS") {
            config.base_delay_ms = parse_number("SIGNALCAST_BASE_DELAY_MS", value)?;
        }
        if let Some(value) = read("SIGNALCAST_TIMEOUT_MS") {
            config.timeout_ms = parse_number("SIGNALCAST_TIMEOUT_MS", value)?;
        }

        Ok(config)
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Exponential schedule built from `max_retries` and `base_delay_ms`.
    pub fn retry_config(&self) -> RetryConfig {
        RetryConfig::exponential(self.max_retries, Duration::from_millis(self.base_delay_ms))
    }
}

fn parse_number<T: FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .parse()
        .map_err(|_| ConfigError::InvalidValue { key, value })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(key, value)| ((*key).to_owned(), (*value).to_owned()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_key_is_set() {
        let config =
            ClientConfig::from_lookup(lookup(&[("SIGNALCAST_API_KEY", "k")])).expect("config");

        assert_eq!(config, ClientConfig::new("k"));
        assert_eq!(config.signal_model, DEFAULT_SIGNAL_MODEL);
        assert_eq!(config.analysis_model, DEFAULT_ANALYSIS_MODEL);
        assert_eq!(config.retry_config().max_retries, 3);
    }

    #[test]
    fn falls_back_to_gemini_key() {
        let config =
            ClientConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "g")])).expect("config");
        assert_eq!(config.api_key, "g");

        let config = ClientConfig::from_lookup(lookup(&[
            ("SIGNALCAST_API_KEY", "s"),
            ("GEMINI_API_KEY", "g"),
        ]))
        .expect("config");
        assert_eq!(config.api_key, "s");
    }

    #[test]
    fn missing_or_blank_key_is_an_error() {
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[])),
            Err(ConfigError::MissingApiKey)
        );
        assert_eq!(
            ClientConfig::from_lookup(lookup(&[("SIGNALCAST_API_KEY", "  ")])),
            Err(ConfigError::MissingApiKey)
        );
    }

    #[test]
    fn overrides_and_invalid_numbers() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("SIGNALCAST_API_KEY", "k"),
            ("SIGNALCAST_ENDPOINT", "http://localhost:9000/v1"),
            ("SIGNALCAST_MAX_RETRIES", "5"),
            ("SIGNALCAST_TIMEOUT_MS", "1500"),
        ]))
        .expect("config");
        assert_eq!(config.endpoint, "http://localhost:9000/v1");
        assert_eq!(config.max_retries, 5);
        assert_eq!(config.timeout_ms, 1_500);

        let err = ClientConfig::from_lookup(lookup(&[
            ("SIGNALCAST_API_KEY", "k"),
            ("SIGNALCAST_BASE_DELAY_MS", "soon"),
        ]))
        .expect_err("invalid delay");
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                key: "SIGNALCAST_BASE_DELAY_MS",
                value: String::from("soon"),
            }
        );
    }

    #[test]
    fn debug_output_redacts_key() {
        let rendered = format!("{:?}", ClientConfig::new("super-secret"));
        assert!(!rendered.contains("super-secret"));
    }
}
