use thiserror::Error;

use crate::backend::BackendError;
use crate::extract::ExtractionError;

/// Validation errors for caller-supplied values and domain labels.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("asset name cannot be empty")]
    EmptyAssetName,
    #[error("chat message cannot be empty")]
    EmptyMessage,

    #[error("invalid asset category '{value}', expected one of Stocks, Forex, Commodities, Indices, Crypto")]
    InvalidCategory { value: String },
    #[error("invalid trading style '{value}', expected one of Scalper, Day Trader, Swing Trader, Position Trader")]
    InvalidTradingStyle { value: String },
    #[error("invalid risk tolerance '{value}', expected one of Low, Medium, High")]
    InvalidRiskTolerance { value: String },

    #[error("timestamp must be RFC3339 UTC (suffix Z): '{value}'")]
    TimestampNotUtc { value: String },

    #[error("request_id must be at least 8 characters")]
    InvalidRequestId,
    #[error("command name cannot be empty")]
    EmptyCommand,
    #[error("error code cannot be empty")]
    EmptyErrorCode,
    #[error("error message cannot be empty")]
    EmptyErrorMessage,
}

/// Configuration errors raised while assembling a client from the environment.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("no API key configured; set SIGNALCAST_API_KEY or GEMINI_API_KEY")]
    MissingApiKey,
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

/// Internal failure raised by the retry, extraction and normalization stages.
///
/// Never returned to callers of [`crate::AnalystClient`]; the façade turns it
/// into a [`crate::ClassifiedError`] exactly once.
#[derive(Debug, Error)]
pub enum AcquisitionError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("payload is missing required field '{field}'")]
    MissingField { field: &'static str },

    #[error("model returned an empty response")]
    EmptyResponse,

    #[error(transparent)]
    Validation(#[from] ValidationError),
}
