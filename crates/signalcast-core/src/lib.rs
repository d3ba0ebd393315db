//! Core contracts for signalcast.
//!
//! This crate acquires AI-generated market analysis and turns loosely
//! structured model output into typed records:
//! - Canonical domain models (signals, news, chat turns, profiles, catalog)
//! - Generative backend trait and the Gemini transport
//! - Retry with exponential backoff and jitter
//! - Payload extraction and per-record normalization
//! - Error classification into user-facing categories
//! - The [`AnalystClient`] façade and the response envelope
//!
//! # Pipeline
//!
//! | Stage | Module | Failure |
//! |-------|--------|---------|
//! | Network call with retries | [`retry`], [`backend`] | [`BackendError`] |
//! | Locate and decode payload | [`extract`] | [`ExtractionError`] |
//! | Build domain record | [`normalize`] | [`AcquisitionError`] |
//! | Map failure for display | [`classify`] | [`ClassifiedError`] |

pub mod backend;
pub mod classify;
pub mod client;
pub mod config;
pub mod domain;
pub mod envelope;
pub mod error;
pub mod extract;
pub mod http_client;
pub mod normalize;
pub mod prompts;
pub mod retry;

pub use backend::{
    BackendError, BackendErrorKind, GeminiBackend, GenerateRequest, GenerateResponse,
    GenerativeBackend, GroundingChunk, ScriptedBackend,
};
pub use classify::{classify, ClassifiedError, ErrorCategory, Surface};
pub use client::AnalystClient;
pub use config::ClientConfig;
pub use domain::{
    Asset, AssetCatalog, AssetCategory, ChatRole, ChatTurn, Direction, MovingAverages,
    NewsArticle, NewsCategory, PivotPoints, RiskTolerance, RsiInterpretation, RsiReading,
    Sentiment, SignalSource, SignalStatus, TradingSignal, TradingStyle, UserProfile, UtcDateTime,
};
pub use envelope::{Envelope, EnvelopeError, EnvelopeMeta};
pub use error::{AcquisitionError, ConfigError, ValidationError};
pub use extract::{extract_structured, ExtractionError};
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient, ScriptedHttpClient,
};
pub use retry::{
    execute_with_retry, Backoff, FastrandJitter, FixedJitter, JitterSource, Pause,
    RecordingPause, RetryConfig, TokioPause,
};
