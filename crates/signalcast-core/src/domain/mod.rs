//! # Domain Models
//!
//! Canonical records produced by the acquisition layer and the read-only
//! catalog data it consumes.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`TradingSignal`] | Normalized AI trading signal |
//! | [`NewsArticle`] | One article of a sentiment-tagged news batch |
//! | [`ChatTurn`] | One turn of a follow-up conversation |
//! | [`UserProfile`] | Trading style and risk tolerance used in prompts |
//! | [`AssetCatalog`] | Asset table and charting-symbol mapping |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Every record is an immutable value object; nothing here holds state
//! between acquisition calls.

mod catalog;
mod models;
mod profile;
mod timestamp;

pub use catalog::{Asset, AssetCatalog, AssetCategory, NewsCategory};
pub use models::{
    ChatRole, ChatTurn, Direction, MovingAverages, NewsArticle, PivotPoints, RsiInterpretation,
    RsiReading, Sentiment, SignalSource, SignalStatus, TradingSignal,
};
pub use profile::{RiskTolerance, TradingStyle, UserProfile};
pub use timestamp::UtcDateTime;
