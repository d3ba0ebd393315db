use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::UtcDateTime;

/// Trade direction of a signal. Never carries raw model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "BUY",
            Self::Sell => "SELL",
        }
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lifecycle of a stored signal. Transitions only from `Live` to `Expired`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalStatus {
    Live,
    Expired,
}

/// Categorical reading of the relative strength index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RsiInterpretation {
    Overbought,
    Oversold,
    Neutral,
}

impl RsiInterpretation {
    /// Case-insensitive match against the three known labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "overbought" => Some(Self::Overbought),
            "oversold" => Some(Self::Oversold),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// Five-level pivot point set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PivotPoints {
    pub r2: String,
    pub r1: String,
    pub pivot: String,
    pub s1: String,
    pub s2: String,
}

/// RSI value together with its interpretation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RsiReading {
    pub value: f64,
    pub interpretation: RsiInterpretation,
}

/// Simple moving averages over 20, 50 and 100 periods.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovingAverages {
    pub sma20: String,
    pub sma50: String,
    pub sma100: String,
}

/// Web citation attached to a signal when live grounding was used.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SignalSource {
    pub title: String,
    pub uri: String,
}

/// Canonical AI-generated trading signal.
///
/// `asset_name` and `update_time` always come from the caller and the capture
/// clock, never from the model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingSignal {
    pub asset_name: String,
    pub update_time: UtcDateTime,
    pub direction: Direction,
    pub confidence: u8,
    pub entry_price: String,
    pub tp1: String,
    pub tp2: String,
    pub sl: String,
    pub pivot_points: PivotPoints,
    pub rsi: RsiReading,
    pub sma: MovingAverages,
    pub strategy_description: String,
    pub risk_tip: String,
    pub sources: Vec<SignalSource>,
    pub status: SignalStatus,
}

/// Market sentiment label attached to a news article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

impl Sentiment {
    /// Case-insensitive match against the three known labels.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_lowercase().as_str() {
            "bullish" => Some(Self::Bullish),
            "bearish" => Some(Self::Bearish),
            "neutral" => Some(Self::Neutral),
            _ => None,
        }
    }
}

/// One article of a news batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsArticle {
    pub title: String,
    pub snippet: String,
    pub url: String,
    pub source_name: String,
    pub sentiment: Sentiment,
    pub impact_summary: String,
}

/// Author of a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

impl ChatRole {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Model => "model",
        }
    }
}

/// One entry of an append-only conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub text: String,
}

impl ChatTurn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Model,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn direction_serializes_uppercase() {
        let json = serde_json::to_string(&Direction::Sell).expect("serializable");
        assert_eq!(json, "\"SELL\"");
    }

    #[test]
    fn labels_match_case_insensitively() {
        assert_eq!(Sentiment::from_label(" BULLISH "), Some(Sentiment::Bullish));
        assert_eq!(Sentiment::from_label("mixed"), None);
        assert_eq!(
            RsiInterpretation::from_label("oversold"),
            Some(RsiInterpretation::Oversold)
        );
    }

    #[test]
    fn chat_roles_use_wire_names() {
        let turn = ChatTurn::model("hello");
        let json = serde_json::to_value(&turn).expect("serializable");
        assert_eq!(json["role"], "model");
    }
}
