use serde::Deserialize;

use super::{lenient_number, lenient_object, lenient_text};
use crate::backend::GroundingChunk;
use crate::{
    Direction, MovingAverages, PivotPoints, RsiInterpretation, RsiReading, SignalSource,
    SignalStatus, TradingSignal, UtcDateTime,
};

const UNKNOWN_SOURCE_TITLE: &str = "Unknown Source";

/// Signal payload as the model returned it. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSignal {
    #[serde(deserialize_with = "lenient_text")]
    direction: String,
    #[serde(deserialize_with = "lenient_number")]
    confidence: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    entry_price: String,
    #[serde(deserialize_with = "lenient_text")]
    tp1: String,
    #[serde(deserialize_with = "lenient_text")]
    tp2: String,
    #[serde(deserialize_with = "lenient_text")]
    sl: String,
    #[serde(deserialize_with = "lenient_object")]
    pivot_points: Option<RawPivotPoints>,
    #[serde(deserialize_with = "lenient_object")]
    rsi: Option<RawRsi>,
    #[serde(deserialize_with = "lenient_object")]
    sma: Option<RawSma>,
    #[serde(deserialize_with = "lenient_text")]
    strategy_description: String,
    #[serde(deserialize_with = "lenient_text")]
    risk_tip: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct RawPivotPoints {
    #[serde(deserialize_with = "lenient_text")]
    r2: String,
    #[serde(deserialize_with = "lenient_text")]
    r1: String,
    #[serde(deserialize_with = "lenient_text")]
    pivot: String,
    #[serde(deserialize_with = "lenient_text")]
    s1: String,
    #[serde(deserialize_with = "lenient_text")]
    s2: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct RawRsi {
    #[serde(deserialize_with = "lenient_number")]
    value: Option<f64>,
    #[serde(deserialize_with = "lenient_text")]
    interpretation: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct RawSma {
    #[serde(deserialize_with = "lenient_text")]
    sma20: String,
    #[serde(deserialize_with = "lenient_text")]
    sma50: String,
    #[serde(deserialize_with = "lenient_text")]
    sma100: String,
}

/// Builds the canonical signal. Asset name and capture time come from the
/// caller; the model is never trusted for either.
pub fn normalize_signal(
    raw: RawSignal,
    asset_name: &str,
    grounding: &[GroundingChunk],
    captured_at: UtcDateTime,
) -> TradingSignal {
    let pivot_points = raw.pivot_points.unwrap_or_default();
    let rsi = raw.rsi.unwrap_or_default();
    let sma = raw.sma.unwrap_or_default();

    TradingSignal {
        asset_name: asset_name.to_owned(),
        update_time: captured_at,
        direction: coerce_direction(&raw.direction),
        confidence: clamp_confidence(raw.confidence),
        entry_price: raw.entry_price,
        tp1: raw.tp1,
        tp2: raw.tp2,
        sl: raw.sl,
        pivot_points: PivotPoints {
            r2: pivot_points.r2,
            r1: pivot_points.r1,
            pivot: pivot_points.pivot,
            s1: pivot_points.s1,
            s2: pivot_points.s2,
        },
        rsi: RsiReading {
            value: rsi.value.unwrap_or_default(),
            interpretation: coerce_interpretation(&rsi.interpretation),
        },
        sma: MovingAverages {
            sma20: sma.sma20,
            sma50: sma.sma50,
            sma100: sma.sma100,
        },
        strategy_description: raw.strategy_description,
        risk_tip: raw.risk_tip,
        sources: collect_sources(grounding),
        status: SignalStatus::Live,
    }
}

/// Anything other than `SELL` (case-insensitive) becomes `BUY`.
pub fn coerce_direction(raw: &str) -> Direction {
    let upper = raw.trim().to_ascii_uppercase();
    match upper.as_str() {
        "SELL" => Direction::Sell,
        "BUY" => Direction::Buy,
        _ => {
            tracing::warn!(direction = %raw, "invalid direction from model; defaulting to BUY");
            Direction::Buy
        }
    }
}

/// Rounds to an integer percentage within `0..=100`; missing values become 0.
pub fn clamp_confidence(raw: Option<f64>) -> u8 {
    match raw {
        Some(value) if value.is_finite() => value.round().clamp(0.0, 100.0) as u8,
        _ => 0,
    }
}

fn coerce_interpretation(raw: &str) -> RsiInterpretation {
    RsiInterpretation::from_label(raw).unwrap_or_else(|| {
        if !raw.is_empty() {
            tracing::warn!(interpretation = %raw, "unknown RSI interpretation; using Neutral");
        }
        RsiInterpretation::Neutral
    })
}

/// One source per grounding chunk that has a URI; title falls back to a placeholder.
pub fn collect_sources(grounding: &[GroundingChunk]) -> Vec<SignalSource> {
    grounding
        .iter()
        .filter_map(|chunk| {
            let uri = chunk.uri.as_deref().map(str::trim).filter(|uri| !uri.is_empty())?;
            let title = chunk
                .title
                .as_deref()
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .unwrap_or(UNKNOWN_SOURCE_TITLE);
            Some(SignalSource {
                title: title.to_owned(),
                uri: uri.to_owned(),
            })
        })
        .collect()
}
