use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// Holding-period preference of the trader a signal is tailored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradingStyle {
    Scalper,
    #[serde(rename = "Day Trader")]
    DayTrader,
    #[serde(rename = "Swing Trader")]
    SwingTrader,
    #[serde(rename = "Position Trader")]
    PositionTrader,
}

impl TradingStyle {
    pub const ALL: [Self; 4] = [
        Self::Scalper,
        Self::DayTrader,
        Self::SwingTrader,
        Self::PositionTrader,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scalper => "Scalper",
            Self::DayTrader => "Day Trader",
            Self::SwingTrader => "Swing Trader",
            Self::PositionTrader => "Position Trader",
        }
    }
}

impl Display for TradingStyle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TradingStyle {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized: String = value
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|style| style.as_str().replace(' ', "").to_ascii_lowercase() == normalized)
            .ok_or_else(|| ValidationError::InvalidTradingStyle {
                value: value.to_owned(),
            })
    }
}

/// Risk appetite of the trader a signal is tailored for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskTolerance {
    Low,
    Medium,
    High,
}

impl RiskTolerance {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        }
    }
}

impl Display for RiskTolerance {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskTolerance {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            _ => Err(ValidationError::InvalidRiskTolerance {
                value: value.to_owned(),
            }),
        }
    }
}

/// Trader profile embedded into signal prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub trading_style: TradingStyle,
    pub risk_tolerance: RiskTolerance,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            trading_style: TradingStyle::SwingTrader,
            risk_tolerance: RiskTolerance::Medium,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_styles_with_loose_spacing() {
        assert_eq!("day trader".parse::<TradingStyle>(), Ok(TradingStyle::DayTrader));
        assert_eq!("position-trader".parse::<TradingStyle>(), Ok(TradingStyle::PositionTrader));
        assert!("hodler".parse::<TradingStyle>().is_err());
    }

    #[test]
    fn profile_round_trips_original_wire_format() {
        let json = r#"{"tradingStyle":"Day Trader","riskTolerance":"High"}"#;
        let profile: UserProfile = serde_json::from_str(json).expect("valid profile");
        assert_eq!(profile.trading_style, TradingStyle::DayTrader);
        assert_eq!(profile.risk_tolerance, RiskTolerance::High);
    }
}
