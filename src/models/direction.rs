use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Buy,
    Sell,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Buy => "BUY",
            Direction::Sell => "SELL",
        }
    }

    /// +1 for BUY, -1 for SELL.
    pub fn sign(&self) -> f64 {
        match self {
            Direction::Buy => 1.0,
            Direction::Sell => -1.0,
        }
    }

    pub fn from_str_loose(s: &str) -> Option<Direction> {
        match s.trim().to_uppercase().as_str() {
            "BUY" | "LONG" => Some(Direction::Buy),
            "SELL" | "SHORT" => Some(Direction::Sell),
            _ => None,
        }
    }
}

/// What one indicator says about direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum IndicatorVote {
    Buy,
    Sell,
    Neutral,
}

impl IndicatorVote {
    pub fn agrees_with(self, direction: Direction) -> bool {
        matches!(
            (self, direction),
            (IndicatorVote::Buy, Direction::Buy) | (IndicatorVote::Sell, Direction::Sell)
        )
    }
}

impl fmt::Display for IndicatorVote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorVote::Buy => write!(f, "BUY"),
            IndicatorVote::Sell => write!(f, "SELL"),
            IndicatorVote::Neutral => write!(f, "NEUTRAL"),
        }
    }
}

/// Discrete quality bucket. Declared worst-first so `Ord` follows quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "REJECT")]
    Reject,
    #[serde(rename = "LOW_QUALITY")]
    Low,
    #[serde(rename = "ACCEPTABLE_QUALITY")]
    Acceptable,
    #[serde(rename = "GOOD_QUALITY")]
    Good,
    #[serde(rename = "HIGH_QUALITY")]
    High,
    #[serde(rename = "ULTRA_HIGH_QUALITY")]
    UltraHigh,
}

impl Grade {
    pub const ALL: [Grade; 6] = [
        Grade::Reject,
        Grade::Low,
        Grade::Acceptable,
        Grade::Good,
        Grade::High,
        Grade::UltraHigh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Grade::Reject => "REJECT",
            Grade::Low => "LOW_QUALITY",
            Grade::Acceptable => "ACCEPTABLE_QUALITY",
            Grade::Good => "GOOD_QUALITY",
            Grade::High => "HIGH_QUALITY",
            Grade::UltraHigh => "ULTRA_HIGH_QUALITY",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VolatilityRegime {
    Low,
    Normal,
    High,
    Extreme,
}

impl fmt::Display for VolatilityRegime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VolatilityRegime::Low => write!(f, "LOW"),
            VolatilityRegime::Normal => write!(f, "NORMAL"),
            VolatilityRegime::High => write!(f, "HIGH"),
            VolatilityRegime::Extreme => write!(f, "EXTREME"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionName {
    LondonNyOverlap,
    London,
    NewYork,
    AsianActive,
    OffHours,
}

impl fmt::Display for SessionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionName::LondonNyOverlap => write!(f, "LONDON_NY_OVERLAP"),
            SessionName::London => write!(f, "LONDON"),
            SessionName::NewYork => write!(f, "NEW_YORK"),
            SessionName::AsianActive => write!(f, "ASIAN_ACTIVE"),
            SessionName::OffHours => write!(f, "OFF_HOURS"),
        }
    }
}

/// Quoting convention of a TP/SL input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TpSlUnit {
    Pips,
    Price,
    Percent,
    BalancePercent,
    EquityPercent,
    Money,
}

impl TpSlUnit {
    pub fn from_str_loose(s: &str) -> Option<TpSlUnit> {
        match s.trim().to_lowercase().as_str() {
            "pips" | "pip" => Some(TpSlUnit::Pips),
            "price" => Some(TpSlUnit::Price),
            "percent" | "percentage" | "%" => Some(TpSlUnit::Percent),
            "balance%" => Some(TpSlUnit::BalancePercent),
            "equity%" => Some(TpSlUnit::EquityPercent),
            "money" => Some(TpSlUnit::Money),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TpSlUnit::Pips => "pips",
            TpSlUnit::Price => "price",
            TpSlUnit::Percent => "percent",
            TpSlUnit::BalancePercent => "balance%",
            TpSlUnit::EquityPercent => "equity%",
            TpSlUnit::Money => "money",
        }
    }
}

impl fmt::Display for TpSlUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    TakeProfit,
    StopLoss,
}

impl fmt::Display for LevelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelKind::TakeProfit => write!(f, "TP"),
            LevelKind::StopLoss => write!(f, "SL"),
        }
    }
}
