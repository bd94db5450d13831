use serde::{Deserialize, Serialize};
use std::fmt;

/// Bar interval of a market snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "1m")]
    M1,
    #[serde(rename = "5m")]
    M5,
    #[serde(rename = "15m")]
    M15,
    #[serde(rename = "30m")]
    M30,
    #[serde(rename = "1h")]
    H1,
    #[serde(rename = "4h")]
    H4,
}

impl Timeframe {
    pub fn as_str(&self) -> &'static str {
        match self {
            Timeframe::M1 => "1m",
            Timeframe::M5 => "5m",
            Timeframe::M15 => "15m",
            Timeframe::M30 => "30m",
            Timeframe::H1 => "1h",
            Timeframe::H4 => "4h",
        }
    }

    /// Accepts both `1m` and broker-style `M1` spellings.
    pub fn from_str_loose(s: &str) -> Option<Timeframe> {
        match s.trim().to_lowercase().as_str() {
            "1m" | "m1" => Some(Timeframe::M1),
            "5m" | "m5" => Some(Timeframe::M5),
            "15m" | "m15" => Some(Timeframe::M15),
            "30m" | "m30" => Some(Timeframe::M30),
            "1h" | "h1" => Some(Timeframe::H1),
            "4h" | "h4" => Some(Timeframe::H4),
            _ => None,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_spellings() {
        assert_eq!(Timeframe::from_str_loose("M15"), Some(Timeframe::M15));
        assert_eq!(Timeframe::from_str_loose("1h"), Some(Timeframe::H1));
        assert_eq!(Timeframe::from_str_loose("1d"), None);
    }
}
