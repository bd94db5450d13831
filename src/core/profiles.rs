use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Per-instrument-family thresholds. Every field is strictly positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolProfile {
    pub name: String,
    /// Maximum acceptable spread, in pips.
    pub max_spread: f64,
    /// Minimum healthy volatility, in price units.
    pub min_volatility: f64,
    pub base_confidence: f64,
}

impl SymbolProfile {
    pub fn new(name: &str, max_spread: f64, min_volatility: f64, base_confidence: f64) -> Self {
        Self {
            name: name.to_string(),
            max_spread,
            min_volatility,
            base_confidence,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("max_spread", self.max_spread),
            ("min_volatility", self.min_volatility),
            ("base_confidence", self.base_confidence),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive {
                    field: format!("profile {}.{}", self.name, field),
                    value,
                });
            }
        }
        Ok(())
    }
}

/// Substring pattern to profile mapping. Rules are tried in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileRule {
    pub pattern: String,
    pub profile: SymbolProfile,
}

impl ProfileRule {
    pub fn new(pattern: &str, profile: SymbolProfile) -> Self {
        Self {
            pattern: pattern.to_uppercase(),
            profile,
        }
    }

    pub fn matches(&self, symbol_upper: &str) -> bool {
        symbol_upper.contains(&self.pattern)
    }
}

pub fn default_profile() -> SymbolProfile {
    SymbolProfile::new("DEFAULT", 3.0, 0.001, 0.30)
}

/// Metals and crypto come first so `XAUUSD` never falls through to a USD pair rule.
pub fn default_rules() -> Vec<ProfileRule> {
    let gold = SymbolProfile::new("XAUUSD", 5.0, 0.10, 0.20);
    vec![
        ProfileRule::new("XAU", gold.clone()),
        ProfileRule::new("GOLD", gold),
        ProfileRule::new("BTC", SymbolProfile::new("BTCUSD", 10.0, 5.0, 0.20)),
        ProfileRule::new("EURUSD", SymbolProfile::new("EURUSD", 2.0, 0.0002, 0.25)),
        ProfileRule::new("GBPUSD", SymbolProfile::new("GBPUSD", 3.0, 0.0003, 0.30)),
        ProfileRule::new("USDJPY", SymbolProfile::new("USDJPY", 2.5, 0.02, 0.25)),
    ]
}

/// First rule whose pattern is contained in the (case-insensitive) symbol,
/// else the default profile.
pub fn lookup<'a>(
    rules: &'a [ProfileRule],
    default: &'a SymbolProfile,
    symbol: &str,
) -> &'a SymbolProfile {
    let upper = symbol.to_uppercase();
    rules
        .iter()
        .find(|r| r.matches(&upper))
        .map(|r| &r.profile)
        .unwrap_or(default)
}
