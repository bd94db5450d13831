use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::core::profiles::{self, ProfileRule, SymbolProfile};
use crate::error::ConfigError;
use crate::models::Timeframe;

pub const TECHNICAL_CONFLUENCE: &str = "technical_confluence";
pub const MARKET_STRUCTURE: &str = "market_structure";
pub const MOMENTUM_ALIGNMENT: &str = "momentum_alignment";
pub const VOLUME_CONFIRMATION: &str = "volume_confirmation";
pub const SPREAD_QUALITY: &str = "spread_quality";
pub const SESSION_SUITABILITY: &str = "session_suitability";
pub const VOLATILITY_HEALTH: &str = "volatility_health";
pub const RISK_REWARD: &str = "risk_reward";

/// Session multipliers by UTC window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMultipliers {
    pub london_ny_overlap: f64,
    pub london: f64,
    pub new_york: f64,
    pub asian_active: f64,
    pub off_hours: f64,
}

impl Default for SessionMultipliers {
    fn default() -> Self {
        Self {
            london_ny_overlap: 2.0,
            london: 1.5,
            new_york: 1.3,
            asian_active: 1.0,
            off_hours: 0.6,
        }
    }
}

/// Upper bounds of ATR / min-volatility for LOW, NORMAL and HIGH. Anything
/// at or above `high` is EXTREME.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegimeBands {
    pub low: f64,
    pub normal: f64,
    pub high: f64,
    pub atr_period: usize,
}

impl Default for RegimeBands {
    fn default() -> Self {
        Self {
            low: 0.5,
            normal: 3.0,
            high: 6.0,
            atr_period: 14,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Symbol profiles (ordered, first match wins)
    pub profile_rules: Vec<ProfileRule>,
    pub default_profile: SymbolProfile,

    // Aggregation
    pub component_weights: HashMap<String, f64>,
    pub default_weight: f64,

    // Gate
    pub min_composite_score: f64,
    pub session_multipliers: SessionMultipliers,
    pub regime_bands: RegimeBands,

    // Orchestration
    pub snapshot_timeframe: Timeframe,
    pub snapshot_bars: usize,
    pub default_lot_size: f64,
    pub evaluation_timeout_ms: u64,

    // Logging
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            profile_rules: profiles::default_rules(),
            default_profile: profiles::default_profile(),
            component_weights: default_weights(),
            default_weight: 0.05,
            min_composite_score: 0.4,
            session_multipliers: SessionMultipliers::default(),
            regime_bands: RegimeBands::default(),
            snapshot_timeframe: Timeframe::M1,
            snapshot_bars: 100,
            default_lot_size: 0.01,
            evaluation_timeout_ms: 2000,
            log_level: "INFO".to_string(),
        }
    }
}

pub fn default_weights() -> HashMap<String, f64> {
    let mut weights = HashMap::new();
    weights.insert(TECHNICAL_CONFLUENCE.to_string(), 0.20);
    weights.insert(MARKET_STRUCTURE.to_string(), 0.18);
    weights.insert(MOMENTUM_ALIGNMENT.to_string(), 0.15);
    weights.insert(VOLUME_CONFIRMATION.to_string(), 0.12);
    weights.insert(SPREAD_QUALITY.to_string(), 0.10);
    weights.insert(SESSION_SUITABILITY.to_string(), 0.10);
    weights.insert(VOLATILITY_HEALTH.to_string(), 0.08);
    weights.insert(RISK_REWARD.to_string(), 0.07);
    weights
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let defaults = Config::default();

        Config {
            min_composite_score: env("MIN_COMPOSITE_SCORE", "0.4")
                .parse()
                .unwrap_or(defaults.min_composite_score),
            snapshot_timeframe: Timeframe::from_str_loose(&env("SNAPSHOT_TIMEFRAME", "1m"))
                .unwrap_or(defaults.snapshot_timeframe),
            snapshot_bars: env("SNAPSHOT_BARS", "100").parse().unwrap_or(defaults.snapshot_bars),
            default_lot_size: env("DEFAULT_LOT_SIZE", "0.01")
                .parse()
                .unwrap_or(defaults.default_lot_size),
            evaluation_timeout_ms: env("EVALUATION_TIMEOUT_MS", "2000")
                .parse()
                .unwrap_or(defaults.evaluation_timeout_ms),
            log_level: env("LOG_LEVEL", "INFO"),
            ..defaults
        }
    }

    pub fn profile_for(&self, symbol: &str) -> &SymbolProfile {
        profiles::lookup(&self.profile_rules, &self.default_profile, symbol)
    }

    /// Weight for a component; unlisted components get `default_weight`.
    pub fn weight_for(&self, component: &str) -> f64 {
        self.component_weights
            .get(component)
            .copied()
            .unwrap_or(self.default_weight)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_profile.validate()?;
        for rule in &self.profile_rules {
            if rule.pattern.is_empty() {
                return Err(ConfigError::Empty("profile rule pattern"));
            }
            rule.profile.validate()?;
        }

        if self.component_weights.is_empty() {
            return Err(ConfigError::Empty("component_weights"));
        }
        let mut weights: Vec<(&str, f64)> = self
            .component_weights
            .iter()
            .map(|(k, v)| (k.as_str(), *v))
            .collect();
        weights.push(("default_weight", self.default_weight));

        let s = &self.session_multipliers;
        let b = &self.regime_bands;
        let checks = weights.into_iter().chain([
            ("session.london_ny_overlap", s.london_ny_overlap),
            ("session.london", s.london),
            ("session.new_york", s.new_york),
            ("session.asian_active", s.asian_active),
            ("session.off_hours", s.off_hours),
            ("regime.low", b.low),
            ("regime.normal", b.normal),
            ("regime.high", b.high),
            ("default_lot_size", self.default_lot_size),
        ]);
        for (field, value) in checks {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NonPositive {
                    field: field.to_string(),
                    value,
                });
            }
        }

        if b.atr_period == 0 {
            return Err(ConfigError::NonPositive {
                field: "regime.atr_period".to_string(),
                value: 0.0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        let total: f64 = cfg.component_weights.values().sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn unlisted_component_gets_default_weight() {
        let cfg = Config::default();
        assert_eq!(cfg.weight_for(TECHNICAL_CONFLUENCE), 0.20);
        assert_eq!(cfg.weight_for("order_flow"), 0.05);
    }

    #[test]
    fn non_positive_multiplier_rejected() {
        let mut cfg = Config::default();
        cfg.session_multipliers.off_hours = 0.0;
        match cfg.validate() {
            Err(ConfigError::NonPositive { field, .. }) => assert_eq!(field, "session.off_hours"),
            other => panic!("expected NonPositive, got {:?}", other),
        }
    }

    #[test]
    fn empty_weights_rejected() {
        let mut cfg = Config::default();
        cfg.component_weights.clear();
        assert_eq!(cfg.validate(), Err(ConfigError::Empty("component_weights")));
    }

    #[test]
    fn profile_for_uses_rules() {
        let cfg = Config::default();
        assert_eq!(cfg.profile_for("XAUUSD").max_spread, 5.0);
        assert_eq!(cfg.profile_for("NZDCAD").name, "DEFAULT");
    }
}
