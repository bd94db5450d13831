use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::TpSlError;
use crate::models::{AccountSnapshot, Direction, LevelKind, LevelRequest, SymbolSpec, TpSlUnit};

const MIN_STOP_POINTS: f64 = 50.0;
const GOLD_MIN_STOP: f64 = 0.5;

fn is_gold(symbol_upper: &str) -> bool {
    symbol_upper.contains("XAU") || symbol_upper.contains("GOLD")
}

/// Price size of one pip: 0.01 for JPY pairs, 0.1 for gold, else 0.0001.
pub fn pip_size(symbol: &str) -> f64 {
    let s = symbol.to_uppercase();
    if s.contains("JPY") {
        0.01
    } else if is_gold(&s) {
        0.1
    } else {
        0.0001
    }
}

/// Account-currency value of one pip for `lot_size` lots.
pub fn pip_value(symbol: &str, lot_size: f64, contract_size: f64) -> f64 {
    let multiplier = if symbol.to_uppercase().contains("JPY") {
        0.01
    } else {
        0.0001
    };
    lot_size * contract_size * multiplier
}

/// Closest a TP/SL may sit to the current price:
/// `max(stops_level * point, 50 * point)`, and never under 0.5 for gold.
pub fn min_stop_distance(symbol: &str, spec: &SymbolSpec) -> f64 {
    let base = (spec.stops_level as f64 * spec.point).max(MIN_STOP_POINTS * spec.point);
    if is_gold(&symbol.to_uppercase()) {
        base.max(GOLD_MIN_STOP)
    } else {
        base
    }
}

pub fn round_to_digits(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Place a level `distance` away from `price`. Positive `signed_value`
/// means take-profit (with the trade), negative means stop-loss.
fn place(price: f64, distance: f64, direction: Direction, signed_value: f64) -> f64 {
    let with_trade = if signed_value > 0.0 { 1.0 } else { -1.0 };
    price + direction.sign() * with_trade * distance
}

/// Rewrite a distance value so its sign matches the slot: positive for TP,
/// negative for SL. Absolute prices and unknown units pass through.
fn signed_for_slot(value: &str, unit: &str, kind: LevelKind) -> String {
    let trimmed = value.trim();
    match TpSlUnit::from_str_loose(unit) {
        None | Some(TpSlUnit::Price) => trimmed.to_string(),
        Some(_) => {
            let magnitude = trimmed.trim_start_matches(&['-', '+'][..]);
            if magnitude.is_empty() {
                return trimmed.to_string();
            }
            match kind {
                LevelKind::TakeProfit => magnitude.to_string(),
                LevelKind::StopLoss => format!("-{}", magnitude),
            }
        }
    }
}

/// A TP/SL level after the minimum-distance check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClampedLevel {
    pub price: f64,
    pub adjusted: bool,
}

/// Push a computed level out to at least `min_distance` from `price` on the
/// side its kind requires. Levels already far enough are returned unchanged.
pub fn enforce_min_distance(
    level: f64,
    kind: LevelKind,
    direction: Direction,
    price: f64,
    min_distance: f64,
    digits: u32,
) -> ClampedLevel {
    // +1 when the level must sit above price
    let side = match (kind, direction) {
        (LevelKind::TakeProfit, Direction::Buy) | (LevelKind::StopLoss, Direction::Sell) => 1.0,
        (LevelKind::TakeProfit, Direction::Sell) | (LevelKind::StopLoss, Direction::Buy) => -1.0,
    };
    let bound = price + side * min_distance;
    let too_close = if side > 0.0 { level < bound } else { level > bound };

    if too_close {
        let clamped = round_to_digits(bound, digits);
        warn!(
            "{} {:.5} within minimum distance {:.5} of {:.5}; moved to {:.5}",
            kind, level, min_distance, price, clamped
        );
        ClampedLevel {
            price: clamped,
            adjusted: true,
        }
    } else {
        ClampedLevel {
            price: level,
            adjusted: false,
        }
    }
}

/// Converts TP/SL inputs in any supported unit into absolute prices for one
/// symbol.
#[derive(Debug, Clone)]
pub struct TpSlCalculator {
    symbol: String,
    spec: SymbolSpec,
    balance: Option<f64>,
    equity: Option<f64>,
}

impl TpSlCalculator {
    pub fn new(symbol: &str, spec: SymbolSpec) -> Self {
        Self {
            symbol: symbol.to_string(),
            spec,
            balance: None,
            equity: None,
        }
    }

    pub fn with_account(mut self, account: &AccountSnapshot) -> Self {
        self.balance = Some(account.balance);
        self.equity = Some(account.equity);
        self
    }

    pub fn spec(&self) -> &SymbolSpec {
        &self.spec
    }

    pub fn min_stop_distance(&self) -> f64 {
        min_stop_distance(&self.symbol, &self.spec)
    }

    /// Absolute price for a TP/SL input, `Ok(None)` when nothing was
    /// requested (empty or zero value).
    pub fn resolve(
        &self,
        value: &str,
        unit: &str,
        direction: Direction,
        current_price: f64,
        lot_size: f64,
    ) -> Result<Option<f64>, TpSlError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        let value: f64 = trimmed
            .parse()
            .map_err(|_| TpSlError::Unparsable(trimmed.to_string()))?;
        if !value.is_finite() {
            return Err(TpSlError::Unparsable(trimmed.to_string()));
        }
        if value == 0.0 {
            return Ok(None);
        }
        let unit = TpSlUnit::from_str_loose(unit).ok_or_else(|| TpSlError::InvalidUnit(unit.to_string()))?;
        if !(current_price.is_finite() && current_price > 0.0) {
            return Err(TpSlError::InvalidPrice(current_price));
        }

        let digits = self.spec.digits;
        let level = match unit {
            TpSlUnit::Pips => {
                let mut distance = value.abs() * pip_size(&self.symbol);
                let floor = self.min_stop_distance();
                if distance < floor {
                    warn!(
                        "{} pip distance {:.5} below minimum {:.5}, using minimum",
                        self.symbol, distance, floor
                    );
                    distance = floor;
                }
                place(current_price, distance, direction, value)
            }
            TpSlUnit::Price => {
                if value < 0.0 {
                    return Err(TpSlError::InvalidPrice(value));
                }
                value
            }
            TpSlUnit::Percent => {
                let fraction = value.abs() / 100.0;
                let with_trade = if value > 0.0 { 1.0 } else { -1.0 };
                current_price * (1.0 + direction.sign() * with_trade * fraction)
            }
            TpSlUnit::BalancePercent | TpSlUnit::EquityPercent => {
                let base = if unit == TpSlUnit::BalancePercent {
                    self.balance
                } else {
                    self.equity
                };
                let base = base.ok_or_else(|| {
                    TpSlError::ComputationFault(format!("{} requires account information", unit))
                })?;
                let money = base * value.abs() / 100.0;
                let distance = self.money_to_distance(money, lot_size)?;
                place(current_price, distance, direction, value)
            }
            TpSlUnit::Money => {
                let distance = self.money_to_distance(value.abs(), lot_size)?;
                place(current_price, distance, direction, value)
            }
        };

        if !level.is_finite() {
            return Err(TpSlError::ComputationFault(format!(
                "non-finite level for {} {}",
                trimmed, unit
            )));
        }
        if level <= 0.0 {
            return Err(TpSlError::InvalidPrice(level));
        }
        Ok(Some(round_to_digits(level, digits)))
    }

    /// Resolve a request filed as a take-profit or stop-loss. For distance
    /// units the slot decides the side: a TP is always placed with the trade
    /// and an SL against it, whatever sign the value was written with.
    pub fn resolve_request(
        &self,
        request: &LevelRequest,
        kind: LevelKind,
        direction: Direction,
        current_price: f64,
        lot_size: f64,
    ) -> Result<Option<f64>, TpSlError> {
        let value = signed_for_slot(&request.value, &request.unit, kind);
        self.resolve(&value, &request.unit, direction, current_price, lot_size)
    }

    /// Like [`resolve`](Self::resolve) but `0.0` for anything that does not
    /// produce a level. Callers must treat `0.0` as "absent".
    pub fn convert(
        &self,
        value: &str,
        unit: &str,
        direction: Direction,
        current_price: f64,
        lot_size: f64,
    ) -> f64 {
        match self.resolve(value, unit, direction, current_price, lot_size) {
            Ok(Some(level)) => level,
            Ok(None) => 0.0,
            Err(e) => {
                warn!("{} TP/SL conversion failed: {}", self.symbol, e);
                0.0
            }
        }
    }

    /// Money amount to price offset via the pip value of the position.
    fn money_to_distance(&self, money: f64, lot_size: f64) -> Result<f64, TpSlError> {
        let pv = pip_value(&self.symbol, lot_size, self.spec.contract_size);
        let denom = pv * lot_size;
        if !(denom.is_finite() && denom > 0.0) {
            return Err(TpSlError::ComputationFault(format!(
                "pip value {} with lot size {} gives no conversion",
                pv, lot_size
            )));
        }
        let pip_distance = money / denom;
        Ok(pip_distance * self.spec.point * 10.0)
    }
}

/// One-shot conversion with the conventional spec for `symbol` and no
/// account information.
pub fn convert_tp_sl(
    value: &str,
    unit: &str,
    symbol: &str,
    direction: Direction,
    current_price: f64,
    lot_size: f64,
) -> f64 {
    TpSlCalculator::new(symbol, SymbolSpec::for_symbol(symbol)).convert(
        value,
        unit,
        direction,
        current_price,
        lot_size,
    )
}
