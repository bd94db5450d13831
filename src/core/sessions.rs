use chrono::{DateTime, Timelike, Utc};

use crate::config::SessionMultipliers;
use crate::models::{SessionInfo, SessionName};

/// Session for a UTC hour. Windows overlap, so they are checked from the
/// most liquid outward: overlap 13-17, London 8-17, New York 13-22,
/// Asian 0-9, otherwise off-hours.
pub fn session_info(hour: u32, multipliers: &SessionMultipliers) -> SessionInfo {
    let (name, multiplier) = match hour {
        13..=17 => (SessionName::LondonNyOverlap, multipliers.london_ny_overlap),
        8..=17 => (SessionName::London, multipliers.london),
        13..=22 => (SessionName::NewYork, multipliers.new_york),
        0..=9 => (SessionName::AsianActive, multipliers.asian_active),
        _ => (SessionName::OffHours, multipliers.off_hours),
    };
    SessionInfo { name, multiplier }
}

pub fn session_at(time: DateTime<Utc>, multipliers: &SessionMultipliers) -> SessionInfo {
    session_info(time.hour(), multipliers)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    MetalOrCrypto,
    EuropeanFx,
    AmericanFx,
    Other,
}

fn family(symbol: &str) -> Family {
    let s = symbol.to_uppercase();
    if s.contains("XAU") || s.contains("GOLD") || s.contains("BTC") {
        Family::MetalOrCrypto
    } else if s.contains("EUR") || s.contains("GBP") {
        Family::EuropeanFx
    } else if s.contains("USD") || s.contains("CAD") {
        Family::AmericanFx
    } else {
        Family::Other
    }
}

/// How well the UTC hour suits the symbol's family, in `[0, 1]`.
pub fn session_suitability(symbol: &str, hour: u32) -> f64 {
    let overlap = (13..=17).contains(&hour);
    match family(symbol) {
        Family::MetalOrCrypto => {
            if overlap {
                1.0
            } else if (8..=22).contains(&hour) {
                0.8
            } else {
                0.6
            }
        }
        Family::EuropeanFx => {
            if overlap {
                1.0
            } else if (8..=17).contains(&hour) {
                0.9
            } else {
                0.4
            }
        }
        Family::AmericanFx => {
            if overlap {
                1.0
            } else if (13..=22).contains(&hour) {
                0.9
            } else {
                0.5
            }
        }
        Family::Other => 0.7,
    }
}
