use thiserror::Error;

/// Why a component scorer could not produce a value. Never leaves the
/// scorer boundary: the pipeline maps every fault to that scorer's fallback.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoreFault {
    #[error("insufficient data: need {needed} bars, have {available}")]
    InsufficientData { needed: usize, available: usize },
    #[error("missing field: {0}")]
    MissingField(&'static str),
    #[error("computation fault: {0}")]
    ComputationFault(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TpSlError {
    #[error("invalid TP/SL unit: {0}")]
    InvalidUnit(String),
    #[error("unparsable TP/SL value: {0:?}")]
    Unparsable(String),
    #[error("invalid price: {0}")]
    InvalidPrice(f64),
    #[error("TP/SL computation fault: {0}")]
    ComputationFault(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be strictly positive (got {value})")]
    NonPositive { field: String, value: f64 },
    #[error("{0} must not be empty")]
    Empty(&'static str),
}
