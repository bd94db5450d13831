pub mod candle;
pub mod decision;
pub mod direction;
pub mod signal;
pub mod timeframe;

pub use candle::{mean, percentile, std_dev, Candle, CandleSeries};
pub use decision::{ComponentScore, QualityAssessment, RecommendedParams, SessionInfo, TradeDecision};
pub use direction::*;
pub use signal::{AccountSnapshot, IndicatorSnapshot, LevelRequest, MarketSnapshot, Signal, SymbolSpec};
pub use timeframe::Timeframe;
