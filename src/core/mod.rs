pub mod profiles;
pub mod sessions;
pub mod sizing;
pub mod tp_sl;
pub mod volatility;
