pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod providers;
pub mod quality;
#[cfg(test)]
pub mod test_helpers;

pub use crate::core::tp_sl::convert_tp_sl;
pub use pipeline::{SignalPipeline, SignalService};
