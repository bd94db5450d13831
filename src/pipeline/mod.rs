pub mod engine;
pub mod service;
pub mod stats;

pub use engine::SignalPipeline;
pub use service::SignalService;
pub use stats::{PipelineStatistics, StatisticsSnapshot};
