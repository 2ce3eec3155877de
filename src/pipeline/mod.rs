//! Batch pipeline: orchestration, progress reporting and summarization

pub mod aggregate;
pub mod orchestrator;
pub mod progress;

pub use aggregate::{Aggregator, TOP_CATEGORIES, TOP_FILES};
pub use orchestrator::{BatchOrchestrator, DEFAULT_DELAY};
pub use progress::{ConsoleSink, MemorySink, NoOpSink, ProgressEvent, ProgressSink};
