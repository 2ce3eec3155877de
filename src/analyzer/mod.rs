//! Remote analysis integration
//!
//! Client contract and implementation, tolerant reply parsing, the
//! estimation policy, and the per-file runner that ties them together.

pub mod client;
pub mod estimate;
pub mod parser;
pub mod runner;

pub use client::{AnalysisClient, AnalysisError, OpenAiClient};
pub use estimate::{estimated_saving, MAX_ESTIMATED_SAVING};
pub use parser::parse_analysis;
pub use runner::FileAnalysisRunner;
