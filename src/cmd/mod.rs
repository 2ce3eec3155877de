//! Command handlers for the code-slim CLI
//!
//! Each submodule handles a specific CLI command.

pub mod completions;
pub mod init;
pub mod run;

// Re-export command functions for convenient access
pub use completions::cmd_completions;
pub use init::cmd_init;
pub use run::{cmd_run, RunOptions};
