//! Error types with contextual suggestions
//!
//! Provides structured error types that include:
//! - Actionable error messages
//! - Suggested fixes and recovery actions
//! - Proper exit codes for CI/CD
//!
//! Per-file analysis failures are data, not errors: they live in
//! [`crate::model::FileResult`] and never reach this module. These types
//! cover the faults that stop a command outright.

use std::path::PathBuf;
use thiserror::Error;

use crate::analyzer::AnalysisError;
use crate::scanner::ScanError;
use crate::writeback::WriteBackError;

/// Command-stopping code-slim errors with contextual suggestions
#[derive(Error, Debug)]
pub enum CodeSlimError {
    /// File discovery failed before the first analysis
    #[error("Discovery failed for {root}")]
    Discovery {
        /// Root path that was scanned
        root: PathBuf,
        #[source]
        /// Scan error source
        source: ScanError,
    },

    /// Analysis client could not be constructed or reached
    #[error("analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Write-back failed at the directory level
    #[error("write-back error: {0}")]
    WriteBack(#[from] WriteBackError),

    /// Overwrite requested without confirmation
    #[error("--overwrite replaces files under {root} and requires --yes")]
    OverwriteNotConfirmed {
        /// Root whose files would be replaced
        root: PathBuf,
    },

    /// Configuration file is present but invalid
    #[error("Invalid configuration: {reason}")]
    ConfigInvalid {
        /// What failed validation
        reason: String,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },
}

impl CodeSlimError {
    /// Get actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use code_slim::error::CodeSlimError;
    ///
    /// let error = CodeSlimError::ConfigInvalid {
    ///     reason: "batch.delay-ms too large".to_string(),
    /// };
    ///
    /// let suggestion = error.suggestion();
    /// assert!(suggestion.is_some());
    /// assert!(suggestion.unwrap().contains("code-slim init"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::Discovery { root, .. } => Some(format!(
                "Ensure {} exists and is a readable directory",
                root.display()
            )),
            Self::Analysis(AnalysisError::MissingApiKey) => Some(
                "Set OPENAI_API_KEY or add analysis.api-key to .code-slim.toml".to_string(),
            ),
            Self::Analysis(AnalysisError::Api { status, .. }) => {
                if *status == 401 || *status == 403 {
                    Some("Check that your API key is valid and has access to the configured model".to_string())
                } else if *status == 429 {
                    Some("Rate limited. Increase batch.delay-ms or retry later".to_string())
                } else {
                    Some("Check the service status and the configured analysis.api-url".to_string())
                }
            }
            Self::Analysis(_) => {
                Some("Check network connectivity and the configured analysis.api-url".to_string())
            }
            Self::WriteBack(WriteBackError::CreateDir { path, .. }) => Some(format!(
                "Check write permissions for {}",
                path.display()
            )),
            Self::OverwriteNotConfirmed { .. } => Some(
                "Re-run with --yes to confirm, or use --output-dir to keep originals untouched"
                    .to_string(),
            ),
            Self::ConfigInvalid { .. } => Some(
                "Fix .code-slim.toml or run 'code-slim init' to regenerate defaults".to_string(),
            ),
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
        }
    }

    /// Get appropriate exit code for this error.
    ///
    /// Returns Unix-style exit codes following sysexits.h conventions.
    ///
    /// # Examples
    ///
    /// ```
    /// use code_slim::error::CodeSlimError;
    ///
    /// let error = CodeSlimError::ConfigInvalid {
    ///     reason: "bad".to_string(),
    /// };
    /// assert_eq!(error.exit_code(), 78); // EX_CONFIG
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Discovery { .. } => 66,             // EX_NOINPUT
            Self::Analysis(_) => 69,                  // EX_UNAVAILABLE
            Self::WriteBack(_) => 74,                 // EX_IOERR
            Self::OverwriteNotConfirmed { .. } => 64, // EX_USAGE
            Self::ConfigInvalid { .. } => 78,         // EX_CONFIG
            Self::Io { .. } => 74,                    // EX_IOERR
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with suggestions
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(cs_error) = error.downcast_ref::<CodeSlimError>() {
            if let Some(suggestion) = cs_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        if let Some(cs_error) = error.downcast_ref::<CodeSlimError>() {
            cs_error.exit_code()
        } else {
            1
        }
    }
}
