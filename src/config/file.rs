//! Configuration file data structures

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".code-slim.toml";

/// code-slim configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Analysis service settings
    #[serde(default)]
    pub analysis: AnalysisSettings,

    /// Batch pacing and discovery settings
    #[serde(default)]
    pub batch: BatchSettings,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            analysis: AnalysisSettings::default(),
            batch: BatchSettings::default(),
        }
    }
}

impl ConfigFile {
    /// Validate cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.analysis.timeout_secs == 0 {
            anyhow::bail!("analysis.timeout-secs must be greater than zero");
        }
        if self.batch.delay_ms > 60_000 {
            anyhow::bail!(
                "batch.delay-ms ({}) exceeds the 60000 ms ceiling",
                self.batch.delay_ms
            );
        }
        if self.batch.extensions.is_empty() {
            anyhow::bail!("batch.extensions must list at least one file extension");
        }
        Ok(())
    }
}

/// Remote analysis service settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisSettings {
    /// Model identifier sent to the service
    #[serde(default = "default_model")]
    pub model: String,

    /// Chat-completions endpoint URL
    #[serde(rename = "api-url", default = "default_api_url")]
    pub api_url: String,

    /// API key; falls back to the OPENAI_API_KEY environment variable
    #[serde(rename = "api-key", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Per-request timeout in seconds
    #[serde(rename = "timeout-secs", default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_url: default_api_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Batch pacing and discovery settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchSettings {
    /// Fixed pacing delay between analysis calls, in milliseconds.
    /// Applied unconditionally, including after failed calls.
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// File extensions to analyze (without the dot)
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Directory names skipped during discovery
    #[serde(rename = "skip-dirs", default = "default_skip_dirs")]
    pub skip_dirs: Vec<String>,

    /// Files above this size are skipped
    #[serde(rename = "max-file-kb", default = "default_max_file_kb")]
    pub max_file_kb: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            delay_ms: default_delay_ms(),
            extensions: default_extensions(),
            skip_dirs: default_skip_dirs(),
            max_file_kb: default_max_file_kb(),
        }
    }
}

fn default_model() -> String {
    "gpt-3.5-turbo".to_string()
}

fn default_api_url() -> String {
    "https://api.openai.com/v1/chat/completions".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_delay_ms() -> u64 {
    500
}

fn default_extensions() -> Vec<String> {
    vec!["cs".to_string()]
}

fn default_skip_dirs() -> Vec<String> {
    vec![
        "target".to_string(),
        "bin".to_string(),
        "obj".to_string(),
        ".git".to_string(),
        "node_modules".to_string(),
    ]
}

fn default_max_file_kb() -> u64 {
    512
}
