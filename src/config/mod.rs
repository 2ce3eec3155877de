//! Configuration management for code-slim
//!
//! This module provides:
//! - `.code-slim.toml` config file support
//! - Defaults that work without any configuration present

pub mod file;
pub mod loader;

pub use file::{AnalysisSettings, BatchSettings, ConfigFile, CONFIG_FILE_NAME};
pub use loader::ConfigLoader;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_file_name_constant_is_correct() {
        assert_eq!(CONFIG_FILE_NAME, ".code-slim.toml");
    }

    #[test]
    fn test_config_module_exports_are_accessible() {
        let _: Option<ConfigFile> = None;
        let _: Option<AnalysisSettings> = None;
        let _: Option<BatchSettings> = None;
    }
}
