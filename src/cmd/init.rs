//! Init command implementation
//!
//! Handles the `code-slim init` command which writes a default
//! `.code-slim.toml` configuration file into the current directory.

use anyhow::Result;
use console::style;
use std::env;

use crate::config::{ConfigFile, ConfigLoader, CONFIG_FILE_NAME};
use crate::fmt::{CHECKMARK, ROCKET, WARNING};

/// Initialize code-slim configuration with defaults
///
/// # Examples
///
/// ```no_run
/// use code_slim::cmd::init::cmd_init;
///
/// cmd_init()?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_init() -> Result<()> {
    println!(
        "{} {} Initializing code-slim",
        ROCKET,
        style("code-slim init").bold()
    );
    println!();

    let project_root = env::current_dir()?;

    if ConfigLoader::exists(&project_root) {
        println!(
            "{} Config file already exists: {}",
            WARNING,
            style(CONFIG_FILE_NAME).cyan()
        );
        println!("   Delete it first or edit manually to update.");
        return Ok(());
    }

    let config = ConfigFile::default();
    ConfigLoader::save(&config, &project_root)?;

    println!(
        "{} Created {}",
        CHECKMARK,
        style(CONFIG_FILE_NAME).cyan().bold()
    );
    println!();
    println!("{}  Next Steps:", style("💡").bold());
    println!("   1. Set your API key: export OPENAI_API_KEY=sk-...");
    println!(
        "      (or add analysis.api-key to {})",
        CONFIG_FILE_NAME
    );
    println!(
        "   2. Run {} to analyze a directory",
        style("code-slim run <path>").cyan()
    );
    println!(
        "   3. Add {} for an HTML report",
        style("--report report.html").cyan()
    );

    Ok(())
}
