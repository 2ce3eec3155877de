//! Completions command implementation
//!
//! Handles the `code-slim completions` command which generates
//! shell completion scripts for bash, zsh, fish, etc.

use clap_complete::{generate, Shell};

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
/// Users can redirect this to their shell's completion directory.
///
/// # Examples
///
/// ```bash
/// # Bash
/// code-slim completions bash > /etc/bash_completion.d/code-slim
///
/// # Zsh
/// code-slim completions zsh > ~/.zfunc/_code-slim
///
/// # Fish
/// code-slim completions fish > ~/.config/fish/completions/code-slim.fish
/// ```
pub fn cmd_completions(shell: Shell) {
    // The Cli struct lives in main.rs, so the command tree is re-declared
    // here with clap's builder API
    use clap::{Arg, ArgAction, Command};

    let mut cmd = Command::new("code-slim")
        .version(env!("CARGO_PKG_VERSION"))
        .about("AI-assisted memory optimization for source trees")
        .subcommand(
            Command::new("run")
                .about("Analyze a directory and write back optimized files")
                .arg(Arg::new("path").help("Directory to analyze").required(true))
                .arg(
                    Arg::new("output-dir")
                        .long("output-dir")
                        .short('o')
                        .help("Write optimized copies into this directory"),
                )
                .arg(
                    Arg::new("overwrite")
                        .long("overwrite")
                        .help("Overwrite originals in place (backup first)")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("yes")
                        .long("yes")
                        .short('y')
                        .help("Confirm overwriting originals")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("report")
                        .long("report")
                        .help("Write an HTML report to this path"),
                )
                .arg(
                    Arg::new("json")
                        .long("json")
                        .help("Print the batch result as JSON")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("delay-ms")
                        .long("delay-ms")
                        .help("Pause between analysis calls in milliseconds"),
                ),
        )
        .subcommand(Command::new("init").about("Initialize code-slim configuration"))
        .subcommand(
            Command::new("completions")
                .about("Generate shell completions")
                .arg(Arg::new("shell").help("Shell to generate completions for")),
        );

    generate(shell, &mut cmd, "code-slim", &mut std::io::stdout());
}
