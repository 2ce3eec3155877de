use clap::{Parser, Subcommand};
use clap_complete::Shell;
use code_slim::cmd;
use std::path::PathBuf;
use std::process;

/// AI-assisted memory optimizer for source trees
///
/// code-slim walks a directory of source files, sends each file to an
/// analysis service for memory-optimization suggestions, and writes the
/// optimized versions back with backups.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a directory and write back optimized files
    Run {
        /// Directory to analyze
        path: String,

        /// Write optimized copies into this directory instead of overwriting
        #[arg(short, long, conflicts_with = "overwrite")]
        output_dir: Option<PathBuf>,

        /// Overwrite originals in place (backup first, requires --yes)
        #[arg(long)]
        overwrite: bool,

        /// Confirm overwriting originals
        #[arg(short, long)]
        yes: bool,

        /// Write an HTML report to this path
        #[arg(long)]
        report: Option<PathBuf>,

        /// Output the batch result as JSON (for CI/CD integration)
        #[arg(long)]
        json: bool,

        /// Pause between analysis calls in milliseconds
        #[arg(long)]
        delay_ms: Option<u64>,
    },

    /// Initialize code-slim configuration
    Init,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    // Initialize logger (use RUST_LOG env var to control verbosity)
    env_logger::init();

    let cli = Cli::parse();

    let result = match &cli.command {
        Some(Commands::Run {
            path,
            output_dir,
            overwrite,
            yes,
            report,
            json,
            delay_ms,
        }) => {
            let options = cmd::RunOptions {
                output_dir: output_dir.clone(),
                overwrite: *overwrite,
                yes: *yes,
                report: report.clone(),
                json: *json,
                delay_ms: *delay_ms,
            };
            cmd::cmd_run(path, &options)
        }
        Some(Commands::Init) => cmd::cmd_init(),
        Some(Commands::Completions { shell }) => {
            cmd::cmd_completions(*shell);
            Ok(())
        }
        None => {
            // No subcommand provided, show help
            println!("code-slim v{}", env!("CARGO_PKG_VERSION"));
            println!("AI-assisted memory optimizer for source trees\n");
            println!("Usage: code-slim <COMMAND>\n");
            println!("Commands:");
            println!("  run          Analyze a directory and write back optimized files");
            println!("  init         Initialize code-slim configuration");
            println!("  completions  Generate shell completions");
            println!("\nRun 'code-slim <COMMAND> --help' for more information on a command.");
            Ok(())
        }
    };

    if let Err(e) = result {
        use code_slim::error::ErrorFormatter;
        eprintln!("{}", ErrorFormatter::format(&e));
        let exit_code = ErrorFormatter::exit_code(&e);
        process::exit(exit_code);
    }
}
