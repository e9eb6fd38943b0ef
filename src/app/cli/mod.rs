//! CLI Adapter.

mod interrupt;
mod validate;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::domain::AppError;

/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "PREFLIGHT_LOG";

/// Exit code for unreadable or unparseable input.
const EXIT_INPUT_ERROR: i32 = 2;

#[derive(Parser)]
#[command(name = "preflight")]
#[command(version)]
#[command(
    about = "Validate deployment app specs before shipping",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate an app spec and report every finding
    #[clap(visible_alias = "v")]
    Validate(validate::ValidateArgs),
}

/// Entry point for the CLI.
pub fn run() {
    init_tracing();
    let cli = Cli::parse();

    let result: Result<i32, AppError> = match cli.command {
        Commands::Validate(args) => validate::run_validate(args),
    };

    match result {
        Ok(exit_code) => {
            if exit_code != 0 {
                std::process::exit(exit_code);
            }
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(EXIT_INPUT_ERROR);
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .try_init();
}
