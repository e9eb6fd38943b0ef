//! Validate command implementation.

use std::path::PathBuf;
use std::time::Duration;

use clap::Args;

use super::interrupt::cancel_on_interrupt;
use crate::app::api::{self, ValidateOptions};
use crate::app::commands::validate::{render_json, render_text};
use crate::domain::probe::parse_duration;
use crate::domain::{AppError, CancelToken};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the app spec document (use - for stdin)
    pub path: PathBuf,
    /// Run the container build validation probe
    #[arg(long)]
    pub probe_build: bool,
    /// Run the registry reachability and repository listing probes
    #[arg(long)]
    pub probe_registry: bool,
    /// Check that http(s) URLs declared in env vars answer
    #[arg(long)]
    pub probe_endpoints: bool,
    /// Emit the report as JSON
    #[arg(long)]
    pub json: bool,
    /// Per-probe timeout (e.g. 500ms, 20s, 2m)
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
    /// Settings file (defaults to ./preflight.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    /// File that must exist before deploying (repeatable)
    #[arg(long = "require-file", value_name = "PATH")]
    pub require_files: Vec<PathBuf>,
}

pub fn run_validate(args: ValidateArgs) -> Result<i32, AppError> {
    let cwd = std::env::current_dir()?;
    let loaded = api::load_settings(args.config.as_deref(), &cwd)?;

    let mut options = ValidateOptions::from_settings(&loaded.settings, &loaded.base_dir);
    options.probe_build |= args.probe_build;
    options.probe_registry |= args.probe_registry;
    options.probe_endpoints |= args.probe_endpoints;
    if let Some(timeout) = args.timeout {
        options.timeout = timeout;
    }
    options.required_files.extend(args.require_files.iter().map(|file| cwd.join(file)));

    let content = api::read_input(&args.path)?;

    // Installed only once input is read, so Ctrl+C still ends a stalled stdin read.
    let cancel = CancelToken::new();
    if options.probe_build || options.probe_registry || options.probe_endpoints {
        if let Err(err) = cancel_on_interrupt(cancel.clone()) {
            tracing::warn!(error = %err, "could not install Ctrl+C handler");
        }
    }
    let report = api::validate_str_with_cancel(&content, &options, &cancel)?;

    if args.json {
        print!("{}", render_json(&report)?);
    } else {
        print!("{}", render_text(&report));
    }

    Ok(if report.is_pass() { 0 } else { 1 })
}
