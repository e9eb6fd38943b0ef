//! preflight: validate deployment app specs before shipping.

pub mod adapters;
pub mod app;
pub mod domain;
pub mod ports;

#[cfg(test)]
pub(crate) mod testing;

use std::path::Path;

pub use app::api::{LoadedSettings, STDIN_PATH, ValidateOptions, load_settings};
pub use domain::{
    AppError, AppSpec, CancelToken, EnvKind, EnvValue, EnvVar, Finding, ImageRef, ProbeOutcome,
    ProbeStatus, ServiceSpec, Settings, Severity, ValidationReport, Verdict, codes,
};

/// Parse an app spec document without validating it.
pub fn parse(content: &str) -> Result<AppSpec, AppError> {
    app::api::parse(content)
}

/// Run the structural checks against an already-parsed spec.
pub fn check(spec: &AppSpec) -> ValidationReport {
    app::api::check(spec)
}

/// Validate an app spec file, running whichever probes `options` enables.
pub fn validate_file(path: &Path, options: &ValidateOptions) -> Result<ValidationReport, AppError> {
    app::api::validate_file(path, options)
}

/// Validate app spec text, running whichever probes `options` enables.
pub fn validate_str(content: &str, options: &ValidateOptions) -> Result<ValidationReport, AppError> {
    app::api::validate_str(content, options)
}

/// Like [`validate_str`], but in-flight probes stop (and are skipped) once `cancel` fires.
pub fn validate_str_with_cancel(
    content: &str,
    options: &ValidateOptions,
    cancel: &CancelToken,
) -> Result<ValidationReport, AppError> {
    app::api::validate_str_with_cancel(content, options, cancel)
}

/// Render a report as the human-readable text the CLI prints.
pub fn render_text(report: &ValidationReport) -> String {
    app::commands::validate::render_text(report)
}

/// Render a report as pretty-printed JSON.
pub fn render_json(report: &ValidationReport) -> Result<String, AppError> {
    app::commands::validate::render_json(report)
}
