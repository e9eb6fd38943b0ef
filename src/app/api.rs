//! API Facade for the application.
//!
//! This module glues the concrete tool adapters to the validate command.

use std::fs;
use std::io::Read;
use std::path::Path;

use crate::adapters::{DockerBuildAdapter, DoctlRegistryAdapter, HttpEndpointAdapter};
use crate::app::commands::validate::{self, ProbePorts};
use crate::domain::{AppError, AppSpec, CancelToken, ValidationReport};

pub use crate::app::commands::validate::ValidateOptions;
pub use crate::app::config::{LoadedSettings, load_settings};

/// Path that selects standard input instead of a file.
pub const STDIN_PATH: &str = "-";

/// Read an app spec document from a file, or from stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String, AppError> {
    if path == Path::new(STDIN_PATH) {
        let mut content = String::new();
        std::io::stdin().read_to_string(&mut content).map_err(|source| AppError::ReadInput {
            path: "<stdin>".to_string(),
            source,
        })?;
        return Ok(content);
    }

    fs::read_to_string(path)
        .map_err(|source| AppError::ReadInput { path: path.display().to_string(), source })
}

/// Parse an app spec without validating it.
pub fn parse(content: &str) -> Result<AppSpec, AppError> {
    validate::parse_app_spec(content)
}

/// Run the structural checks only. Pure: no I/O, no probes.
pub fn check(spec: &AppSpec) -> ValidationReport {
    validate::validate_spec(spec)
}

/// Validate an app spec file.
pub fn validate_file(path: &Path, options: &ValidateOptions) -> Result<ValidationReport, AppError> {
    let content = read_input(path)?;
    validate_str(&content, options)
}

/// Validate app spec text.
pub fn validate_str(content: &str, options: &ValidateOptions) -> Result<ValidationReport, AppError> {
    validate_str_with_cancel(content, options, &CancelToken::new())
}

/// Validate app spec text; cancelling `cancel` aborts in-flight probes, which are then skipped.
pub fn validate_str_with_cancel(
    content: &str,
    options: &ValidateOptions,
    cancel: &CancelToken,
) -> Result<ValidationReport, AppError> {
    let build = DockerBuildAdapter::new(&options.build_program);
    let registry = DoctlRegistryAdapter::new(&options.registry_program);
    let endpoint = HttpEndpointAdapter::new();
    let ports = ProbePorts { build: &build, registry: &registry, endpoint: &endpoint };

    validate::execute(content, options, &ports, cancel)
}
