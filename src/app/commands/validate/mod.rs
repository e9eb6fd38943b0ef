//! Validate command: parse, check, probe.

mod checks;
mod parse;
pub mod probes;
mod render;

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::probe::DEFAULT_PROBE_TIMEOUT;
use crate::domain::{AppError, AppSpec, CancelToken, ProbeLimits, Settings, ValidationReport};
use crate::ports::BuildTarget;

pub use checks::validate_spec;
pub use parse::{hash_content, parse_app_spec};
pub use probes::{ProbePlan, ProbePorts};
pub use render::{render_json, render_text, summary_line};

#[derive(Debug, Clone)]
pub struct ValidateOptions {
    pub probe_build: bool,
    pub probe_registry: bool,
    pub probe_endpoints: bool,
    pub timeout: Duration,
    pub build_target: BuildTarget,
    pub build_program: String,
    pub registry_program: String,
    pub required_files: Vec<PathBuf>,
    pub base_dir: PathBuf,
}

impl ValidateOptions {
    /// Options as the settings file describes them, with paths resolved against `base_dir`.
    pub fn from_settings(settings: &Settings, base_dir: &Path) -> Self {
        Self {
            probe_build: settings.probes.build,
            probe_registry: settings.probes.registry,
            probe_endpoints: settings.probes.endpoints,
            timeout: settings.probes.timeout.unwrap_or(DEFAULT_PROBE_TIMEOUT),
            build_target: BuildTarget {
                context: base_dir.join(&settings.build.context),
                dockerfile: base_dir.join(&settings.build.dockerfile),
            },
            build_program: settings.build.program.clone(),
            registry_program: settings.registry.program.clone(),
            required_files: settings.files.required.clone(),
            base_dir: base_dir.to_path_buf(),
        }
    }
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self::from_settings(&Settings::default(), Path::new("."))
    }
}

pub fn execute(
    content: &str,
    options: &ValidateOptions,
    ports: &ProbePorts<'_>,
    cancel: &CancelToken,
) -> Result<ValidationReport, AppError> {
    let spec = parse_app_spec(content)?;

    let mut report = validate_spec(&spec);
    report.set_digest(hash_content(content));
    checks::check_required_files(&options.required_files, &options.base_dir, &mut report);

    let plan = plan_probes(&spec, options);
    if !plan.is_empty() {
        let limits = ProbeLimits::new(options.timeout, cancel.clone());
        let outcomes = probes::run_probes(ports, &plan, &limits);
        probes::apply_outcomes(&mut report, outcomes);
    }

    tracing::info!(
        verdict = ?report.verdict(),
        errors = report.errors().len(),
        warnings = report.warnings().len(),
        "validation finished"
    );
    Ok(report)
}

fn plan_probes(spec: &AppSpec, options: &ValidateOptions) -> ProbePlan {
    let mut expected_repositories: Vec<String> = Vec::new();
    if options.probe_registry {
        for image in spec.services.iter().filter_map(|service| service.image.as_ref()) {
            let name = image.repository_name();
            if !name.is_empty() && !expected_repositories.iter().any(|known| known == name) {
                expected_repositories.push(name.to_string());
            }
        }
    }

    ProbePlan {
        build: options.probe_build.then(|| options.build_target.clone()),
        registry: options.probe_registry,
        expected_repositories,
        endpoints: if options.probe_endpoints { checks::endpoint_urls(spec) } else { Vec::new() },
    }
}
