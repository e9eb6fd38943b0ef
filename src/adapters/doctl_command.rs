use crate::adapters::process_runner::{ProcessOutput, ProcessRun, run_with_limits};
use crate::domain::probe::format_duration;
use crate::domain::{AppError, ProbeLimits, ProbeOutcome};
use crate::ports::RegistryPort;

pub const REGISTRY_REACHABILITY_PROBE: &str = "registry-reachability";
pub const REGISTRY_LISTING_PROBE: &str = "registry-listing";

/// Registry checks through the DigitalOcean CLI.
#[derive(Debug, Clone)]
pub struct DoctlRegistryAdapter {
    program: String,
}

impl DoctlRegistryAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }

    fn run(
        &self,
        probe: &str,
        args: &[&str],
        limits: &ProbeLimits,
    ) -> Result<Result<ProcessOutput, ProbeOutcome>, AppError> {
        let outcome = match run_with_limits(&self.program, args, None, limits)? {
            ProcessRun::Completed(output) if output.success() => return Ok(Ok(output)),
            ProcessRun::NotInstalled => {
                ProbeOutcome::unavailable(probe, format!("{} is not installed", self.program))
            }
            ProcessRun::Cancelled => ProbeOutcome::unavailable(probe, "cancelled"),
            ProcessRun::TimedOut(after) => {
                ProbeOutcome::failed(probe, format!("timed out after {}", format_duration(after)))
            }
            ProcessRun::Completed(output) if not_authenticated(&output) => {
                ProbeOutcome::unavailable(probe, format!("{} is not authenticated", self.program))
            }
            ProcessRun::Completed(output) => ProbeOutcome::failed(probe, output.summary()),
        };
        Ok(Err(outcome))
    }
}

impl Default for DoctlRegistryAdapter {
    fn default() -> Self {
        Self::new("doctl")
    }
}

impl RegistryPort for DoctlRegistryAdapter {
    fn check_reachable(&self, limits: &ProbeLimits) -> Result<ProbeOutcome, AppError> {
        let args = ["registry", "get", "--format", "Name", "--no-header"];
        Ok(match self.run(REGISTRY_REACHABILITY_PROBE, &args, limits)? {
            Ok(output) => {
                let name = output.stdout.trim();
                if name.is_empty() {
                    ProbeOutcome::ok(REGISTRY_REACHABILITY_PROBE, "registry reachable")
                } else {
                    ProbeOutcome::ok(
                        REGISTRY_REACHABILITY_PROBE,
                        format!("registry '{}' reachable", name),
                    )
                }
            }
            Err(outcome) => outcome,
        })
    }

    fn list_repositories(
        &self,
        expected: &[String],
        limits: &ProbeLimits,
    ) -> Result<ProbeOutcome, AppError> {
        let args = ["registry", "repository", "list-v2", "--format", "Name", "--no-header"];
        Ok(match self.run(REGISTRY_LISTING_PROBE, &args, limits)? {
            Ok(output) => {
                let listed: Vec<&str> =
                    output.stdout.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
                let missing = missing_repositories(&listed, expected);
                if missing.is_empty() {
                    ProbeOutcome::ok(
                        REGISTRY_LISTING_PROBE,
                        format!("{} repositories listed", listed.len()),
                    )
                } else {
                    ProbeOutcome::failed(
                        REGISTRY_LISTING_PROBE,
                        format!("repository not found in registry: {}", missing.join(", ")),
                    )
                }
            }
            Err(outcome) => outcome,
        })
    }
}

fn not_authenticated(output: &ProcessOutput) -> bool {
    let stderr = output.stderr.to_ascii_lowercase();
    stderr.contains("unable to initialize digitalocean api client")
        || stderr.contains("access token")
        || stderr.contains("unauthorized")
}

pub(crate) fn missing_repositories(listed: &[&str], expected: &[String]) -> Vec<String> {
    let mut missing = Vec::new();
    for name in expected {
        if !listed.contains(&name.as_str()) && !missing.contains(name) {
            missing.push(name.clone());
        }
    }
    missing
}
