use crate::adapters::process_runner::{ProcessRun, run_with_limits};
use crate::domain::probe::format_duration;
use crate::domain::{AppError, ProbeLimits, ProbeOutcome};
use crate::ports::{BuildPort, BuildTarget};

pub const BUILD_PROBE: &str = "build";

/// Runs `docker build --check`, which evaluates the Dockerfile without building.
#[derive(Debug, Clone)]
pub struct DockerBuildAdapter {
    program: String,
}

impl DockerBuildAdapter {
    pub fn new(program: impl Into<String>) -> Self {
        Self { program: program.into() }
    }
}

impl Default for DockerBuildAdapter {
    fn default() -> Self {
        Self::new("docker")
    }
}

impl BuildPort for DockerBuildAdapter {
    fn validate_build(
        &self,
        target: &BuildTarget,
        limits: &ProbeLimits,
    ) -> Result<ProbeOutcome, AppError> {
        if !target.dockerfile.is_file() {
            return Ok(ProbeOutcome::failed(
                BUILD_PROBE,
                format!("Dockerfile not found at {}", target.dockerfile.display()),
            ));
        }

        let dockerfile = target.dockerfile.to_string_lossy();
        let context = target.context.to_string_lossy();
        let args = ["build", "--check", "-f", dockerfile.as_ref(), context.as_ref()];

        let outcome = match run_with_limits(&self.program, &args, None, limits)? {
            ProcessRun::NotInstalled => {
                ProbeOutcome::unavailable(BUILD_PROBE, format!("{} is not installed", self.program))
            }
            ProcessRun::Cancelled => ProbeOutcome::unavailable(BUILD_PROBE, "cancelled"),
            ProcessRun::TimedOut(after) => ProbeOutcome::failed(
                BUILD_PROBE,
                format!("timed out after {}", format_duration(after)),
            ),
            ProcessRun::Completed(output) if output.success() => {
                ProbeOutcome::ok(BUILD_PROBE, "build checks passed")
            }
            ProcessRun::Completed(output) if daemon_unavailable(&output.stderr) => {
                ProbeOutcome::unavailable(BUILD_PROBE, "docker daemon is not reachable")
            }
            ProcessRun::Completed(output) => ProbeOutcome::failed(BUILD_PROBE, output.summary()),
        };
        Ok(outcome)
    }
}

fn daemon_unavailable(stderr: &str) -> bool {
    stderr.contains("Cannot connect to the Docker daemon")
        || stderr.contains("is the docker daemon running")
        || stderr.contains("docker daemon is not running")
}
