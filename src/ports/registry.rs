use crate::domain::{AppError, ProbeLimits, ProbeOutcome};

pub trait RegistryPort {
    /// Check that the container registry answers at all.
    fn check_reachable(&self, limits: &ProbeLimits) -> Result<ProbeOutcome, AppError>;

    /// List repositories and confirm each expected repository name is present.
    fn list_repositories(
        &self,
        expected: &[String],
        limits: &ProbeLimits,
    ) -> Result<ProbeOutcome, AppError>;
}
