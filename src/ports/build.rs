use std::path::PathBuf;

use crate::domain::{AppError, ProbeLimits, ProbeOutcome};

/// What a build-only validation pass should look at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTarget {
    pub context: PathBuf,
    pub dockerfile: PathBuf,
}

pub trait BuildPort {
    /// Validate the build definition without producing an image.
    fn validate_build(
        &self,
        target: &BuildTarget,
        limits: &ProbeLimits,
    ) -> Result<ProbeOutcome, AppError>;
}
