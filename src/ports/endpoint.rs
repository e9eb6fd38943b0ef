use url::Url;

use crate::domain::{AppError, ProbeLimits, ProbeOutcome};

pub trait EndpointPort {
    /// Check that an HTTP endpoint answers. `name` labels the outcome.
    fn check(&self, name: &str, url: &Url, limits: &ProbeLimits)
    -> Result<ProbeOutcome, AppError>;
}
