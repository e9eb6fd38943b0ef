pub mod app_spec;
pub mod error;
pub mod finding;
pub mod probe;
pub mod settings;

pub use app_spec::{AppSpec, EnvKind, EnvValue, EnvVar, ImageRef, ServiceSpec};
pub use error::AppError;
pub use finding::{Finding, Severity, ValidationReport, Verdict, codes};
pub use probe::{CancelToken, ProbeLimits, ProbeOutcome, ProbeStatus};
pub use settings::Settings;
