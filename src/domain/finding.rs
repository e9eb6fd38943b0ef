//! Findings and the report that accumulates them.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use super::probe::ProbeOutcome;

/// Stable finding codes.
pub mod codes {
    pub const NO_SERVICES: &str = "no-services";
    pub const MISSING_IMAGE: &str = "missing-image";
    pub const EMPTY_IMAGE_REPOSITORY: &str = "empty-image-repository";
    pub const EMPTY_IMAGE_TAG: &str = "empty-image-tag";
    pub const NO_ENVS: &str = "no-envs";
    pub const SECRET_TYPE_INLINE: &str = "secret-type-inline";
    pub const DUPLICATE_ENV_KEY: &str = "duplicate-env-key";
    pub const EMPTY_SERVICE_NAME: &str = "empty-service-name";
    pub const DUPLICATE_SERVICE_NAME: &str = "duplicate-service-name";
    pub const EMPTY_ENV_KEY: &str = "empty-env-key";
    pub const INVALID_URL: &str = "invalid-url";
    pub const REQUIRED_FILE_MISSING: &str = "required-file-missing";
    pub const PROBE_FAILED: &str = "probe-failed";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Fatal,
    Warn,
}

impl Severity {
    pub fn marker(&self) -> &'static str {
        match self {
            Severity::Fatal => "[FATAL]",
            Severity::Warn => "[WARN]",
        }
    }
}

/// One diagnostic, located by a path into the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub code: String,
    pub message: String,
    pub path: String,
    pub severity: Severity,
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}: {} ({})", self.severity.marker(), self.path, self.message, self.code)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Verdict {
    Pass,
    Fail,
}

/// Outcome of a validation run. Errors decide the verdict; warnings never do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationReport {
    errors: Vec<Finding>,
    warnings: Vec<Finding>,
    probes: Vec<ProbeOutcome>,
    digest: Option<String>,
}

impl ValidationReport {
    pub fn push_fatal(
        &mut self,
        code: &str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.errors.push(Finding {
            code: code.to_string(),
            message: message.into(),
            path: path.into(),
            severity: Severity::Fatal,
        });
    }

    pub fn push_warning(
        &mut self,
        code: &str,
        path: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.warnings.push(Finding {
            code: code.to_string(),
            message: message.into(),
            path: path.into(),
            severity: Severity::Warn,
        });
    }

    pub fn record_probe(&mut self, outcome: ProbeOutcome) {
        self.probes.push(outcome);
    }

    pub fn set_digest(&mut self, digest: impl Into<String>) {
        self.digest = Some(digest.into());
    }

    pub fn errors(&self) -> &[Finding] {
        &self.errors
    }

    pub fn warnings(&self) -> &[Finding] {
        &self.warnings
    }

    pub fn probes(&self) -> &[ProbeOutcome] {
        &self.probes
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn verdict(&self) -> Verdict {
        if self.errors.is_empty() { Verdict::Pass } else { Verdict::Fail }
    }

    pub fn is_pass(&self) -> bool {
        self.verdict() == Verdict::Pass
    }

    /// Errors first, then warnings, each in the order they were pushed.
    pub fn findings(&self) -> impl Iterator<Item = &Finding> {
        self.errors.iter().chain(self.warnings.iter())
    }
}

impl Serialize for ValidationReport {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut fields = 3;
        if !self.probes.is_empty() {
            fields += 1;
        }
        if self.digest.is_some() {
            fields += 1;
        }

        let mut state = serializer.serialize_struct("ValidationReport", fields)?;
        state.serialize_field("verdict", &self.verdict())?;
        state.serialize_field("errors", &self.errors)?;
        state.serialize_field("warnings", &self.warnings)?;
        if !self.probes.is_empty() {
            state.serialize_field("probes", &self.probes)?;
        }
        if let Some(digest) = &self.digest {
            state.serialize_field("digest", digest)?;
        }
        state.end()
    }
}
