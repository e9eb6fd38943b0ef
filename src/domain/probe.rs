//! Advisory probe outcomes and the limits every probe runs under.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use serde::Serialize;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ProbeStatus {
    #[serde(rename = "OK")]
    Ok,
    /// Tool missing, unreachable, or cancelled. Reported as skipped.
    #[serde(rename = "SKIPPED")]
    Unavailable,
    #[serde(rename = "FAILED")]
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeOutcome {
    pub name: String,
    pub status: ProbeStatus,
    pub detail: String,
}

impl ProbeOutcome {
    pub fn ok(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { name: name.into(), status: ProbeStatus::Ok, detail: detail.into() }
    }

    pub fn unavailable(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { name: name.into(), status: ProbeStatus::Unavailable, detail: detail.into() }
    }

    pub fn failed(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self { name: name.into(), status: ProbeStatus::Failed, detail: detail.into() }
    }

    pub fn marker(&self) -> &'static str {
        match self.status {
            ProbeStatus::Ok => "[OK]",
            ProbeStatus::Unavailable => "[SKIP]",
            ProbeStatus::Failed => "[FAILED]",
        }
    }
}

/// Shared flag that aborts in-flight probes.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Per-probe timeout plus the cancellation flag shared by all probes of a run.
#[derive(Debug, Clone)]
pub struct ProbeLimits {
    pub timeout: Duration,
    pub cancel: CancelToken,
}

impl ProbeLimits {
    pub fn new(timeout: Duration, cancel: CancelToken) -> Self {
        Self { timeout, cancel }
    }
}

impl Default for ProbeLimits {
    fn default() -> Self {
        Self::new(DEFAULT_PROBE_TIMEOUT, CancelToken::new())
    }
}

/// Render a duration the way `--timeout` accepts it.
pub fn format_duration(duration: Duration) -> String {
    let millis = duration.as_millis();
    if millis % 60_000 == 0 && millis > 0 {
        format!("{}m", millis / 60_000)
    } else if millis % 1_000 == 0 {
        format!("{}s", millis / 1_000)
    } else {
        format!("{}ms", millis)
    }
}

/// Parse `500ms`, `20s`, `2m`, or a bare number of seconds.
pub fn parse_duration(input: &str) -> Result<Duration, String> {
    let text = input.trim();
    let (digits, unit) = match text.find(|c: char| !c.is_ascii_digit()) {
        Some(index) => text.split_at(index),
        None => (text, "s"),
    };
    if digits.is_empty() {
        return Err(format!("invalid duration '{}': expected a number", input));
    }
    let amount: u64 =
        digits.parse().map_err(|e| format!("invalid duration '{}': {}", input, e))?;
    let duration = match unit.trim() {
        "ms" => Duration::from_millis(amount),
        "s" | "sec" | "secs" => Duration::from_secs(amount),
        "m" | "min" | "mins" => Duration::from_secs(amount.saturating_mul(60)),
        other => {
            return Err(format!(
                "invalid duration '{}': unknown unit '{}' (use ms, s, or m)",
                input, other
            ));
        }
    };
    if duration.is_zero() {
        return Err(format!("invalid duration '{}': must be greater than zero", input));
    }
    Ok(duration)
}
