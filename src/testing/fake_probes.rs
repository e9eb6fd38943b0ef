use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use url::Url;

use crate::adapters::docker_command::BUILD_PROBE;
use crate::adapters::doctl_command::{REGISTRY_LISTING_PROBE, REGISTRY_REACHABILITY_PROBE};
use crate::domain::{AppError, ProbeLimits, ProbeOutcome, ProbeStatus};
use crate::ports::{BuildPort, BuildTarget, EndpointPort, RegistryPort};

#[derive(Clone, Copy)]
enum Behavior {
    Ok,
    Unavailable,
    Failing,
    Erroring,
}

fn outcome_for(behavior: Behavior, name: &str, detail: &str) -> Result<ProbeOutcome, AppError> {
    match behavior {
        Behavior::Ok => Ok(ProbeOutcome::ok(name, "ok")),
        Behavior::Unavailable => Ok(ProbeOutcome::unavailable(name, "tool is not installed")),
        Behavior::Failing => Ok(ProbeOutcome::failed(name, detail)),
        Behavior::Erroring => Err(AppError::Process {
            command: name.to_string(),
            details: "spawn failed".to_string(),
        }),
    }
}

pub struct FakeBuild {
    behavior: Behavior,
    detail: String,
    delay: Duration,
    calls: AtomicUsize,
}

impl FakeBuild {
    fn with(behavior: Behavior, detail: &str) -> Self {
        Self { behavior, detail: detail.to_string(), delay: Duration::ZERO, calls: AtomicUsize::new(0) }
    }

    pub fn ok() -> Self {
        Self::with(Behavior::Ok, "")
    }

    pub fn failing(detail: &str) -> Self {
        Self::with(Behavior::Failing, detail)
    }

    pub fn erroring() -> Self {
        Self::with(Behavior::Erroring, "")
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl BuildPort for FakeBuild {
    fn validate_build(
        &self,
        _target: &BuildTarget,
        _limits: &ProbeLimits,
    ) -> Result<ProbeOutcome, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(self.delay);
        outcome_for(self.behavior, BUILD_PROBE, &self.detail)
    }
}

pub struct FakeRegistry {
    behavior: Behavior,
    expected_seen: Mutex<Vec<String>>,
}

impl FakeRegistry {
    pub fn ok() -> Self {
        Self { behavior: Behavior::Ok, expected_seen: Mutex::new(Vec::new()) }
    }

    pub fn unavailable() -> Self {
        Self { behavior: Behavior::Unavailable, expected_seen: Mutex::new(Vec::new()) }
    }

    pub fn expected_seen(&self) -> Vec<String> {
        self.expected_seen.lock().unwrap().clone()
    }
}

impl RegistryPort for FakeRegistry {
    fn check_reachable(&self, _limits: &ProbeLimits) -> Result<ProbeOutcome, AppError> {
        outcome_for(self.behavior, REGISTRY_REACHABILITY_PROBE, "registry unreachable")
    }

    fn list_repositories(
        &self,
        expected: &[String],
        _limits: &ProbeLimits,
    ) -> Result<ProbeOutcome, AppError> {
        self.expected_seen.lock().unwrap().extend(expected.iter().cloned());
        outcome_for(self.behavior, REGISTRY_LISTING_PROBE, "repository not found")
    }
}

pub struct FakeEndpoint {
    status: ProbeStatus,
    checked: Mutex<Vec<String>>,
}

impl FakeEndpoint {
    pub fn ok() -> Self {
        Self { status: ProbeStatus::Ok, checked: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self { status: ProbeStatus::Failed, checked: Mutex::new(Vec::new()) }
    }

    pub fn checked(&self) -> Vec<String> {
        self.checked.lock().unwrap().clone()
    }
}

impl EndpointPort for FakeEndpoint {
    fn check(
        &self,
        name: &str,
        url: &Url,
        _limits: &ProbeLimits,
    ) -> Result<ProbeOutcome, AppError> {
        self.checked.lock().unwrap().push(url.to_string());
        Ok(ProbeOutcome { name: name.to_string(), status: self.status, detail: "HTTP 200".into() })
    }
}
