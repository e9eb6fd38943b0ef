//! Advisory probe orchestration.
//!
//! Probes run concurrently on scoped threads after the structural pass. They
//! only ever add warnings or skipped entries to the report.

use std::thread;

use url::Url;

use crate::adapters::docker_command::BUILD_PROBE;
use crate::adapters::doctl_command::{REGISTRY_LISTING_PROBE, REGISTRY_REACHABILITY_PROBE};
use crate::domain::{
    AppError, ProbeLimits, ProbeOutcome, ProbeStatus, ValidationReport, codes,
};
use crate::ports::{BuildPort, BuildTarget, EndpointPort, RegistryPort};

/// External collaborators the probes talk to.
pub struct ProbePorts<'a> {
    pub build: &'a (dyn BuildPort + Sync),
    pub registry: &'a (dyn RegistryPort + Sync),
    pub endpoint: &'a (dyn EndpointPort + Sync),
}

/// Which probes to run and against what.
#[derive(Debug, Clone, Default)]
pub struct ProbePlan {
    pub build: Option<BuildTarget>,
    pub registry: bool,
    pub expected_repositories: Vec<String>,
    pub endpoints: Vec<(String, Url)>,
}

impl ProbePlan {
    pub fn is_empty(&self) -> bool {
        self.build.is_none() && !self.registry && self.endpoints.is_empty()
    }
}

pub fn endpoint_probe_name(key: &str) -> String {
    format!("endpoint:{}", key)
}

/// Run every planned probe and return outcomes in plan order.
pub fn run_probes(ports: &ProbePorts<'_>, plan: &ProbePlan, limits: &ProbeLimits) -> Vec<ProbeOutcome> {
    thread::scope(|scope| {
        let mut handles = Vec::new();

        if let Some(target) = &plan.build {
            handles.push((
                BUILD_PROBE.to_string(),
                scope.spawn(move || ports.build.validate_build(target, limits)),
            ));
        }
        if plan.registry {
            handles.push((
                REGISTRY_REACHABILITY_PROBE.to_string(),
                scope.spawn(move || ports.registry.check_reachable(limits)),
            ));
            let expected = &plan.expected_repositories;
            handles.push((
                REGISTRY_LISTING_PROBE.to_string(),
                scope.spawn(move || ports.registry.list_repositories(expected, limits)),
            ));
        }
        for (key, url) in &plan.endpoints {
            let name = endpoint_probe_name(key);
            let probe_name = name.clone();
            handles.push((name, scope.spawn(move || ports.endpoint.check(&probe_name, url, limits))));
        }

        handles
            .into_iter()
            .map(|(name, handle)| match handle.join() {
                Ok(result) => settle(&name, result, limits),
                Err(_) => ProbeOutcome::failed(name, "probe panicked"),
            })
            .collect()
    })
}

fn settle(name: &str, result: Result<ProbeOutcome, AppError>, limits: &ProbeLimits) -> ProbeOutcome {
    match result {
        Ok(outcome) => outcome,
        Err(_) if limits.cancel.is_cancelled() => ProbeOutcome::unavailable(name, "cancelled"),
        Err(err) => ProbeOutcome::failed(name, err.to_string()),
    }
}

/// Failed probes become warnings; every outcome is recorded for the report.
pub fn apply_outcomes(report: &mut ValidationReport, outcomes: Vec<ProbeOutcome>) {
    for outcome in outcomes {
        match outcome.status {
            ProbeStatus::Failed => report.push_warning(
                codes::PROBE_FAILED,
                format!("probes.{}", outcome.name),
                format!("{} probe failed: {}", outcome.name, outcome.detail),
            ),
            ProbeStatus::Unavailable => {
                tracing::info!(probe = %outcome.name, detail = %outcome.detail, "probe skipped");
            }
            ProbeStatus::Ok => {}
        }
        report.record_probe(outcome);
    }
}
