//! Structural and semantic checks over a parsed app spec.
//!
//! Every check runs on every invocation; none of them short-circuits another.
//! Findings are pushed in check order, then service order, then env order.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use url::Url;

use crate::domain::{AppSpec, EnvKind, ValidationReport, codes};

type Check = fn(&AppSpec, &mut ValidationReport);

const CHECKS: &[Check] = &[
    check_services_present,
    check_image_present,
    check_image_fields,
    check_envs_declared,
    check_secret_kind,
    check_unique_env_keys,
    check_service_names,
    check_unique_service_names,
    check_env_keys_present,
    check_url_values,
];

pub fn validate_spec(spec: &AppSpec) -> ValidationReport {
    let mut report = ValidationReport::default();
    for check in CHECKS {
        check(spec, &mut report);
    }
    tracing::debug!(
        errors = report.errors().len(),
        warnings = report.warnings().len(),
        "structural validation finished"
    );
    report
}

fn check_services_present(spec: &AppSpec, report: &mut ValidationReport) {
    if spec.services.is_empty() {
        report.push_fatal(codes::NO_SERVICES, "services", "no services are declared");
    }
}

fn check_image_present(spec: &AppSpec, report: &mut ValidationReport) {
    for (i, service) in spec.services.iter().enumerate() {
        if service.image.is_none() {
            report.push_fatal(
                codes::MISSING_IMAGE,
                format!("services[{}].image", i),
                format!("service '{}' has no image", service.name),
            );
        }
    }
}

fn check_image_fields(spec: &AppSpec, report: &mut ValidationReport) {
    for (i, service) in spec.services.iter().enumerate() {
        let Some(image) = &service.image else { continue };
        if image.repository.trim().is_empty() {
            report.push_fatal(
                codes::EMPTY_IMAGE_REPOSITORY,
                format!("services[{}].image.repository", i),
                "image repository is required",
            );
        }
        if image.tag.trim().is_empty() {
            report.push_fatal(
                codes::EMPTY_IMAGE_TAG,
                format!("services[{}].image.tag", i),
                "image tag is required",
            );
        }
    }
}

fn check_envs_declared(spec: &AppSpec, report: &mut ValidationReport) {
    for (i, service) in spec.services.iter().enumerate() {
        if service.envs.is_empty() {
            report.push_warning(
                codes::NO_ENVS,
                format!("services[{}].envs", i),
                format!("service '{}' declares no environment variables", service.name),
            );
        }
    }
}

fn check_secret_kind(spec: &AppSpec, report: &mut ValidationReport) {
    for (i, service) in spec.services.iter().enumerate() {
        for (j, env) in service.envs.iter().enumerate() {
            if env.kind != EnvKind::Secret {
                continue;
            }
            let message = if env.literal().is_some_and(|value| !value.is_empty()) {
                format!(
                    "env var '{}' declares type SECRET with an inline value; this can break the platform's secret injection",
                    env.key
                )
            } else {
                format!(
                    "env var '{}' declares type SECRET inline; this can break the platform's secret injection",
                    env.key
                )
            };
            report.push_warning(
                codes::SECRET_TYPE_INLINE,
                format!("services[{}].envs[{}].type", i, j),
                message,
            );
        }
    }
}

fn check_unique_env_keys(spec: &AppSpec, report: &mut ValidationReport) {
    for (i, service) in spec.services.iter().enumerate() {
        let mut seen = HashSet::new();
        let mut reported = HashSet::new();
        for (j, env) in service.envs.iter().enumerate() {
            if env.key.trim().is_empty() {
                continue;
            }
            if !seen.insert(env.key.as_str()) && reported.insert(env.key.as_str()) {
                report.push_fatal(
                    codes::DUPLICATE_ENV_KEY,
                    format!("services[{}].envs[{}].key", i, j),
                    format!("env key '{}' is declared more than once", env.key),
                );
            }
        }
    }
}

fn check_service_names(spec: &AppSpec, report: &mut ValidationReport) {
    for (i, service) in spec.services.iter().enumerate() {
        if service.name.trim().is_empty() {
            report.push_fatal(
                codes::EMPTY_SERVICE_NAME,
                format!("services[{}].name", i),
                "service name is required",
            );
        }
    }
}

fn check_unique_service_names(spec: &AppSpec, report: &mut ValidationReport) {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    for (i, service) in spec.services.iter().enumerate() {
        if service.name.trim().is_empty() {
            continue;
        }
        if !seen.insert(service.name.as_str()) && reported.insert(service.name.as_str()) {
            report.push_fatal(
                codes::DUPLICATE_SERVICE_NAME,
                format!("services[{}].name", i),
                format!("service name '{}' is declared more than once", service.name),
            );
        }
    }
}

fn check_env_keys_present(spec: &AppSpec, report: &mut ValidationReport) {
    for (i, service) in spec.services.iter().enumerate() {
        for (j, env) in service.envs.iter().enumerate() {
            if env.key.trim().is_empty() {
                report.push_fatal(
                    codes::EMPTY_ENV_KEY,
                    format!("services[{}].envs[{}].key", i, j),
                    "env key is required",
                );
            }
        }
    }
}

fn check_url_values(spec: &AppSpec, report: &mut ValidationReport) {
    for (i, service) in spec.services.iter().enumerate() {
        for (j, env) in service.envs.iter().enumerate() {
            let Some(value) = env.literal() else { continue };
            if let Some(problem) = url_problem(&env.key, value) {
                report.push_warning(
                    codes::INVALID_URL,
                    format!("services[{}].envs[{}].value", i, j),
                    format!("env var '{}' {}", env.key, problem),
                );
            }
        }
    }
}

/// Keys ending in `_URL` must be http(s) URLs; keys ending in `_URI` any absolute URI with a host.
fn url_problem(key: &str, value: &str) -> Option<&'static str> {
    let web = key.ends_with("_URL");
    if !web && !key.ends_with("_URI") {
        return None;
    }
    let value = value.trim();
    if value.is_empty() || value.contains("${") {
        return None;
    }
    match Url::parse(value) {
        Ok(url) if url.host_str().is_none_or(str::is_empty) => Some("is not a URL with a host"),
        Ok(url) if web && !matches!(url.scheme(), "http" | "https") => {
            Some("must use the http or https scheme")
        }
        Ok(_) => None,
        Err(_) => Some("is not a valid URL"),
    }
}

/// Literal http(s) URLs declared under `_URL` keys, in service and env order.
pub fn endpoint_urls(spec: &AppSpec) -> Vec<(String, Url)> {
    let mut seen = HashSet::new();
    let mut endpoints = Vec::new();
    for service in &spec.services {
        for env in &service.envs {
            if !env.key.ends_with("_URL") || env.kind == EnvKind::Secret {
                continue;
            }
            let Some(value) = env.literal() else { continue };
            if url_problem(&env.key, value).is_some() || value.contains("${") {
                continue;
            }
            if let Ok(url) = Url::parse(value.trim())
                && seen.insert(env.key.clone())
            {
                endpoints.push((env.key.clone(), url));
            }
        }
    }
    endpoints
}

/// Fail loudly when a file the deployment needs is absent.
pub fn check_required_files(required: &[PathBuf], base_dir: &Path, report: &mut ValidationReport) {
    for (k, file) in required.iter().enumerate() {
        let resolved = base_dir.join(file);
        if !resolved.exists() {
            report.push_fatal(
                codes::REQUIRED_FILE_MISSING,
                format!("files[{}]", k),
                format!("required file '{}' is missing", file.display()),
            );
        }
    }
}
