use crate::domain::{AppError, ValidationReport, Verdict};

/// Human-readable report: findings, probe lines, then the summary line.
pub fn render_text(report: &ValidationReport) -> String {
    let mut lines: Vec<String> = report.findings().map(ToString::to_string).collect();
    for probe in report.probes() {
        lines.push(format!("{} {}: {}", probe.marker(), probe.name, probe.detail));
    }
    lines.push(summary_line(report));

    let mut text = lines.join("\n");
    text.push('\n');
    text
}

pub fn summary_line(report: &ValidationReport) -> String {
    match report.verdict() {
        Verdict::Pass => "PASS".to_string(),
        Verdict::Fail => format!(
            "FAIL ({} errors, {} warnings)",
            report.errors().len(),
            report.warnings().len()
        ),
    }
}

pub fn render_json(report: &ValidationReport) -> Result<String, AppError> {
    let mut json = serde_json::to_string_pretty(report)?;
    json.push('\n');
    Ok(json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ProbeOutcome, codes};

    #[test]
    fn passing_report_is_summary_only() {
        assert_eq!(render_text(&ValidationReport::default()), "PASS\n");
    }

    #[test]
    fn failing_report_lists_errors_then_warnings_then_probes() {
        let mut report = ValidationReport::default();
        report.push_warning(codes::NO_ENVS, "services[0].envs", "service 'web' declares no environment variables");
        report.push_fatal(codes::MISSING_IMAGE, "services[0].image", "service 'web' has no image");
        report.record_probe(ProbeOutcome::unavailable("build", "docker is not installed"));

        let text = render_text(&report);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec![
                "[FATAL] services[0].image: service 'web' has no image (missing-image)",
                "[WARN] services[0].envs: service 'web' declares no environment variables (no-envs)",
                "[SKIP] build: docker is not installed",
                "FAIL (1 errors, 1 warnings)",
            ]
        );
    }

    #[test]
    fn json_report_has_verdict_and_findings() {
        let mut report = ValidationReport::default();
        report.push_fatal(codes::NO_SERVICES, "services", "no services are declared");
        report.set_digest("abc");

        let value: serde_json::Value = serde_json::from_str(&render_json(&report).unwrap()).unwrap();
        assert_eq!(value["verdict"], "FAIL");
        assert_eq!(value["errors"][0]["code"], "no-services");
        assert_eq!(value["errors"][0]["severity"], "FATAL");
        assert_eq!(value["digest"], "abc");
    }
}
