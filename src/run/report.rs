use crate::run::model::{ExecutionResult, RunReport, Verdict};
use std::fmt::Write;

pub fn render_result(result: &ExecutionResult) -> String {
    let label = match result.verdict() {
        Verdict::Passed => "PASS",
        Verdict::Failed => "FAIL",
    };
    let status = result
        .observed_status
        .map(|status| status.to_string())
        .unwrap_or_else(|| "---".to_string());
    let mut line = format!(
        "  {}  {} ({} {}) {} in {}ms",
        label,
        result.case_name,
        result.method,
        result.url,
        status,
        result.duration.as_millis()
    );
    for failure in &result.failures {
        let _ = write!(line, "\n        [{}] {}", failure.kind(), failure);
    }
    line
}

pub fn render_report(report: &RunReport) -> String {
    let mut out = format!("suite {} ({})\n", report.suite, report.base_url);
    for result in &report.results {
        out.push_str(&render_result(result));
        out.push('\n');
    }
    let _ = write!(
        out,
        "  {} passed, {} failed in {}ms",
        report.passed(),
        report.failed(),
        report.duration.as_millis()
    );
    out
}

pub fn render_totals(reports: &[RunReport]) -> String {
    let passed: usize = reports.iter().map(RunReport::passed).sum();
    let failed: usize = reports.iter().map(RunReport::failed).sum();
    format!(
        "{} suite(s), {} case(s): {} passed, {} failed",
        reports.len(),
        passed + failed,
        passed,
        failed
    )
}
