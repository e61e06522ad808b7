//! Human-readable rendering of cycle reports.

use std::fmt::Write;

use autoterm_engine::{ActionStatus, CycleReport, ResourceOutcome};

fn status_label(status: &ActionStatus) -> String {
    match status {
        ActionStatus::Planned => "planned".to_string(),
        ActionStatus::Applied => "applied".to_string(),
        ActionStatus::TargetGroupNotFound => "target group not found".to_string(),
        ActionStatus::Failed(reason) => format!("failed: {reason}"),
        ActionStatus::Skipped => "skipped after earlier failure".to_string(),
    }
}

pub fn format_report(report: &CycleReport) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "Cycle at {} ({} ms)",
        report.evaluated_at.to_rfc3339(),
        report.elapsed_ms
    );
    if let Some(err) = &report.listing_error {
        let _ = writeln!(out, "  listing failed: {err}");
    }
    if report.timed_out {
        let _ = writeln!(out, "  cycle deadline exceeded");
    }

    for resource in &report.resources {
        let label = if resource.name.is_empty() {
            resource.id.clone()
        } else {
            format!("{} ({})", resource.id, resource.name)
        };

        match &resource.outcome {
            ResourceOutcome::Skipped => {
                let _ = writeln!(out, "{label}: no Auto tags");
            }
            ResourceOutcome::DisabledAll => {
                let _ = writeln!(out, "{label}: disabled");
            }
            ResourceOutcome::Failed(reason) => {
                let _ = writeln!(out, "{label}: failed: {reason}");
            }
            ResourceOutcome::Processed(policies) => {
                let _ = writeln!(out, "{label}");
                for policy in policies {
                    if policy.disabled {
                        let _ = writeln!(out, "  policy {}: disabled", policy.index);
                    } else if let Some(err) = &policy.error {
                        let _ = writeln!(out, "  policy {}: error: {err}", policy.index);
                    } else if policy.actions.is_empty() {
                        let _ = writeln!(out, "  policy {}: nothing due", policy.index);
                    }
                    for outcome in &policy.actions {
                        let _ = writeln!(
                            out,
                            "  policy {}: {} [{}]",
                            policy.index,
                            outcome.action,
                            status_label(&outcome.status)
                        );
                    }
                }
            }
        }
    }

    let _ = write!(
        out,
        "{} resources, {} evaluated, {} planned, {} applied, {} failed",
        report.resources.len(),
        report.processed(),
        report.count_status(|s| *s == ActionStatus::Planned),
        report.count_status(|s| *s == ActionStatus::Applied),
        report.count_status(|s| matches!(s, ActionStatus::Failed(_))),
    );
    out
}
