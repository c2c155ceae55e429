//! Output rendering for task, hook, and label commands.
//!
//! Supports `human` (default) and `json` outputs. The JSON form includes
//! per-item fields and a top-level summary.

use crate::models::hook::HookReport;
use crate::models::label::{Label, LabelOutcome, LabelStatus, LabelSummary};
use crate::models::TaskReport;
use crate::utils::use_colors;
use owo_colors::OwoColorize;
use serde_json::json;
use serde_json::Value as JsonVal;

fn print_json(v: &JsonVal) {
    match serde_json::to_string_pretty(v) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("{} {}", crate::utils::error_prefix(), e),
    }
}

/// Print a task report. Streamed tool output has already reached the
/// terminal; this adds the step banners and the final verdict.
pub fn print_task(report: &TaskReport, output: &str) {
    match output {
        "json" => print_json(&compose_task_json(report)),
        _ => {
            let color = use_colors(output);
            if let Some(line) = skipped_banner(report, color) {
                println!("{}", line);
                return;
            }
            for s in &report.steps {
                let (icon, label) = if s.success() {
                    ("✔", "ok".to_string())
                } else {
                    ("✖", format!("exit {}", s.exit_code))
                };
                if color {
                    let icon = if s.success() {
                        icon.green().to_string()
                    } else {
                        icon.red().to_string()
                    };
                    println!(
                        "{} {} ({}) {}",
                        icon,
                        s.name.bold(),
                        label,
                        s.command.bright_black()
                    );
                } else {
                    println!("{} {} ({}) {}", icon, s.name, label, s.command);
                }
                if let Some(out) = s.output.as_ref() {
                    for line in out.lines() {
                        println!("    {}", line);
                    }
                }
            }
            for a in &report.artifacts {
                if color {
                    println!("{} {}", "📄 report:".cyan().bold(), a);
                } else {
                    println!("📄 report: {}", a);
                }
            }
            let verdict = if report.success() {
                format!("— {} passed —", report.task)
            } else {
                format!("— {} failed (exit {}) —", report.task, report.exit_code)
            };
            if !color {
                println!("{}", verdict);
            } else if report.success() {
                println!("{}", verdict.green().bold());
            } else {
                println!("{}", verdict.red().bold());
            }
        }
    }
}

/// `⏭ skipped` line for a skipped report, yellow when colors are on.
pub fn skipped_banner(report: &TaskReport, color: bool) -> Option<String> {
    let reason = report.skipped.as_ref()?;
    let head = format!("⏭ {} skipped:", report.task);
    Some(if color {
        format!("{} {}", head.yellow().bold(), reason)
    } else {
        format!("{} {}", head, reason)
    })
}

/// Print hook install/uninstall actions.
pub fn print_hooks(reports: &[HookReport], output: &str) {
    match output {
        "json" => print_json(&compose_hooks_json(reports)),
        _ => {
            let color = use_colors(output);
            if reports.is_empty() {
                println!("no hooks enabled");
            }
            for r in reports {
                let action = format!("{}:", r.action.as_str());
                if color {
                    println!("🪝 {} {} ({})", action.green().bold(), r.hook.bold(), r.path);
                } else {
                    println!("🪝 {} {} ({})", action, r.hook, r.path);
                }
            }
        }
    }
}

/// Print label creation outcomes and the summary line.
pub fn print_labels(outcomes: &[LabelOutcome], output: &str) {
    match output {
        "json" => print_json(&compose_labels_json(outcomes)),
        _ => {
            let color = use_colors(output);
            for o in outcomes {
                let line = match &o.status {
                    LabelStatus::Created => {
                        if color {
                            format!("{} {}", "✔ created:".green().bold(), o.name)
                        } else {
                            format!("✔ created: {}", o.name)
                        }
                    }
                    LabelStatus::Exists => {
                        if color {
                            format!("{} {}", "• already exists:".bright_black(), o.name)
                        } else {
                            format!("• already exists: {}", o.name)
                        }
                    }
                    LabelStatus::Failed(msg) => {
                        if color {
                            format!("{} {} — {}", "✖ failed:".red().bold(), o.name, msg)
                        } else {
                            format!("✖ failed: {} — {}", o.name, msg)
                        }
                    }
                };
                println!("{}", line);
            }
            let s = LabelSummary::from_outcomes(outcomes);
            let summary = format!(
                "— Summary — created={} existing={} failed={} total={}",
                s.created, s.existing, s.failed, s.total
            );
            if color {
                println!("{}", summary.bold());
            } else {
                println!("{}", summary);
            }
        }
    }
}

/// Print the label set without touching GitHub.
pub fn print_label_set(labels: &[Label], output: &str) {
    match output {
        "json" => print_json(&json!({ "labels": labels, "total": labels.len() })),
        _ => {
            for l in labels {
                println!("#{}  {:<20} {}", l.color, l.name, l.description);
            }
        }
    }
}

/// Compose task JSON object (pure) for testing/snapshot purposes.
pub fn compose_task_json(report: &TaskReport) -> JsonVal {
    let failed = report.steps.iter().filter(|s| !s.success()).count();
    json!({
        "task": report.task,
        "results": report.steps,
        "artifacts": report.artifacts,
        "skipped": report.skipped,
        "summary": {
            "steps": report.steps.len(),
            "failed": failed,
            "exit_code": report.exit_code,
            "success": report.success(),
        }
    })
}

/// Compose hooks JSON object (pure) for testing/snapshot purposes.
pub fn compose_hooks_json(reports: &[HookReport]) -> JsonVal {
    json!({
        "results": reports,
        "summary": { "total": reports.len() }
    })
}

/// Compose labels JSON object (pure) for testing/snapshot purposes.
pub fn compose_labels_json(outcomes: &[LabelOutcome]) -> JsonVal {
    json!({
        "results": outcomes,
        "summary": LabelSummary::from_outcomes(outcomes),
    })
}
