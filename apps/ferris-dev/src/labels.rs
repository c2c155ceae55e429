//! Idempotent GitHub label creation through the `gh` CLI.
//!
//! A label that already exists counts as success, so the command can be
//! re-run freely. Only a missing or unauthenticated `gh` fails the run.

use crate::error::{Error, Result};
use crate::models::label::{Label, LabelOutcome, LabelStatus};
use crate::runner::{probe, Invocation, ToolRunner};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

fn already_exists(stderr: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)already\s+exists").expect("static regex"))
        .is_match(stderr)
}

/// The `gh label create` invocation for one label.
pub fn create_invocation(label: &Label, repo: Option<&str>, cwd: &Path) -> Invocation {
    let mut inv = Invocation::new("gh")
        .args(["label", "create", label.name.as_str()])
        .args(["--color", label.color.as_str()])
        .args(["--description", label.description.as_str()]);
    if let Some(r) = repo {
        inv = inv.args(["--repo", r]);
    }
    inv.current_dir(cwd)
}

/// Check `gh` is installed and logged in.
pub fn check_gh(runner: &dyn ToolRunner) -> Result<()> {
    if !probe(runner, "gh", &["--version"]) {
        return Err(Error::ToolMissing(
            "gh (install GitHub CLI from https://cli.github.com/)".to_string(),
        ));
    }
    if !probe(runner, "gh", &["auth", "status"]) {
        return Err(Error::Custom(
            "GitHub CLI is not authenticated; run `gh auth login`".to_string(),
        ));
    }
    Ok(())
}

/// Create each label, one `gh` call per label, in order.
pub fn create_labels(
    runner: &dyn ToolRunner,
    labels: &[Label],
    repo: Option<&str>,
    cwd: &Path,
) -> Result<Vec<LabelOutcome>> {
    check_gh(runner)?;
    let mut out = Vec::with_capacity(labels.len());
    for label in labels {
        let inv = create_invocation(label, repo, cwd);
        let c = runner.output(&inv)?;
        let status = if c.success() {
            LabelStatus::Created
        } else if already_exists(&c.stderr) || already_exists(&c.stdout) {
            LabelStatus::Exists
        } else {
            let msg = c.stderr.trim();
            LabelStatus::Failed(if msg.is_empty() {
                format!("gh exited with code {}", c.code)
            } else {
                msg.to_string()
            })
        };
        tracing::debug!(label = %label.name, ?status, "label");
        out.push(LabelOutcome {
            name: label.name.clone(),
            status,
        });
    }
    Ok(out)
}
