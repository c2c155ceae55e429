//! Markdown linting (`lint-docs`) via markdownlint and markdown-link-check.
//!
//! Files come from the configured glob patterns minus ignore patterns. Link
//! checks run per file in parallel; their output is captured and reported in
//! file order.

use crate::config::Effective;
use crate::error::{Error, Result};
use crate::models::TaskReport;
use crate::runner::{probe, Invocation, ToolRunner};
use crate::utils;
use glob::{glob, Pattern};
use rayon::prelude::*;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Clone, Default)]
pub struct DocsOptions {
    /// Pass `--fix` to markdownlint.
    pub fix: bool,
    /// Restrict linting to these files (pre-push); `None` lints everything.
    pub only: Option<Vec<PathBuf>>,
    /// Missing Node.js skips the task instead of failing it.
    pub lenient_node: bool,
}

/// Markdown files under the repo root matching the configured patterns.
///
/// Sorted, deduplicated, ignore patterns applied to root-relative paths.
pub fn discover_docs(eff: &Effective) -> Result<Vec<PathBuf>> {
    let ignore: Vec<Pattern> = eff
        .docs_ignore
        .iter()
        .map(|p| {
            Pattern::new(p)
                .map_err(|e| Error::Config(format!("bad ignore pattern '{}': {}", p, e)))
        })
        .collect::<Result<_>>()?;
    let mut found: BTreeSet<PathBuf> = BTreeSet::new();
    for pat in &eff.docs_patterns {
        let abs = eff.repo_root.join(pat);
        let paths = glob(&abs.to_string_lossy())
            .map_err(|e| Error::Config(format!("bad docs pattern '{}': {}", pat, e)))?;
        for p in paths.flatten() {
            if !p.is_file() {
                continue;
            }
            let rel = utils::rel_to_root(&eff.repo_root, &p);
            if ignore.iter().any(|ig| ig.matches(&rel)) {
                continue;
            }
            found.insert(p);
        }
    }
    Ok(found.into_iter().collect())
}

/// Run markdownlint over the docs, then link-check each file.
pub fn run_lint_docs(
    runner: &dyn ToolRunner,
    eff: &Effective,
    opts: &DocsOptions,
) -> Result<TaskReport> {
    if !probe(runner, "node", &["--version"]) {
        if opts.lenient_node {
            return Ok(TaskReport::skipped(
                "lint-docs",
                "Node.js not found; documentation checks deferred to CI",
            ));
        }
        return Err(Error::ToolMissing(
            "node (Node.js is required for markdownlint and markdown-link-check)".to_string(),
        ));
    }

    let files = match opts.only.as_ref() {
        Some(only) => {
            let mut v: Vec<PathBuf> = only
                .iter()
                .map(|p| eff.repo_root.join(p))
                .filter(|p| p.is_file())
                .collect();
            v.sort();
            v.dedup();
            v
        }
        None => discover_docs(eff)?,
    };
    if files.is_empty() {
        return Ok(TaskReport::skipped("lint-docs", "no markdown files found"));
    }
    let rel: Vec<String> = files
        .iter()
        .map(|p| utils::rel_to_root(&eff.repo_root, p))
        .collect();

    let mut report = TaskReport::new("lint-docs");
    let mut lint = Invocation::new(utils::npx_program()).args(["--yes", "markdownlint-cli"]);
    if opts.fix {
        lint = lint.arg("--fix");
    }
    if let Some(cfg) = eff.docs_config.as_ref() {
        lint = lint.args(["--config", cfg.as_str()]);
    }
    let lint = lint.args(rel.iter().cloned()).current_dir(&eff.repo_root);
    let code = runner.status(&lint)?;
    report.push("markdownlint", lint.display(), code);

    if eff.docs_link_check {
        let checks: Vec<(String, Invocation)> = rel
            .iter()
            .map(|f| {
                let inv = Invocation::new(utils::npx_program())
                    .args(["--yes", "markdown-link-check", "--quiet", f.as_str()])
                    .current_dir(&eff.repo_root);
                (f.clone(), inv)
            })
            .collect();
        // par_iter over an indexed Vec preserves order in collect
        let results: Vec<Result<(String, String, i32, String)>> = checks
            .par_iter()
            .map(|(f, inv)| {
                let c = runner.output(inv)?;
                let mut text = c.stdout;
                text.push_str(&c.stderr);
                Ok((f.clone(), inv.display(), c.code, text))
            })
            .collect();
        for r in results {
            let (file, cmd, code, text) = r?;
            report.push_captured(&format!("link-check {}", file), cmd, code, text);
        }
    }

    if !report.success() {
        report.exit_code = 1;
    }
    Ok(report)
}
