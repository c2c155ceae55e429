//! Cargo wrappers: `lint`, `test`, `bench`, `fmt`.
//!
//! Each task is exactly one `cargo` invocation in the repository root. The
//! task's exit code is the cargo exit code.

use crate::config::Effective;
use crate::error::Result;
use crate::models::TaskReport;
use crate::runner::{Invocation, ToolRunner};

pub const LINT_DEFAULT: &[&str] = &[
    "clippy",
    "--workspace",
    "--all-targets",
    "--all-features",
    "--",
    "-D",
    "warnings",
];
pub const TEST_DEFAULT: &[&str] = &["test", "--workspace"];
pub const BENCH_DEFAULT: &[&str] = &["bench"];
pub const FMT_DEFAULT: &[&str] = &["fmt", "--all"];

/// Build the cargo invocation for `task`: configured args (or defaults)
/// followed by `extra`, with the task's configured environment.
pub fn cargo_invocation(
    eff: &Effective,
    task: &str,
    defaults: &[&str],
    extra: &[String],
) -> Invocation {
    Invocation::new("cargo")
        .args(eff.task_args_or(task, defaults))
        .args(extra.iter().cloned())
        .envs(eff.task_env(task))
        .current_dir(&eff.repo_root)
}

fn run_cargo(
    runner: &dyn ToolRunner,
    eff: &Effective,
    task: &str,
    defaults: &[&str],
    extra: &[String],
) -> Result<TaskReport> {
    let inv = cargo_invocation(eff, task, defaults, extra);
    let code = runner.status(&inv)?;
    let mut report = TaskReport::new(task);
    report.push(task, inv.display(), code);
    Ok(report)
}

/// `cargo clippy` across the workspace, warnings denied.
pub fn run_lint(runner: &dyn ToolRunner, eff: &Effective) -> Result<TaskReport> {
    run_cargo(runner, eff, "lint", LINT_DEFAULT, &[])
}

pub fn run_test(runner: &dyn ToolRunner, eff: &Effective, extra: &[String]) -> Result<TaskReport> {
    run_cargo(runner, eff, "test", TEST_DEFAULT, extra)
}

pub fn run_bench(runner: &dyn ToolRunner, eff: &Effective, extra: &[String]) -> Result<TaskReport> {
    run_cargo(runner, eff, "bench", BENCH_DEFAULT, extra)
}

/// `cargo fmt`; with `check` the files are verified instead of rewritten.
pub fn run_fmt(runner: &dyn ToolRunner, eff: &Effective, check: bool) -> Result<TaskReport> {
    let extra: Vec<String> = if check {
        vec!["--".into(), "--check".into()]
    } else {
        Vec::new()
    };
    run_cargo(runner, eff, "fmt", FMT_DEFAULT, &extra)
}
