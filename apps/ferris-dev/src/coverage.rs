//! Coverage reports via `cargo llvm-cov` or `cargo tarpaulin`.
//!
//! The cargo subcommand is installed on demand. Reports land in the
//! configured output directory (HTML and LCOV).

use crate::config::{CoverageTool, Effective};
use crate::error::Result;
use crate::models::TaskReport;
use crate::runner::{probe, Invocation, ToolRunner};
use crate::utils;
use std::fs;

/// Run coverage with `tool` (CLI override) or the configured tool.
///
/// Every failure, including a failed install, yields exit code 1.
pub fn run_coverage(
    runner: &dyn ToolRunner,
    eff: &Effective,
    tool: Option<CoverageTool>,
) -> Result<TaskReport> {
    let tool = match tool {
        Some(t) => t,
        None => eff.coverage_tool()?,
    };
    let mut report = TaskReport::new("coverage");
    let sub = tool.subcommand();

    if !probe(runner, "cargo", &[sub, "--version"]) {
        if !eff.coverage_auto_install {
            report.push("probe", format!("cargo {} --version", sub), 1);
            return Ok(report);
        }
        let install = Invocation::new("cargo")
            .args(["install", tool.crate_name()])
            .current_dir(&eff.repo_root);
        let code = runner.status(&install)?;
        report.push("install", install.display(), code);
        if code != 0 {
            report.exit_code = 1;
            return Ok(report);
        }
    }

    fs::create_dir_all(&eff.coverage_dir)?;
    let dir = eff.coverage_dir.to_string_lossy().to_string();
    let lcov = eff.coverage_dir.join("lcov.info");
    let lcov_str = lcov.to_string_lossy().to_string();

    let steps: Vec<(&str, Invocation)> = match tool {
        CoverageTool::LlvmCov => vec![
            (
                "html",
                Invocation::new("cargo").args([
                    "llvm-cov",
                    "--workspace",
                    "--html",
                    "--output-dir",
                    dir.as_str(),
                ]),
            ),
            (
                "lcov",
                Invocation::new("cargo").args([
                    "llvm-cov",
                    "report",
                    "--lcov",
                    "--output-path",
                    lcov_str.as_str(),
                ]),
            ),
        ],
        CoverageTool::Tarpaulin => vec![(
            "tarpaulin",
            Invocation::new("cargo").args([
                "tarpaulin",
                "--workspace",
                "--out",
                "Html",
                "--out",
                "Lcov",
                "--output-dir",
                dir.as_str(),
            ]),
        )],
    };

    for (name, inv) in steps {
        let inv = inv.current_dir(&eff.repo_root);
        let code = runner.status(&inv)?;
        report.push(name, inv.display(), code);
        if code != 0 {
            report.exit_code = 1;
            return Ok(report);
        }
    }

    let html = match tool {
        CoverageTool::LlvmCov => eff.coverage_dir.join("html").join("index.html"),
        CoverageTool::Tarpaulin => eff.coverage_dir.join("tarpaulin-report.html"),
    };
    report.artifacts = vec![
        utils::rel_to_root(&eff.repo_root, &html),
        utils::rel_to_root(&eff.repo_root, &lcov),
    ];
    Ok(report)
}
