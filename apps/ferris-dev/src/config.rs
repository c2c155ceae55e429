//! Configuration discovery and effective settings resolution.
//!
//! ferris-dev reads `ferris-dev.toml|yaml|yml` from the repository root (or
//! closest ancestor) and merges it with CLI flags to produce an `Effective`
//! config.
//! Defaults:
//! - `output`: `human`
//! - `coverage.tool`: `llvm-cov`, `coverage.output_dir`: `target/coverage`,
//!   `coverage.auto_install`: true
//! - `docs.patterns`: `["**/*.md"]`, `docs.ignore`: node_modules/target (any
//!   depth) and .git,
//!   `docs.link_check`: true
//! - `hooks.pre_commit|pre_push`: true
//! - `labels.items`: the built-in set
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::error::{Error, Result};
use crate::models::label::{default_labels, Label};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_NAMES: [&str; 3] = ["ferris-dev.toml", "ferris-dev.yaml", "ferris-dev.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Overrides for one cargo task under `[tasks.<name>]`.
pub struct TaskCfg {
    pub args: Option<Vec<String>>,
    /// Extra environment, e.g. `RUSTFLAGS`
    pub env: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct CoverageCfg {
    pub tool: Option<String>,
    pub output_dir: Option<String>,
    pub auto_install: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct DocsCfg {
    pub patterns: Option<Vec<String>>,
    pub ignore: Option<Vec<String>>,
    /// markdownlint config file passed as `--config`
    pub config: Option<String>,
    pub link_check: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct HooksCfg {
    pub pre_commit: Option<bool>,
    pub pre_push: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct LabelsCfg {
    /// Target repository (`owner/name`); defaults to the current checkout
    pub repo: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<Label>>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct RunTestsCfg {
    /// Program to run directly instead of `cargo run --bin ferris-test`
    pub binary: Option<String>,
    pub release: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `ferris-dev.toml|yaml`.
pub struct DevConfig {
    pub output: Option<String>,
    #[serde(default)]
    pub tasks: HashMap<String, TaskCfg>, // [tasks.lint].args
    pub coverage: Option<CoverageCfg>,
    pub docs: Option<DocsCfg>,
    pub hooks: Option<HooksCfg>,
    pub labels: Option<LabelsCfg>,
    pub run_tests: Option<RunTestsCfg>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoverageTool {
    LlvmCov,
    Tarpaulin,
}

impl CoverageTool {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "llvm-cov" | "llvm" | "cargo-llvm-cov" => Some(CoverageTool::LlvmCov),
            "tarpaulin" | "cargo-tarpaulin" => Some(CoverageTool::Tarpaulin),
            _ => None,
        }
    }

    /// Cargo subcommand name.
    pub fn subcommand(&self) -> &'static str {
        match self {
            CoverageTool::LlvmCov => "llvm-cov",
            CoverageTool::Tarpaulin => "tarpaulin",
        }
    }

    /// Crate installed by `cargo install` when the subcommand is missing.
    pub fn crate_name(&self) -> &'static str {
        match self {
            CoverageTool::LlvmCov => "cargo-llvm-cov",
            CoverageTool::Tarpaulin => "cargo-tarpaulin",
        }
    }
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub config_found: bool,
    pub output: String,
    pub task_args: HashMap<String, Vec<String>>,
    pub task_env: HashMap<String, BTreeMap<String, String>>,
    /// Raw `[coverage].tool`; validated by `coverage_tool()` when used.
    pub coverage_tool_name: Option<String>,
    pub coverage_dir: PathBuf,
    pub coverage_auto_install: bool,
    pub docs_patterns: Vec<String>,
    pub docs_ignore: Vec<String>,
    pub docs_config: Option<String>,
    pub docs_link_check: bool,
    pub hook_pre_commit: bool,
    pub hook_pre_push: bool,
    pub labels_repo: Option<String>,
    /// `[[labels.items]]` or the built-in set, not yet normalized.
    pub label_items: Vec<Label>,
    pub run_tests_binary: Option<String>,
    pub run_tests_release: bool,
}

impl Effective {
    /// Configured args for a cargo task, or the given defaults.
    pub fn task_args_or(&self, task: &str, defaults: &[&str]) -> Vec<String> {
        self.task_args
            .get(task)
            .cloned()
            .unwrap_or_else(|| defaults.iter().map(|s| s.to_string()).collect())
    }

    /// Extra environment for a cargo task, sorted by name.
    pub fn task_env(&self, task: &str) -> Vec<(String, String)> {
        self.task_env
            .get(task)
            .map(|m| m.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    /// Configured coverage backend; `llvm-cov` when unset.
    ///
    /// Checked here rather than at load time so a bad `[coverage]` section
    /// only fails the `coverage` command.
    pub fn coverage_tool(&self) -> Result<CoverageTool> {
        match self.coverage_tool_name.as_deref() {
            Some(t) => CoverageTool::parse(t).ok_or_else(|| {
                Error::Config(format!(
                    "unknown coverage tool '{}' (expected llvm-cov|tarpaulin)",
                    t
                ))
            }),
            None => Ok(CoverageTool::LlvmCov),
        }
    }

    /// Normalized label set; an invalid color is a config error.
    pub fn label_set(&self) -> Result<Vec<Label>> {
        self.label_items
            .iter()
            .cloned()
            .map(|l| l.normalized().map_err(Error::Config))
            .collect()
    }
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `ferris-dev.toml|yaml|yml` or a `.git` entry is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `DevConfig` from `ferris-dev.toml` or `ferris-dev.yaml|yml`.
///
/// `Ok(None)` when no file exists; a file that does not parse is an error.
pub fn load_config(root: &Path) -> Result<Option<DevConfig>> {
    let toml_path = root.join(CONFIG_NAMES[0]);
    if toml_path.exists() {
        let s = fs::read_to_string(&toml_path)?;
        let cfg: DevConfig = toml::from_str(&s)
            .map_err(|e| Error::Config(format!("{}: {}", toml_path.display(), e)))?;
        return Ok(Some(cfg));
    }
    for yml in &CONFIG_NAMES[1..] {
        let p = root.join(yml);
        if p.exists() {
            let s = fs::read_to_string(&p)?;
            let cfg: DevConfig = serde_yaml::from_str(&s)
                .map_err(|e| Error::Config(format!("{}: {}", p.display(), e)))?;
            return Ok(Some(cfg));
        }
    }
    Ok(None)
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
///
/// Returns the resolved settings plus notes for the user (missing or broken
/// config file).
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_output: Option<&str>,
) -> Result<(Effective, Vec<String>)> {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let start = fs::canonicalize(&start).unwrap_or(start);
    let repo_root = detect_repo_root(&start);
    let mut notes = Vec::new();
    let (cfg, config_found) = match load_config(&repo_root) {
        Ok(Some(c)) => (c, true),
        Ok(None) => (DevConfig::default(), false),
        Err(Error::Config(msg)) => {
            notes.push(format!("ignoring unreadable config ({}); using defaults", msg));
            (DevConfig::default(), false)
        }
        Err(e) => return Err(e),
    };

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output.clone())
        .unwrap_or_else(|| "human".to_string());
    if output != "human" && output != "json" {
        return Err(Error::Config(format!(
            "unknown output mode '{}' (expected human|json)",
            output
        )));
    }

    let task_args = cfg
        .tasks
        .iter()
        .filter_map(|(k, v)| v.args.clone().map(|a| (k.clone(), a)))
        .collect::<HashMap<_, _>>();
    let task_env = cfg
        .tasks
        .iter()
        .filter_map(|(k, v)| v.env.clone().map(|e| (k.clone(), e)))
        .collect::<HashMap<_, _>>();

    let cov = cfg.coverage.clone().unwrap_or_default();
    let coverage_dir = repo_root.join(
        cov.output_dir
            .clone()
            .unwrap_or_else(|| "target/coverage".to_string()),
    );

    let docs = cfg.docs.clone().unwrap_or_default();
    let docs_patterns = docs
        .patterns
        .clone()
        .unwrap_or_else(|| vec!["**/*.md".to_string()]);
    let docs_ignore = docs.ignore.clone().unwrap_or_else(|| {
        vec![
            "**/node_modules/**".to_string(),
            "**/target/**".to_string(),
            ".git/**".to_string(),
        ]
    });

    let hooks = cfg.hooks.clone().unwrap_or_default();
    let labels_cfg = cfg.labels.clone().unwrap_or_default();
    let label_items = labels_cfg.items.clone().unwrap_or_else(default_labels);

    let rt = cfg.run_tests.clone().unwrap_or_default();

    Ok((
        Effective {
            repo_root,
            config_found,
            output,
            task_args,
            task_env,
            coverage_tool_name: cov.tool.clone(),
            coverage_dir,
            coverage_auto_install: cov.auto_install.unwrap_or(true),
            docs_patterns,
            docs_ignore,
            docs_config: docs.config,
            docs_link_check: docs.link_check.unwrap_or(true),
            hook_pre_commit: hooks.pre_commit.unwrap_or(true),
            hook_pre_push: hooks.pre_push.unwrap_or(true),
            labels_repo: labels_cfg.repo,
            label_items,
            run_tests_binary: rt.binary,
            run_tests_release: rt.release.unwrap_or(false),
        },
        notes,
    ))
}
