//! CLI argument parsing via `clap`.

use crate::hooks::HookKind;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "ferris-dev",
    version,
    about = "FerrisScript developer tasks",
    long_about = "ferris-dev — one cross-platform entry point for the FerrisScript workspace chores: lint, test, bench, fmt, coverage, docs linting, git hooks, GitHub labels, and the ferris-test runner.\n\nEvery task forwards the exit code of the tool it wraps.\nConfiguration precedence: CLI > ferris-dev.toml > defaults.",
    after_help = "Examples:\n  ferris-dev lint\n  ferris-dev test -- --nocapture\n  ferris-dev coverage --tool tarpaulin\n  ferris-dev lint-docs --fix\n  ferris-dev hooks install\n  ferris-dev run-tests --script godot_test/scripts/signals.ferris --verbose",
    arg_required_else_help = true
)]
/// Top-level CLI options and subcommands.
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalOpts {
    #[arg(long, global = true, help = "Repository root (default: current dir)")]
    pub repo_root: Option<String>,
    #[arg(long, global = true, help = "Output mode: human|json (default: human)")]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CoverageToolArg {
    LlvmCov,
    Tarpaulin,
}

#[derive(Subcommand)]
/// Supported subcommands, one per developer chore.
pub enum Commands {
    /// Show version
    #[command(about = "Show version", long_about = "Print the current ferris-dev version.")]
    Version,
    /// cargo clippy
    #[command(
        about = "Run clippy across the workspace",
        long_about = "Run `cargo clippy --workspace --all-targets --all-features -- -D warnings` (args configurable under [tasks.lint])."
    )]
    Lint,
    /// cargo test
    #[command(
        about = "Run the workspace tests",
        after_help = "Examples:\n  ferris-dev test\n  ferris-dev test -- -p ferrisscript_compiler"
    )]
    Test {
        #[arg(last = true, help = "Extra arguments appended to cargo test")]
        extra: Vec<String>,
    },
    /// cargo bench
    #[command(about = "Run benchmarks")]
    Bench {
        #[arg(last = true, help = "Extra arguments appended to cargo bench")]
        extra: Vec<String>,
    },
    /// cargo fmt
    #[command(
        about = "Format the workspace",
        long_about = "Run `cargo fmt --all`. With --check, exit non-zero instead of rewriting files."
    )]
    Fmt {
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Verify formatting without writing")]
        check: bool,
    },
    /// Coverage reports
    #[command(
        about = "Generate coverage reports",
        long_about = "Produce HTML and LCOV coverage reports with cargo-llvm-cov or cargo-tarpaulin. The tool is installed with `cargo install` when missing.",
        after_help = "Examples:\n  ferris-dev coverage\n  ferris-dev coverage --tool tarpaulin"
    )]
    Coverage {
        #[arg(long, value_enum, help = "Coverage backend (default: llvm-cov or [coverage].tool)")]
        tool: Option<CoverageToolArg>,
    },
    /// Markdown lint + link check
    #[command(
        about = "Lint Markdown documentation",
        long_about = "Run markdownlint over the documentation and check links with markdown-link-check. Requires Node.js."
    )]
    LintDocs {
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Let markdownlint fix what it can")]
        fix: bool,
    },
    /// Git hooks (install/uninstall/run)
    Hooks {
        #[command(subcommand)]
        cmd: HooksCmd,
    },
    /// GitHub labels
    Labels {
        #[command(subcommand)]
        cmd: LabelsCmd,
    },
    /// ferris-test runner
    #[command(
        about = "Run FerrisScript test scripts",
        long_about = "Invoke the ferris-test binary, forwarding --script/--all/--fast/--verbose/--filter. Exit code mirrors ferris-test.",
        after_help = "Examples:\n  ferris-dev run-tests --all --fast\n  ferris-dev run-tests --script godot_test/scripts/signals.ferris --filter emit"
    )]
    RunTests {
        #[arg(long, conflicts_with = "all", help = "Run a single test script")]
        script: Option<PathBuf>,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Run every test script (default)")]
        all: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Skip slow checks")]
        fast: bool,
        #[arg(long, action = clap::ArgAction::SetTrue, help = "Verbose test output")]
        verbose: bool,
        #[arg(long, help = "Only run tests whose name matches")]
        filter: Option<String>,
    },
}

#[derive(Subcommand)]
/// Subcommands for `ferris-dev hooks`
pub enum HooksCmd {
    #[command(
        about = "Install git hooks",
        long_about = "Write pre-commit and pre-push hooks into .git/hooks. Existing hooks are backed up and restored on uninstall."
    )]
    Install,
    #[command(
        about = "Uninstall git hooks",
        long_about = "Remove hooks installed by ferris-dev and restore any hooks they replaced."
    )]
    Uninstall,
    #[command(
        about = "Run a hook body",
        long_about = "Entry point used by the installed hooks. pre-commit checks formatting and clippy; pre-push lints changed Markdown files."
    )]
    Run {
        #[arg(value_enum)]
        hook: HookKind,
        /// Arguments git hands to the hook (pre-push: remote name and URL)
        #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
        git_args: Vec<String>,
    },
}

#[derive(Subcommand)]
/// Subcommands for `ferris-dev labels`
pub enum LabelsCmd {
    #[command(
        about = "Create repository labels",
        long_about = "Create the configured label set with the GitHub CLI. Labels that already exist are reported and left unchanged."
    )]
    Create {
        #[arg(long, help = "Target repository owner/name (default: current checkout)")]
        repo: Option<String>,
    },
    #[command(about = "Print the label set", long_about = "Print the labels `create` would make.")]
    ListDefaults,
}
