//! ferris-dev CLI binary entry point.
//! Delegates to library modules and exits with the wrapped tool's code.

use clap::Parser;
use ferris_dev::cli::{Cli, Commands, CoverageToolArg, HooksCmd, LabelsCmd};
use ferris_dev::config::{self, CoverageTool};
use ferris_dev::docs::DocsOptions;
use ferris_dev::run_tests::RunTestsOptions;
use ferris_dev::runner::SystemRunner;
use ferris_dev::{coverage, docs, hooks, labels, output, run_tests, tasks, utils, Error, Result};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_env("FERRIS_DEV_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    let code = match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            match e {
                Error::Config(_) => 2,
                _ => 1,
            }
        }
    };
    std::process::exit(code);
}

fn run(cli: Cli) -> Result<i32> {
    if let Commands::Version = cli.cmd {
        println!("{}", env!("CARGO_PKG_VERSION"));
        return Ok(0);
    }

    let (eff, notes) = config::resolve_effective(
        cli.global.repo_root.as_deref(),
        cli.global.output.as_deref(),
    )?;
    for n in &notes {
        eprintln!("{} {}", utils::note_prefix(), n);
    }
    if !eff.config_found {
        tracing::debug!(root = %eff.repo_root.display(), "no ferris-dev config; using defaults");
    }
    let runner = SystemRunner::new(&eff.output);
    let out = eff.output.as_str();

    let report = match cli.cmd {
        Commands::Version => return Ok(0),
        Commands::Lint => tasks::run_lint(&runner, &eff)?,
        Commands::Test { extra } => tasks::run_test(&runner, &eff, &extra)?,
        Commands::Bench { extra } => tasks::run_bench(&runner, &eff, &extra)?,
        Commands::Fmt { check } => tasks::run_fmt(&runner, &eff, check)?,
        Commands::Coverage { tool } => {
            let tool = tool.map(|t| match t {
                CoverageToolArg::LlvmCov => CoverageTool::LlvmCov,
                CoverageToolArg::Tarpaulin => CoverageTool::Tarpaulin,
            });
            coverage::run_coverage(&runner, &eff, tool)?
        }
        Commands::LintDocs { fix } => {
            let opts = DocsOptions {
                fix,
                ..Default::default()
            };
            docs::run_lint_docs(&runner, &eff, &opts)?
        }
        Commands::RunTests {
            script,
            all,
            fast,
            verbose,
            filter,
        } => {
            let opts = RunTestsOptions {
                script,
                all,
                fast,
                verbose,
                filter,
            };
            run_tests::run_tests(&runner, &eff, &opts)?
        }
        Commands::Hooks { cmd } => match cmd {
            HooksCmd::Install => {
                let exe = std::env::current_exe()?;
                let res = hooks::install_hooks(&eff, &exe)?;
                output::print_hooks(&res, out);
                return Ok(0);
            }
            HooksCmd::Uninstall => {
                let res = hooks::uninstall_hooks(&eff)?;
                output::print_hooks(&res, out);
                return Ok(0);
            }
            HooksCmd::Run { hook, git_args } => {
                tracing::debug!(hook = hook.file_name(), args = ?git_args, "hook invoked");
                hooks::run_hook(&runner, &eff, hook)?
            }
        },
        Commands::Labels { cmd } => match cmd {
            LabelsCmd::Create { repo } => {
                let repo = repo.or_else(|| eff.labels_repo.clone());
                let set = eff.label_set()?;
                let res = labels::create_labels(&runner, &set, repo.as_deref(), &eff.repo_root)?;
                output::print_labels(&res, out);
                return Ok(0);
            }
            LabelsCmd::ListDefaults => {
                output::print_label_set(&eff.label_set()?, out);
                return Ok(0);
            }
        },
    };

    output::print_task(&report, out);
    Ok(report.exit_code)
}
