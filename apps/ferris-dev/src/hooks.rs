//! Git hook management: install, uninstall, and the hook bodies themselves.
//!
//! Installed hooks are small shell scripts that call back into `ferris-dev
//! hooks run <name>`. Foreign hooks found at install time are moved aside and
//! put back on uninstall, so an install/uninstall pair leaves the hooks
//! directory as it was.

use crate::config::Effective;
use crate::docs::{self, DocsOptions};
use crate::error::{Error, Result};
use crate::models::hook::{HookAction, HookReport};
use crate::models::TaskReport;
use crate::runner::{Invocation, ToolRunner};
use crate::tasks;
use crate::utils;
use clap::ValueEnum;
use std::fs;
use std::path::{Path, PathBuf};

pub const MARKER: &str = "# managed-by: ferris-dev";
pub const BACKUP_SUFFIX: &str = ".ferris-dev.bak";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HookKind {
    PreCommit,
    PrePush,
}

impl HookKind {
    pub const ALL: [HookKind; 2] = [HookKind::PreCommit, HookKind::PrePush];

    pub fn file_name(&self) -> &'static str {
        match self {
            HookKind::PreCommit => "pre-commit",
            HookKind::PrePush => "pre-push",
        }
    }

    fn enabled(&self, eff: &Effective) -> bool {
        match self {
            HookKind::PreCommit => eff.hook_pre_commit,
            HookKind::PrePush => eff.hook_pre_push,
        }
    }
}

/// Locate the git directory: `.git` itself, or the target of a `.git` file
/// (`gitdir: <path>`) as used by worktrees and submodules.
pub fn git_dir(root: &Path) -> Result<PathBuf> {
    let dot_git = root.join(".git");
    if dot_git.is_dir() {
        return Ok(dot_git);
    }
    if dot_git.is_file() {
        let s = fs::read_to_string(&dot_git)?;
        if let Some(target) = s.lines().find_map(|l| l.trim().strip_prefix("gitdir:")) {
            let p = PathBuf::from(target.trim());
            let p = if p.is_absolute() { p } else { root.join(p) };
            if p.is_dir() {
                return Ok(p);
            }
        }
    }
    Err(Error::NotGitRepo(root.to_string_lossy().to_string()))
}

/// Script body for `kind`, calling back into the given executable.
pub fn hook_script(exe: &Path, kind: HookKind) -> String {
    let exe = exe.to_string_lossy().replace('\\', "/").replace('\'', "'\\''");
    format!(
        "#!/bin/sh\n{}\n# Remove with: ferris-dev hooks uninstall\nexec '{}' hooks run {} \"$@\"\n",
        MARKER,
        exe,
        kind.file_name()
    )
}

fn is_managed(path: &Path) -> bool {
    fs::read_to_string(path)
        .map(|s| s.lines().any(|l| l.trim() == MARKER))
        .unwrap_or(false)
}

fn backup_path(hooks: &Path, kind: HookKind) -> PathBuf {
    hooks.join(format!("{}{}", kind.file_name(), BACKUP_SUFFIX))
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mut perm = fs::metadata(path)?.permissions();
    perm.set_mode(0o755);
    fs::set_permissions(path, perm)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}

/// Install the enabled hooks, pointing them at `exe`.
pub fn install_hooks(eff: &Effective, exe: &Path) -> Result<Vec<HookReport>> {
    let hooks = git_dir(&eff.repo_root)?.join("hooks");
    fs::create_dir_all(&hooks)?;
    let mut out = Vec::new();
    for kind in HookKind::ALL {
        if !kind.enabled(eff) {
            continue;
        }
        let path = hooks.join(kind.file_name());
        let bak = backup_path(&hooks, kind);
        let action = if !path.exists() {
            HookAction::Installed
        } else if is_managed(&path) {
            HookAction::Updated
        } else if bak.exists() {
            // Two foreign hooks and one backup slot: leave both alone.
            tracing::warn!(hook = kind.file_name(), "foreign hook and backup both present");
            HookAction::Skipped
        } else {
            fs::rename(&path, &bak)?;
            HookAction::BackedUp
        };
        if action != HookAction::Skipped {
            fs::write(&path, hook_script(exe, kind))?;
            make_executable(&path)?;
        }
        out.push(HookReport {
            hook: kind.file_name().to_string(),
            path: utils::rel_to_root(&eff.repo_root, &path),
            action,
        });
    }
    Ok(out)
}

/// Remove managed hooks and restore any backed-up originals.
///
/// Hooks we did not write are never touched.
pub fn uninstall_hooks(eff: &Effective) -> Result<Vec<HookReport>> {
    let hooks = git_dir(&eff.repo_root)?.join("hooks");
    let mut out = Vec::new();
    for kind in HookKind::ALL {
        let path = hooks.join(kind.file_name());
        let bak = backup_path(&hooks, kind);
        let action = if path.exists() && is_managed(&path) {
            fs::remove_file(&path)?;
            if bak.exists() {
                fs::rename(&bak, &path)?;
                HookAction::Restored
            } else {
                HookAction::Removed
            }
        } else {
            HookAction::Skipped
        };
        out.push(HookReport {
            hook: kind.file_name().to_string(),
            path: utils::rel_to_root(&eff.repo_root, &path),
            action,
        });
    }
    Ok(out)
}

/// Markdown files changed between upstream and HEAD.
///
/// `None` when there is no upstream to compare against.
fn changed_markdown(runner: &dyn ToolRunner, eff: &Effective) -> Result<Option<Vec<PathBuf>>> {
    let inv = Invocation::new("git")
        .args(["diff", "--name-only", "@{upstream}...HEAD"])
        .current_dir(&eff.repo_root);
    let c = match runner.output(&inv) {
        Ok(c) => c,
        Err(Error::ToolMissing(_)) => return Ok(None),
        Err(e) => return Err(e),
    };
    if !c.success() {
        tracing::debug!(stderr = %c.stderr.trim(), "no upstream; checking all docs");
        return Ok(None);
    }
    Ok(Some(
        c.stdout
            .lines()
            .map(str::trim)
            .filter(|l| l.to_ascii_lowercase().ends_with(".md"))
            .map(PathBuf::from)
            .collect(),
    ))
}

/// Body of an installed hook. Exit code 0 lets git proceed, 1 blocks.
pub fn run_hook(runner: &dyn ToolRunner, eff: &Effective, kind: HookKind) -> Result<TaskReport> {
    let name = kind.file_name();
    match kind {
        HookKind::PreCommit => {
            let mut report = TaskReport::new(name);
            let fmt = tasks::run_fmt(runner, eff, true)?;
            let fmt_ok = fmt.success();
            report.steps.extend(fmt.steps);
            if fmt_ok {
                let lint = tasks::run_lint(runner, eff)?;
                report.steps.extend(lint.steps);
            }
            if report.steps.iter().any(|s| !s.success()) {
                report.fail(1);
            }
            Ok(report)
        }
        HookKind::PrePush => {
            let only = match changed_markdown(runner, eff)? {
                Some(files) if files.is_empty() => {
                    return Ok(TaskReport::skipped(name, "no markdown changes to check"));
                }
                other => other,
            };
            let opts = DocsOptions {
                fix: false,
                only,
                lenient_node: true,
            };
            let mut report = docs::run_lint_docs(runner, eff, &opts)?;
            report.task = name.to_string();
            Ok(report)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::fake::FakeRunner;
    use crate::runner::Captured;
    use crate::tasks::testing::effective_for;
    use std::collections::BTreeMap;
    use tempfile::tempdir;

    fn snapshot(dir: &Path) -> BTreeMap<String, Vec<u8>> {
        fs::read_dir(dir)
            .unwrap()
            .flatten()
            .map(|e| {
                (
                    e.file_name().to_string_lossy().to_string(),
                    fs::read(e.path()).unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_install_then_uninstall_restores_hooks_dir() {
        let dir = tempdir().unwrap();
        let eff = effective_for(dir.path());
        let hooks = eff.repo_root.join(".git/hooks");
        fs::write(hooks.join("pre-commit"), "#!/bin/sh\necho custom\n").unwrap();
        fs::write(hooks.join("pre-rebase.sample"), "#!/bin/sh\n").unwrap();
        let before = snapshot(&hooks);

        let exe = PathBuf::from("/usr/local/bin/ferris-dev");
        let installed = install_hooks(&eff, &exe).unwrap();
        assert_eq!(installed[0].action, HookAction::BackedUp);
        assert_eq!(installed[1].action, HookAction::Installed);
        assert!(is_managed(&hooks.join("pre-commit")));
        assert!(hooks.join("pre-commit.ferris-dev.bak").exists());

        let removed = uninstall_hooks(&eff).unwrap();
        assert_eq!(removed[0].action, HookAction::Restored);
        assert_eq!(removed[1].action, HookAction::Removed);
        assert_eq!(snapshot(&hooks), before);
    }

    #[test]
    fn test_reinstall_updates_in_place() {
        let dir = tempdir().unwrap();
        let eff = effective_for(dir.path());
        let exe = PathBuf::from("/opt/ferris-dev");
        install_hooks(&eff, &exe).unwrap();
        let again = install_hooks(&eff, &exe).unwrap();
        assert!(again.iter().all(|h| h.action == HookAction::Updated));
        let hooks = eff.repo_root.join(".git/hooks");
        assert!(!hooks.join("pre-push.ferris-dev.bak").exists());
        uninstall_hooks(&eff).unwrap();
        assert!(snapshot(&hooks).is_empty());
    }

    #[test]
    fn test_uninstall_leaves_foreign_hooks() {
        let dir = tempdir().unwrap();
        let eff = effective_for(dir.path());
        let hooks = eff.repo_root.join(".git/hooks");
        fs::write(hooks.join("pre-push"), "#!/bin/sh\nexit 0\n").unwrap();
        let res = uninstall_hooks(&eff).unwrap();
        assert!(res.iter().all(|h| h.action == HookAction::Skipped));
        assert!(hooks.join("pre-push").exists());
    }

    #[test]
    fn test_install_refuses_to_clobber_when_backup_taken() {
        let dir = tempdir().unwrap();
        let eff = effective_for(dir.path());
        let hooks = eff.repo_root.join(".git/hooks");
        fs::write(hooks.join("pre-push"), "#!/bin/sh\necho new\n").unwrap();
        fs::write(hooks.join("pre-push.ferris-dev.bak"), "#!/bin/sh\necho old\n").unwrap();
        let res = install_hooks(&eff, Path::new("/bin/ferris-dev")).unwrap();
        assert_eq!(res[1].action, HookAction::Skipped);
        assert_eq!(
            fs::read_to_string(hooks.join("pre-push")).unwrap(),
            "#!/bin/sh\necho new\n"
        );
    }

    #[test]
    fn test_disabled_hook_not_installed() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("ferris-dev.toml"), "[hooks]\npre_commit = false\n").unwrap();
        let eff = effective_for(dir.path());
        let res = install_hooks(&eff, Path::new("/bin/ferris-dev")).unwrap();
        assert_eq!(res.len(), 1);
        assert_eq!(res[0].hook, "pre-push");
    }

    #[cfg(unix)]
    #[test]
    fn test_installed_hook_is_executable() {
        use std::os::unix::fs::PermissionsExt;
        let dir = tempdir().unwrap();
        let eff = effective_for(dir.path());
        install_hooks(&eff, Path::new("/bin/ferris-dev")).unwrap();
        let mode = fs::metadata(eff.repo_root.join(".git/hooks/pre-push"))
            .unwrap()
            .permissions()
            .mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn test_git_dir_from_gitdir_file_and_missing() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let real = root.join("main/.git/worktrees/wt");
        fs::create_dir_all(&real).unwrap();
        let wt = root.join("wt");
        fs::create_dir_all(&wt).unwrap();
        fs::write(wt.join(".git"), format!("gitdir: {}\n", real.display())).unwrap();
        assert_eq!(git_dir(&wt).unwrap(), real);

        let plain = root.join("plain");
        fs::create_dir_all(&plain).unwrap();
        assert!(matches!(git_dir(&plain), Err(Error::NotGitRepo(_))));
    }

    #[test]
    fn test_hook_script_quotes_exe() {
        let s = hook_script(Path::new("/home/o'neil/bin/ferris-dev"), HookKind::PrePush);
        assert!(s.starts_with("#!/bin/sh\n"));
        assert!(s.contains(MARKER));
        assert!(s.contains("exec '/home/o'\\''neil/bin/ferris-dev' hooks run pre-push"));
    }

    #[test]
    fn test_pre_commit_blocks_on_fmt_and_skips_lint() {
        let dir = tempdir().unwrap();
        let eff = effective_for(dir.path());
        let r = FakeRunner::new().exit("cargo fmt", 1);
        let rep = run_hook(&r, &eff, HookKind::PreCommit).unwrap();
        assert_eq!(rep.exit_code, 1);
        assert_eq!(r.commands().len(), 1);

        let r = FakeRunner::new().exit("cargo clippy", 101);
        let rep = run_hook(&r, &eff, HookKind::PreCommit).unwrap();
        assert_eq!(rep.exit_code, 1);
        assert_eq!(rep.steps.len(), 2);

        let r = FakeRunner::new();
        assert!(run_hook(&r, &eff, HookKind::PreCommit).unwrap().success());
    }

    #[test]
    fn test_pre_push_skips_without_markdown_changes() {
        let dir = tempdir().unwrap();
        let eff = effective_for(dir.path());
        let r = FakeRunner::new().on("git diff", |_| {
            Ok(Captured {
                code: 0,
                stdout: "crates/compiler/src/lexer.rs\n".into(),
                stderr: String::new(),
            })
        });
        let rep = run_hook(&r, &eff, HookKind::PrePush).unwrap();
        assert!(rep.success());
        assert!(rep.skipped.is_some());
        assert_eq!(r.commands().len(), 1);
    }

    #[test]
    fn test_pre_push_allows_when_node_missing() {
        let dir = tempdir().unwrap();
        let eff = effective_for(dir.path());
        fs::write(eff.repo_root.join("README.md"), "# x\n").unwrap();
        let r = FakeRunner::new()
            .on("git diff", |_| {
                Ok(Captured {
                    code: 0,
                    stdout: "README.md\n".into(),
                    stderr: String::new(),
                })
            })
            .missing("node");
        let rep = run_hook(&r, &eff, HookKind::PrePush).unwrap();
        assert_eq!(rep.exit_code, 0);
        assert!(rep.skipped.is_some());
    }

    #[test]
    fn test_pre_push_blocks_on_doc_failure_without_upstream() {
        let dir = tempdir().unwrap();
        let eff = effective_for(dir.path());
        fs::write(eff.repo_root.join("README.md"), "# x\n").unwrap();
        let lint = format!("{} --yes markdownlint-cli", utils::npx_program());
        let r = FakeRunner::new().exit("git diff", 128).exit(&lint, 1);
        let rep = run_hook(&r, &eff, HookKind::PrePush).unwrap();
        assert_eq!(rep.task, "pre-push");
        assert_eq!(rep.exit_code, 1);
    }

    #[test]
    fn test_pre_push_without_git_falls_back_to_all_docs() {
        let dir = tempdir().unwrap();
        let eff = effective_for(dir.path());
        fs::write(eff.repo_root.join("README.md"), "# x\n").unwrap();
        let r = FakeRunner::new().missing("git").missing("node");
        let rep = run_hook(&r, &eff, HookKind::PrePush).unwrap();
        assert_eq!(rep.exit_code, 0);
        assert_eq!(r.commands(), vec!["git diff --name-only @{upstream}...HEAD", "node --version"]);
    }
}
