//! External process execution.
//!
//! Every subcommand reduces to one or more `Invocation`s handed to a
//! `ToolRunner`. The system implementation streams the child's output to the
//! user; tests substitute a scripted runner.

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// A single external command: program, arguments, working directory and
/// extra environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            env: Vec::new(),
        }
    }

    pub fn arg(mut self, a: impl Into<String>) -> Self {
        self.args.push(a.into());
        self
    }

    pub fn args<I, S>(mut self, it: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(it.into_iter().map(Into::into));
        self
    }

    pub fn envs<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.cwd = Some(dir.to_path_buf());
        self
    }

    /// Shell-like rendering used in banners and JSON reports.
    pub fn display(&self) -> String {
        let mut out = self.program.clone();
        for a in &self.args {
            out.push(' ');
            if a.is_empty() || a.contains(char::is_whitespace) {
                out.push('"');
                out.push_str(a);
                out.push('"');
            } else {
                out.push_str(a);
            }
        }
        out
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default)]
pub struct Captured {
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl Captured {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Seam between task logic and the operating system.
///
/// `Sync` so link checks can fan out across threads.
pub trait ToolRunner: Sync {
    /// Run with output streamed to the user and return the exit code.
    fn status(&self, inv: &Invocation) -> Result<i32>;
    /// Run with output captured.
    fn output(&self, inv: &Invocation) -> Result<Captured>;
}

/// `std::process::Command` backed runner.
#[derive(Debug, Default, Clone)]
pub struct SystemRunner {
    /// Send the child's stdout to our stderr so stdout stays machine-readable.
    pub stdout_to_stderr: bool,
}

impl SystemRunner {
    pub fn new(output: &str) -> Self {
        Self {
            stdout_to_stderr: output == "json",
        }
    }

    fn command(inv: &Invocation) -> Command {
        let mut cmd = Command::new(&inv.program);
        cmd.args(&inv.args);
        if let Some(dir) = inv.cwd.as_ref() {
            cmd.current_dir(dir);
        }
        cmd.envs(inv.env.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        cmd
    }
}

fn spawn_error(inv: &Invocation, e: std::io::Error) -> Error {
    if e.kind() == std::io::ErrorKind::NotFound {
        Error::ToolMissing(inv.program.clone())
    } else {
        Error::Io(e)
    }
}

/// Killed-by-signal has no code; treat it as a plain failure.
fn exit_code(status: std::process::ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

impl ToolRunner for SystemRunner {
    fn status(&self, inv: &Invocation) -> Result<i32> {
        tracing::debug!(command = %inv.display(), cwd = ?inv.cwd, env = ?inv.env, "spawn");
        let mut cmd = Self::command(inv);
        if self.stdout_to_stderr {
            cmd.stdout(Stdio::from(std::io::stderr()));
        }
        let status = cmd.status().map_err(|e| spawn_error(inv, e))?;
        let code = exit_code(status);
        tracing::debug!(command = %inv.display(), code, "exited");
        Ok(code)
    }

    fn output(&self, inv: &Invocation) -> Result<Captured> {
        tracing::debug!(command = %inv.display(), cwd = ?inv.cwd, "spawn (captured)");
        let out = Self::command(inv)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| spawn_error(inv, e))?;
        let captured = Captured {
            code: exit_code(out.status),
            stdout: String::from_utf8_lossy(&out.stdout).to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
        };
        tracing::debug!(command = %inv.display(), code = captured.code, "exited");
        Ok(captured)
    }
}

/// Tool presence check: true iff the probe spawns and exits 0.
pub fn probe(runner: &dyn ToolRunner, program: &str, args: &[&str]) -> bool {
    let inv = Invocation::new(program).args(args.iter().copied());
    match runner.output(&inv) {
        Ok(c) => c.success(),
        Err(e) => {
            tracing::debug!(program, error = %e, "probe failed");
            false
        }
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! Scripted runner for unit tests.

    use super::*;
    use std::sync::Mutex;

    type Rule = (
        String,
        Box<dyn Fn(&Invocation) -> Result<Captured> + Send + Sync>,
    );

    /// Matches invocations by the prefix of their display string; the first
    /// matching rule wins and unmatched invocations succeed with code 0.
    #[derive(Default)]
    pub struct FakeRunner {
        rules: Vec<Rule>,
        pub calls: Mutex<Vec<Invocation>>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn on<F>(mut self, prefix: &str, f: F) -> Self
        where
            F: Fn(&Invocation) -> Result<Captured> + Send + Sync + 'static,
        {
            self.rules.push((prefix.to_string(), Box::new(f)));
            self
        }

        pub fn exit(self, prefix: &str, code: i32) -> Self {
            self.on(prefix, move |_| {
                Ok(Captured {
                    code,
                    ..Default::default()
                })
            })
        }

        pub fn missing(self, prefix: &str) -> Self {
            self.on(prefix, |inv| Err(Error::ToolMissing(inv.program.clone())))
        }

        pub fn commands(&self) -> Vec<String> {
            self.calls.lock().unwrap().iter().map(|i| i.display()).collect()
        }

        fn dispatch(&self, inv: &Invocation) -> Result<Captured> {
            self.calls.lock().unwrap().push(inv.clone());
            let shown = inv.display();
            for (prefix, f) in &self.rules {
                if shown.starts_with(prefix.as_str()) {
                    return f(inv);
                }
            }
            Ok(Captured::default())
        }
    }

    impl ToolRunner for FakeRunner {
        fn status(&self, inv: &Invocation) -> Result<i32> {
            self.dispatch(inv).map(|c| c.code)
        }

        fn output(&self, inv: &Invocation) -> Result<Captured> {
            self.dispatch(inv)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fake::FakeRunner;
    use super::*;

    #[test]
    fn test_display_quotes_whitespace() {
        let inv = Invocation::new("gh")
            .args(["label", "create", "good first issue"])
            .arg("--color");
        assert_eq!(inv.display(), "gh label create \"good first issue\" --color");
    }

    #[test]
    fn test_probe_missing_and_failing_tools() {
        let r = FakeRunner::new()
            .missing("node")
            .exit("gh auth", 1)
            .exit("gh --version", 0);
        assert!(!probe(&r, "node", &["--version"]));
        assert!(!probe(&r, "gh", &["auth", "status"]));
        assert!(probe(&r, "gh", &["--version"]));
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_mirrors_exit_code() {
        let r = SystemRunner::default();
        let ok = r.status(&Invocation::new("sh").args(["-c", "exit 0"])).unwrap();
        let bad = r.status(&Invocation::new("sh").args(["-c", "exit 3"])).unwrap();
        assert_eq!(ok, 0);
        assert_eq!(bad, 3);
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_passes_env() {
        let r = SystemRunner::default();
        let inv = Invocation::new("sh")
            .args(["-c", "printf %s \"$FERRIS_DEV_FLAVOR\""])
            .envs([("FERRIS_DEV_FLAVOR", "nightly")]);
        let c = r.output(&inv).unwrap();
        assert_eq!(c.stdout, "nightly");
        // env is not part of the rendered command
        assert_eq!(inv.display(), "sh -c \"printf %s \"$FERRIS_DEV_FLAVOR\"\"");
    }

    #[test]
    fn test_system_runner_reports_missing_program() {
        let r = SystemRunner::default();
        let err = r
            .output(&Invocation::new("ferris-dev-no-such-tool-xyz"))
            .unwrap_err();
        assert!(matches!(err, Error::ToolMissing(_)));
    }
}
