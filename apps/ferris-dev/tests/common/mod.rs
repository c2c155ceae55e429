use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

/// Scratch repository with an empty `.git/hooks` directory.
pub struct TestRepo {
    _tmp: TempDir,
    pub root: PathBuf,
}

impl TestRepo {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().join("FerrisScript");
        fs::create_dir_all(root.join(".git/hooks")).expect("create hooks dir");
        Self { _tmp: tmp, root }
    }

    pub fn without_git() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().join("plain");
        fs::create_dir_all(&root).expect("create dir");
        Self { _tmp: tmp, root }
    }

    pub fn hooks(&self) -> PathBuf {
        self.root.join(".git/hooks")
    }

    pub fn write(&self, rel: &str, body: &str) {
        let p = self.root.join(rel);
        if let Some(parent) = p.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(p, body).expect("write file");
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = cargo_bin_cmd!("ferris-dev");
        cmd.env("NO_COLOR", "1")
            .env_remove("FERRIS_DEV_LOG")
            .arg("--repo-root")
            .arg(&self.root);
        cmd
    }

    pub fn run_json(&self, args: &[&str]) -> Value {
        let out = self
            .cmd()
            .args(["--output", "json"])
            .args(args)
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&out).expect("valid json output")
    }
}
