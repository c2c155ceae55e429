use assert_cmd::cargo::cargo_bin_cmd;

fn run_help(args: &[&str]) {
    let mut cmd = cargo_bin_cmd!("ferris-dev");
    cmd.args(args).arg("--help").assert().success();
}

#[test]
fn every_cli_command_has_help_path() {
    run_help(&[]);

    run_help(&["version"]);
    run_help(&["lint"]);
    run_help(&["test"]);
    run_help(&["bench"]);
    run_help(&["fmt"]);
    run_help(&["coverage"]);
    run_help(&["lint-docs"]);
    run_help(&["run-tests"]);

    run_help(&["hooks"]);
    run_help(&["hooks", "install"]);
    run_help(&["hooks", "uninstall"]);
    run_help(&["hooks", "run"]);

    run_help(&["labels"]);
    run_help(&["labels", "create"]);
    run_help(&["labels", "list-defaults"]);
}
