use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write_config(dir: &Path, body: &str) {
    fs::write(dir.join("pre-commit.yaml"), body).unwrap();
}

fn bin(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("pre-commit-progress").unwrap();
    cmd.current_dir(dir.path());
    cmd
}

#[test]
fn passing_checks_exit_zero_with_ok_banner() {
    let dir = TempDir::new().unwrap();
    write_config(
        dir.path(),
        r#"
max_parallel: 1
tasks:
  - cmd: [sh, -c, "sleep 0.1; exit 0"]
  - cmd: [sh, -c, "sleep 0.05; exit 0"]
"#,
    );

    bin(&dir)
        .args(["run", "--all"])
        .assert()
        .success()
        .stderr(predicate::str::contains(" OK "));
}

#[test]
fn failing_check_exits_one_and_prints_its_log() {
    let dir = TempDir::new().unwrap();
    write_config(
        dir.path(),
        r#"
check_git_diff: false
tasks:
  - cmd: [sh, -c, "echo boom >&2; exit 2"]
  - cmd: echo fine
"#,
    );

    bin(&dir)
        .arg("run")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("boom"))
        .stderr(predicate::str::contains("Log of : sh -c echo boom >&2; exit 2"))
        .stderr(predicate::str::contains("ERROR"))
        .stdout(predicate::str::contains("❌"));
}

#[test]
fn task_runs_in_its_working_directory() {
    let dir = TempDir::new().unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub/marker.txt"), "x").unwrap();
    write_config(
        dir.path(),
        r#"
tasks:
  - cwd: sub
    cmd: [sh, -c, "test -f marker.txt || { echo missing >&2; exit 3; }"]
"#,
    );

    bin(&dir).args(["run", "--all"]).assert().success();
}

#[test]
fn report_file_is_written() {
    let dir = TempDir::new().unwrap();
    write_config(
        dir.path(),
        r#"
check_git_diff: false
report_file: out/report.json
tasks:
  - cmd: echo hello
"#,
    );

    bin(&dir).arg("run").assert().success();

    let report = fs::read_to_string(dir.path().join("out/report.json")).unwrap();
    assert!(report.contains("\"passed\": true"));
    assert!(report.contains("echo hello"));
}

#[test]
fn dry_run_lists_tasks_without_running_them() {
    let dir = TempDir::new().unwrap();
    write_config(
        dir.path(),
        r#"
tasks:
  - cmd: [sh, -c, "touch should-not-exist"]
"#,
    );

    bin(&dir)
        .args(["run", "--all", "--dry-run", "--max-parallel", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Execution Plan"))
        .stdout(predicate::str::contains("Max parallel: 2"))
        .stdout(predicate::str::contains("sh -c touch should-not-exist"));

    assert!(!dir.path().join("should-not-exist").exists());
}

#[test]
fn zero_parallelism_is_rejected() {
    let dir = TempDir::new().unwrap();
    write_config(dir.path(), "tasks:\n  - cmd: 'true'\n");

    bin(&dir)
        .args(["run", "--all", "--max-parallel", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max_parallel"));
}

#[test]
fn missing_config_fails() {
    let dir = TempDir::new().unwrap();

    bin(&dir)
        .args(["run", "--config", "nope.yaml"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.yaml"));
}

#[test]
fn schema_describes_config() {
    let dir = TempDir::new().unwrap();

    bin(&dir)
        .arg("schema")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"tasks\""))
        .stdout(predicate::str::contains("max_parallel"));
}
