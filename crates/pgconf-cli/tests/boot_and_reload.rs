//! End-to-end coverage of the `boot`/`reload` subcommands against a real
//! on-disk configuration file, exercising the binary rather than the library.

use std::io::Write;

use assert_cmd::Command;
use tempfile::tempdir;

fn conf(dir: &std::path::Path, name: &str, body: &str) -> std::path::PathBuf {
    let p = dir.join(name);
    let mut f = std::fs::File::create(&p).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    p
}

#[test]
fn boot_prints_applied_change() {
    let dir = tempdir().unwrap();
    let file = conf(dir.path(), "postgresql.conf", "work_mem = '64MB'\n");

    let output = Command::cargo_bin("pgconf-cli")
        .unwrap()
        .arg("boot")
        .arg(&file)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(
        stdout.contains("applied: work_mem = \"64MB\""),
        "stdout was: {stdout}"
    );
}

#[test]
fn reload_of_an_unchanged_file_reports_no_changes() {
    let dir = tempdir().unwrap();
    let file = conf(dir.path(), "postgresql.conf", "");

    let output = Command::cargo_bin("pgconf-cli")
        .unwrap()
        .arg("reload")
        .arg(&file)
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("no changes"), "stdout was: {stdout}");
}

#[test]
fn missing_config_file_exits_with_failure() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("does_not_exist.conf");

    let output = Command::cargo_bin("pgconf-cli")
        .unwrap()
        .arg("boot")
        .arg(&missing)
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("pgconf-cli:"), "stderr was: {stderr}");
}
