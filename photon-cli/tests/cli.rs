use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_stdout_prints_transpiled_unit() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.w"), "x = 5\nprint(x)\n").unwrap();

    let mut cmd = cargo_bin_cmd!("photon");
    cmd.current_dir(dir.path()).arg("main.w").arg("--stdout");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("var x = 5;"))
        .stdout(predicate::str::contains("console.log(x);"));
}

#[test]
fn test_writes_to_default_output_dir() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.w"), "x = 5\n").unwrap();

    let mut cmd = cargo_bin_cmd!("photon");
    cmd.current_dir(dir.path()).arg("main.w");
    cmd.assert().success();

    let written = fs::read_to_string(dir.path().join("Sources/js/main.js")).unwrap();
    assert_eq!(written, "var x = 5;\n");
}

#[test]
fn test_out_dir_and_target_flags() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.w"), "x = 5\n").unwrap();

    let mut cmd = cargo_bin_cmd!("photon");
    cmd.current_dir(dir.path())
        .args(["main.w", "-t", "c", "-o", "build"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("main.c"));

    let written = fs::read_to_string(dir.path().join("build/c/main.c")).unwrap();
    assert!(written.contains("int main(void) {"));
    assert!(!dir.path().join("Sources").exists());
}

#[test]
fn test_project_file_selects_target() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.w"), "x = 5\n").unwrap();
    fs::write(
        dir.path().join("photon.toml"),
        "[transpile]\ntarget = \"c\"\nindent_width = 2\n",
    )
    .unwrap();

    let mut cmd = cargo_bin_cmd!("photon");
    cmd.current_dir(dir.path()).args(["main.w", "--stdout"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("int main(void) {\n  int x = 5;"));
}

#[test]
fn test_list_targets() {
    let mut cmd = cargo_bin_cmd!("photon");
    cmd.arg("--list-targets");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("js - JavaScript (node or web)"))
        .stdout(predicate::str::contains("c - C99 with an embedded list runtime"));
}

#[test]
fn test_syntax_error_reports_location() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("broken.w"), "x = 1\ny = (5\n").unwrap();

    let mut cmd = cargo_bin_cmd!("photon");
    cmd.current_dir(dir.path()).args(["broken.w", "--stdout"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("SyntaxError"))
        .stderr(predicate::str::contains("broken.w:2"));
    assert!(!dir.path().join("Sources").exists());
}

#[test]
fn test_unsupported_feature_fails() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.w"), "m = {1: 2}\n").unwrap();

    let mut cmd = cargo_bin_cmd!("photon");
    cmd.current_dir(dir.path()).args(["main.w", "--target", "c"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("UnsupportedFeatureError"));
    assert!(!dir.path().join("Sources/c/main.c").exists());
}

#[test]
fn test_ast_dump() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.w"), "x = 5\n").unwrap();

    let mut cmd = cargo_bin_cmd!("photon");
    cmd.current_dir(dir.path()).args(["main.w", "--ast"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"opcode\": \"assign\""));
}

#[test]
fn test_tokens_dump() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.w"), "x = 5\n").unwrap();

    let mut cmd = cargo_bin_cmd!("photon");
    cmd.current_dir(dir.path()).args(["main.w", "--tokens"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"kind\": \"indent\""));
}

#[test]
fn test_missing_file() {
    let dir = tempdir().unwrap();
    let mut cmd = cargo_bin_cmd!("photon");
    cmd.current_dir(dir.path()).arg("nope.w");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("nope.w"));
}
