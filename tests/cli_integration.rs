use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_binary_fails_without_input() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mdpress");
    // No input args → prints help and exits with code 1
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_binary_help_lists_examples() {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mdpress");
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("EXAMPLES:"))
        .stdout(predicate::str::contains("learning-guide.md"));
}

#[test]
fn test_binary_fails_for_missing_input_file() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("not-here.md");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mdpress");
    cmd.arg(missing.to_str().unwrap());
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("PDF generation failed"))
        .stderr(predicate::str::contains("Markdown file not found"));

    assert!(!dir.path().join("not-here.pdf").exists());
}

#[test]
fn test_binary_fails_for_missing_output_directory() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.md");
    fs::write(&input, "# Notes\n").unwrap();
    let output = dir.path().join("no-such-dir/out.pdf");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mdpress");
    cmd.arg(input.to_str().unwrap()).arg(output.to_str().unwrap());
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("output directory does not exist"));
}

#[test]
fn test_binary_rejects_conflicting_verbosity_flags() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.md");
    fs::write(&input, "# Notes\n").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mdpress");
    cmd.arg(input.to_str().unwrap()).arg("-q").arg("-v");
    cmd.assert().failure();
}
