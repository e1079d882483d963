use lopdf::Document;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

const SAMPLE: &str = r#"# Deep Learning Optimizers

## A Field Guide

## Gradient Descent

The base algorithm.
Updates follow the negative gradient.

```python
for step in range(100):
    w -= lr * grad(w)
```

## Comparison

| Optimizer | Memory |
| --------- | ------ |
| SGD       | low    |
| Adam      | high   |

![loss curve](chart.png)
"#;

fn staged_pages(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with("mdpress-") && name.ends_with(".html") {
                names.push(name);
            }
        }
    }
    names
}

#[test]
#[ignore = "requires a local Chrome or Chromium"]
fn test_renders_study_notes_to_pdf() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("guide.md");
    fs::write(&input, SAMPLE).unwrap();
    fs::write(dir.path().join("chart.png"), b"png").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mdpress");
    // Stage temp pages inside the test dir so cleanup is observable
    cmd.env("TMPDIR", dir.path());
    cmd.arg(input.to_str().unwrap());
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("PDF generated"))
        .stdout(predicate::str::contains("File size:"))
        .stdout(predicate::str::contains("Fixed image path"));

    let output = dir.path().join("guide.pdf");
    assert!(output.exists(), "derived output name should be guide.pdf");

    let bytes = fs::read(&output).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));

    // title page, contents page, subtitle page, then the body
    let doc = Document::load(&output).unwrap();
    assert!(doc.get_pages().len() >= 3);

    assert!(staged_pages(dir.path()).is_empty());
}

#[test]
fn test_failed_render_cleans_up_staged_page() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("guide.md");
    fs::write(&input, SAMPLE).unwrap();
    fs::write(dir.path().join("chart.png"), b"png").unwrap();

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mdpress");
    // Stage temp pages inside the test dir, and hide every browser so the
    // launch fails after the page has been staged
    cmd.env("TMPDIR", dir.path());
    cmd.env("PATH", "");
    cmd.env_remove("CHROME");
    cmd.arg(input.to_str().unwrap());
    cmd.assert()
        .failure()
        .stdout(predicate::str::contains("Fixed image path"))
        .stdout(predicate::str::contains("PDF generation failed"))
        .stderr(predicate::str::contains("Browser Error"));

    assert!(staged_pages(dir.path()).is_empty());
    assert!(!dir.path().join("guide.pdf").exists());
}

#[test]
#[ignore = "requires a local Chrome or Chromium"]
fn test_explicit_output_path_is_honored() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("notes.md");
    fs::write(&input, "# Notes\n\nShort body.\n").unwrap();
    let output = dir.path().join("exported.pdf");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("mdpress");
    cmd.arg(input.to_str().unwrap())
        .arg(output.to_str().unwrap())
        .arg("-q");
    cmd.assert().success().stdout(predicate::str::is_empty());

    assert!(output.exists());
    assert!(!dir.path().join("notes.pdf").exists());
}

#[test]
#[ignore = "requires a local Chrome or Chromium"]
fn test_convert_string_returns_pdf_bytes() {
    let bytes = mdpress::convert_string("# Title\n\nA short paragraph.\n", None).unwrap();
    assert!(bytes.starts_with(b"%PDF-"));
}
