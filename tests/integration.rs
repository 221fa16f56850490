use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_cdoc")))
}

fn fixture_path(name: &str) -> String {
    format!("{}/tests/fixtures/{}", env!("CARGO_MANIFEST_DIR"), name)
}

fn fixture(name: &str) -> String {
    fs::read_to_string(fixture_path(name)).unwrap()
}

// -- stdin mode --

#[test]
fn stdin_mode_produces_text() {
    let assert = cmd()
        .arg("-n")
        .write_stdin(fixture("sample.c"))
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.contains("Module: (stdin)"));
    assert!(output.contains("DESCRIPTION"));
    assert!(output.contains("Geometry helpers for the demo tool."));
    assert!(output.contains("FUNCTIONS"));
    assert!(output.contains("add"));
    assert!(output.contains("Adds two numbers."));
}

#[test]
fn stdin_mode_no_color_has_no_escape_codes() {
    let assert = cmd()
        .arg("-n")
        .write_stdin(fixture("sample.c"))
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(!output.contains('\x1b'));
}

#[test]
fn stdin_json_format() {
    let assert = cmd()
        .args(["-f", "json"])
        .write_stdin(fixture("sample.c"))
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.contains("\"nodes\""));
    assert!(output.contains("\"name\": \"add\""));
    assert!(output.contains("\"type\": \"function\""));
    assert!(output.contains("\"name\": \"MAX_POINTS\""));
}

#[test]
fn stdin_html_format() {
    let assert = cmd()
        .args(["-f", "html"])
        .write_stdin(fixture("sample.c"))
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.contains("<!DOCTYPE html>"));
    assert!(output.contains("#include &lt;stdio.h&gt;"));
}

// -- file mode --

#[test]
fn file_mode_renders_all_kinds() {
    let assert = cmd()
        .arg("-n")
        .arg(fixture_path("sample.c"))
        .assert()
        .success();

    let output = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    assert!(output.contains("Module: sample"));
    assert!(output.contains("stdio.h"));
    assert!(output.contains("MAX_POINTS"));
    assert!(output.contains("SQUARE"));
    assert!(output.contains("allocation_count [static]"));
    assert!(output.contains("point (struct)"));
    assert!(output.contains("distance_t (typedef)"));
    assert!(output.contains("norm [static]"));
}

#[test]
fn file_and_stdin_nodes_identical() {
    let from_file = cmd()
        .args(["-f", "json"])
        .arg(fixture_path("sample.c"))
        .assert()
        .success();
    let from_stdin = cmd()
        .args(["-f", "json"])
        .write_stdin(fixture("sample.c"))
        .assert()
        .success();

    let a = String::from_utf8(from_file.get_output().stdout.clone()).unwrap();
    let b = String::from_utf8(from_stdin.get_output().stdout.clone()).unwrap();
    // Header fields (filepath, module, timestamp) differ; node lists must not.
    let a_nodes = a.split("\"nodes\"").nth(1).unwrap();
    let b_nodes = b.split("\"nodes\"").nth(1).unwrap();
    assert_eq!(a_nodes, b_nodes);
}

#[test]
fn missing_file_fails() {
    cmd()
        .arg("no/such/file.c")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no files matched").and(predicate::str::contains("no input files")));
}

#[test]
fn invalid_format_fails() {
    cmd()
        .args(["-f", "xml"])
        .arg(fixture_path("sample.c"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown format"));
}

// -- node capacity --

#[test]
fn max_nodes_warns_exactly_once() {
    let mut input = String::new();
    for i in 0..20 {
        input.push_str(&format!("static int x{} = {};\n", i, i));
    }

    let assert = cmd()
        .args(["-f", "json", "--max-nodes", "5"])
        .write_stdin(input)
        .assert()
        .success();

    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let stderr = String::from_utf8(assert.get_output().stderr.clone()).unwrap();
    assert!(stdout.contains("\"name\": \"x4\""));
    assert!(!stdout.contains("\"name\": \"x5\""));
    assert_eq!(stderr.matches("node limit reached").count(), 1);
}

// -- bulk mode --

#[test]
fn bulk_mode_creates_tree_and_index() {
    let src = TempDir::new().unwrap();
    let out = TempDir::new().unwrap();
    fs::write(src.path().join("alpha.c"), fixture("sample.c")).unwrap();
    fs::create_dir(src.path().join("sub")).unwrap();
    fs::write(
        src.path().join("sub").join("beta.c"),
        "#define BETA 2\nint beta_fn(void);\n",
    )
    .unwrap();
    // Non-.c files are ignored by the sweep
    fs::write(src.path().join("notes.txt"), "ignore me").unwrap();

    cmd()
        .args(["-R", src.path().to_str().unwrap()])
        .args(["-O", out.path().to_str().unwrap()])
        .assert()
        .success();

    assert!(out.path().join("txt/alpha.txt").exists());
    assert!(out.path().join("json/alpha.json").exists());
    assert!(out.path().join("html/alpha.html").exists());
    assert!(out.path().join("txt/sub__beta.txt").exists());

    let index = fs::read_to_string(out.path().join("index.html")).unwrap();
    assert!(index.contains("alpha.c"));
    assert!(index.contains("sub__beta"));
    assert!(index.contains("Total files: 2"));

    // Bulk text artifacts are written without color
    let txt = fs::read_to_string(out.path().join("txt/alpha.txt")).unwrap();
    assert!(!txt.contains('\x1b'));
    assert!(txt.contains("Module: alpha"));
}

#[test]
fn bulk_mode_requires_out_dir() {
    let src = TempDir::new().unwrap();
    cmd()
        .args(["-R", src.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--out-dir is required"));
}

#[test]
fn bulk_mode_rejects_missing_root() {
    let out = TempDir::new().unwrap();
    cmd()
        .args(["-R", "no/such/dir"])
        .args(["-O", out.path().to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}
