// Integration tests enforcing the `range --json` stdout contract.
//
// Stdout from --json commands must be exactly one parseable JSON value:
// no banners, no extra lines. Errors go to stderr with a nonzero exit.
//
// Run with: cargo test -p gridlink-cli --test json_contract

use std::process::Command;

fn gridlink() -> Command {
    Command::new(env!("CARGO_BIN_EXE_gridlink"))
}

/// Assert stdout is a single, parseable JSON value with no extra lines.
fn assert_single_json(stdout: &str) -> serde_json::Value {
    let trimmed = stdout.trim();
    assert!(!trimmed.is_empty(), "stdout should not be empty");
    assert_eq!(
        trimmed.lines().count(),
        1,
        "expected exactly one line, got:\n{}",
        trimmed
    );
    serde_json::from_str(trimmed)
        .unwrap_or_else(|e| panic!("stdout must be valid JSON.\nParse error: {}\nstdout:\n{}", e, trimmed))
}

#[test]
fn range_json_produces_single_json_value() {
    let output = gridlink()
        .args(["range", "A1:B5", "--json"])
        .output()
        .expect("gridlink range --json");

    assert!(
        output.status.success(),
        "exit code: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    let value = assert_single_json(&stdout);

    assert_eq!(value["startRow"], 0);
    assert_eq!(value["startCol"], 0);
    assert_eq!(value["endRow"], 4);
    assert_eq!(value["endCol"], 1);
}

#[test]
fn range_json_keeps_inverted_ranges_as_is() {
    let output = gridlink()
        .args(["range", "B5:A1", "--json"])
        .output()
        .expect("gridlink range --json");

    assert!(output.status.success());
    let value = assert_single_json(&String::from_utf8_lossy(&output.stdout));

    assert_eq!(value["startRow"], 4);
    assert_eq!(value["startCol"], 1);
    assert_eq!(value["endRow"], 0);
    assert_eq!(value["endCol"], 0);
}

#[test]
fn invalid_range_exits_nonzero_with_empty_stdout() {
    let output = gridlink()
        .args(["range", "A1B5", "--json"])
        .output()
        .expect("gridlink range --json");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty(), "stdout must stay clean on errors");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid range format"),
        "stderr: {}",
        stderr
    );
}

#[test]
fn bad_cell_reference_reports_which_side() {
    let output = gridlink()
        .args(["range", "A1:zz"])
        .output()
        .expect("gridlink range");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid cell reference"), "stderr: {}", stderr);
}

#[test]
fn range_plain_output_is_human_readable() {
    let output = gridlink()
        .args(["range", "A1:B5"])
        .output()
        .expect("gridlink range");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), "rows 0..4  cols 0..1");
}
