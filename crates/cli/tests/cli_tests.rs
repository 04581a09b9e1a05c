// Integration tests for the `egrid` binary.
// Run with: cargo test -p editgrid-cli --test cli_tests

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

fn egrid() -> Command {
    Command::new(env!("CARGO_BIN_EXE_egrid"))
}

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

fn stdout_json(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "exit code: {:?}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout is JSON")
}

struct Fixture {
    dir: TempDir,
    columns: PathBuf,
    rows: PathBuf,
}

fn fixture() -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let columns = write(
        dir.path(),
        "columns.json",
        r#"[
            {"id": "name", "header": "Name", "cellType": "text"},
            {"id": "qty", "header": "Qty", "cellType": "number"},
            {"id": "paid", "header": "Paid", "cellType": "checkbox"},
            {"id": "ref", "header": "Ref", "cellType": "readonly"}
        ]"#,
    );
    let rows = write(
        dir.path(),
        "rows.json",
        r#"[
            {"name": "r0", "qty": 5, "paid": false, "ref": "A"},
            {"name": "r1", "qty": 6, "paid": false, "ref": "B"},
            {"name": "r2", "qty": 7, "paid": true, "ref": "C"},
            {"name": "r3", "qty": 8, "paid": false, "ref": "D"},
            {"name": "r4", "qty": 9, "paid": false, "ref": "E"}
        ]"#,
    );
    Fixture { dir, columns, rows }
}

fn apply(f: &Fixture, script: &str, extra: &[&str]) -> Output {
    let script = write(f.dir.path(), "script.json", script);
    egrid()
        .arg("apply")
        .arg("--columns")
        .arg(&f.columns)
        .arg("--rows")
        .arg(&f.rows)
        .arg("--script")
        .arg(&script)
        .args(extra)
        .output()
        .expect("run egrid apply")
}

// ---------------------------------------------------------------------------
// apply
// ---------------------------------------------------------------------------

#[test]
fn apply_numeric_edit_commits_on_tab() {
    let f = fixture();
    let out = apply(
        &f,
        r#"[
            {"op": "double_activate", "row": 0, "column": "qty"},
            {"op": "input", "row": 0, "column": "qty", "text": "12"},
            {"op": "key", "key": "Tab"}
        ]"#,
        &[],
    );
    let json = stdout_json(&out);
    assert_eq!(json["rows"][0]["qty"], 12);
    assert_eq!(json["rows"][1]["qty"], 6);
    // SelectionChanged + CellChanged
    assert_eq!(json["events"], 2);
}

#[test]
fn apply_delete_selected_rows() {
    let f = fixture();
    let out = apply(
        &f,
        r#"[
            {"op": "select_rows", "rows": [3, 1]},
            {"op": "key", "key": "Delete"}
        ]"#,
        &[],
    );
    let json = stdout_json(&out);
    let names: Vec<&str> = json["rows"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["r0", "r2", "r4"]);
}

#[test]
fn apply_paste_from_clipboard_file() {
    let f = fixture();
    let clip = write(f.dir.path(), "clip.tsv", "x\t1,500\tTRUE\tZ\nw\t2\tfalse\n");
    let out = apply(
        &f,
        r#"[
            {"op": "select", "row": 3, "column": "name"},
            {"op": "key", "key": "ctrl+v"}
        ]"#,
        &["--clipboard", clip.to_str().unwrap()],
    );
    let json = stdout_json(&out);
    let rows = json["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[3]["name"], "x");
    assert_eq!(rows[3]["qty"], 1500);
    assert_eq!(rows[3]["paid"], true);
    assert_eq!(rows[3]["ref"], "D");
    assert_eq!(rows[4]["qty"], 2);
}

#[test]
fn apply_copy_then_undo() {
    let f = fixture();
    let out = apply(
        &f,
        r#"[
            {"op": "select", "row": 1, "column": "name"},
            {"op": "extend", "row": 2, "column": "qty"},
            {"op": "copy"},
            {"op": "toggle", "row": 0, "column": "paid"},
            {"op": "key", "key": "cmd+z"}
        ]"#,
        &[],
    );
    let json = stdout_json(&out);
    assert_eq!(json["clipboard"], "r1\t6\nr2\t7");
    assert_eq!(json["rows"][0]["paid"], false);
}

#[test]
fn apply_respects_settings_file() {
    let f = fixture();
    let settings = write(
        f.dir.path(),
        "settings.json",
        "// editing off\n{\"features.editing\": false}",
    );
    let out = apply(
        &f,
        r#"[
            {"op": "double_activate", "row": 0, "column": "name"},
            {"op": "input", "row": 0, "column": "name", "text": "nope"},
            {"op": "key", "key": "Enter"}
        ]"#,
        &["--settings", settings.to_str().unwrap()],
    );
    let json = stdout_json(&out);
    assert_eq!(json["rows"][0]["name"], "r0");
}

#[test]
fn apply_bad_key_is_usage_error() {
    let f = fixture();
    let out = apply(&f, r#"[{"op": "key", "key": "ctrl+pagedown"}]"#, &[]);
    assert_eq!(out.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&out.stderr).contains("hint:"));
}

#[test]
fn apply_missing_file_is_usage_error() {
    let f = fixture();
    let out = egrid()
        .args(["apply", "--columns"])
        .arg(&f.columns)
        .args(["--rows", "does-not-exist.json", "--script", "nope.json"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
}

#[test]
fn apply_malformed_rows_is_runtime_error() {
    let f = fixture();
    let rows = write(f.dir.path(), "bad_rows.json", "[1, 2]");
    let script = write(f.dir.path(), "empty.json", "[]");
    let out = egrid()
        .args(["apply", "--columns"])
        .arg(&f.columns)
        .arg("--rows")
        .arg(&rows)
        .arg("--script")
        .arg(&script)
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(1));
}

// ---------------------------------------------------------------------------
// window
// ---------------------------------------------------------------------------

#[test]
fn window_reports_overscanned_range() {
    let out = egrid()
        .args(["window", "--total", "1000", "--row-height", "20", "--scroll", "1000", "--viewport", "200"])
        .output()
        .unwrap();
    let json = stdout_json(&out);
    assert_eq!(json["start"], 45);
    assert_eq!(json["end"], 64);
    assert_eq!(json["rendered"], 20);
    assert_eq!(json["first_top"], 900.0);
    assert_eq!(json["spacer_height"], 20000.0);
}

#[test]
fn window_without_virtualization_renders_all() {
    let out = egrid()
        .args(["window", "--total", "50", "--row-height", "20", "--viewport", "200", "--no-virtualize"])
        .output()
        .unwrap();
    let json = stdout_json(&out);
    assert_eq!(json["rendered"], 50);
    assert_eq!(json["virtualized"], false);
}

#[test]
fn window_empty_grid() {
    let out = egrid()
        .args(["window", "--total", "0", "--row-height", "20", "--viewport", "200"])
        .output()
        .unwrap();
    let json = stdout_json(&out);
    assert_eq!(json["rendered"], 0);
    assert!(json["start"].is_null());
}

// ---------------------------------------------------------------------------
// export
// ---------------------------------------------------------------------------

#[test]
fn export_csv_to_stdout() {
    let f = fixture();
    let out = egrid()
        .args(["export", "--columns"])
        .arg(&f.columns)
        .arg("--rows")
        .arg(&f.rows)
        .args(["--select", "2,0"])
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(
        String::from_utf8_lossy(&out.stdout),
        "Name,Qty,Paid,Ref\nr0,5,false,A\nr2,7,true,C\n"
    );
}

#[test]
fn export_tsv_to_file() {
    let f = fixture();
    let dest = f.dir.path().join("out.tsv");
    let out = egrid()
        .args(["export", "--columns"])
        .arg(&f.columns)
        .arg("--rows")
        .arg(&f.rows)
        .args(["--select", "4", "--tsv", "-o"])
        .arg(&dest)
        .output()
        .unwrap();
    assert!(out.status.success());
    assert_eq!(fs::read_to_string(&dest).unwrap(), "Name\tQty\tPaid\tRef\nr4\t9\tfalse\tE\n");
}

#[test]
fn export_out_of_range_is_usage_error() {
    let f = fixture();
    let out = egrid()
        .args(["export", "--columns"])
        .arg(&f.columns)
        .arg("--rows")
        .arg(&f.rows)
        .args(["--select", "9"])
        .output()
        .unwrap();
    assert_eq!(out.status.code(), Some(2));
}
