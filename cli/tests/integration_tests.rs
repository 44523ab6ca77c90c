use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};

/// Helper to create a temp directory that is cleaned up on drop.
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(name: &str) -> Self {
        let path =
            std::env::temp_dir().join(format!("form_flatten_cli_test_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&path);
        fs::create_dir_all(&path).expect("failed to create temp dir");
        Self { path }
    }

    fn path(&self) -> &PathBuf {
        &self.path
    }

    fn join(&self, name: &str) -> PathBuf {
        self.path.join(name)
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn csv_quote(raw: &str) -> String {
    format!("\"{}\"", raw.replace('"', "\"\""))
}

/// Export with one answered row and one row whose payload is not JSON.
fn write_export(dir: &TempDir, name: &str) -> PathBuf {
    let payload = serde_json::json!([{
        "questions": [
            {"type": "Statement", "title": "Welcome"},
            {"type": "Short answer", "title": "Reason", "answerText": "Knee pain"},
            {"type": "Signature", "title": "Signature", "signature": ""}
        ]
    }]);
    let csv = format!(
        "\u{feff}Client Name,Title,Json\nJane,Intake,{}\nJohn,Intake,not json\n",
        csv_quote(&payload.to_string())
    );
    let path = dir.join(name);
    fs::write(&path, csv).expect("failed to write export");
    path
}

fn run_in(dir: &TempDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_form-flatten"))
        .args(args)
        .current_dir(dir.path())
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run form-flatten")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

// ---------------------------------------------------------------------------
// flatten
// ---------------------------------------------------------------------------

#[test]
fn flatten_uses_default_paths_without_config() {
    let dir = TempDir::new("defaults");
    write_export(&dir, "splose_export.csv");

    let output = run_in(&dir, &["flatten"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("Done. Wrote: splose_flattened.csv"), "{out}");
    assert!(
        out.contains("Detected columns: title_col=\"Title\", date_col=none, payload_col=\"Json\""),
        "{out}"
    );

    let written = fs::read_to_string(dir.join("splose_flattened.csv")).unwrap();
    assert_eq!(
        written,
        "Client Name,Title,Reason,Signature\r\n\
         Jane,Intake,Knee pain,not signed\r\n\
         John,Intake,(N/A),(N/A)\r\n"
    );
}

#[test]
fn flatten_reads_config_json_from_working_directory() {
    let dir = TempDir::new("config_json");
    write_export(&dir, "export.csv");
    fs::write(
        dir.join("config.json"),
        r#"{"input_csv": "export.csv", "output_csv": "flat.csv", "meta_cols": ["Client Name"]}"#,
    )
    .unwrap();

    let output = run_in(&dir, &["flatten"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let written = fs::read_to_string(dir.join("flat.csv")).unwrap();
    assert!(written.starts_with("Client Name,Reason,Signature\r\n"), "{written}");
}

#[test]
fn flatten_cli_paths_override_yaml_config() {
    let dir = TempDir::new("yaml_override");
    write_export(&dir, "other.csv");
    fs::write(
        dir.join("settings.yaml"),
        "input_csv: missing.csv\noutput_csv: ignored.csv\nform_titles:\n  - Intake\n",
    )
    .unwrap();

    let output = run_in(
        &dir,
        &[
            "flatten",
            "--config",
            "settings.yaml",
            "--input",
            "other.csv",
            "--output",
            "result.csv",
        ],
    );
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(dir.join("result.csv").exists());
    assert!(!dir.join("ignored.csv").exists());
}

#[test]
fn flatten_writes_report_file() {
    let dir = TempDir::new("report");
    write_export(&dir, "splose_export.csv");

    let output = run_in(&dir, &["flatten", "--report", "report.json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.join("report.json")).unwrap()).unwrap();
    assert_eq!(report["payload_col"], "Json");
    assert_eq!(report["rows_written"], 2);
    assert_eq!(report["rows_without_payload"], 1);
    assert_eq!(
        report["question_columns"],
        serde_json::json!(["Reason", "Signature"])
    );
}

#[test]
fn flatten_fails_without_payload_column() {
    let dir = TempDir::new("no_payload");
    fs::write(dir.join("splose_export.csv"), "Client Name,Notes\nJane,hello\n").unwrap();

    let output = run_in(&dir, &["flatten"]);
    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("error: "), "{err}");
    assert!(err.contains("payload_col"), "{err}");
    assert!(!dir.join("splose_flattened.csv").exists());
}

#[test]
fn flatten_fails_on_missing_explicit_config() {
    let dir = TempDir::new("missing_config");
    let output = run_in(&dir, &["flatten", "--config", "nope.json"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("nope.json"));
}

#[test]
fn flatten_fails_on_missing_input() {
    let dir = TempDir::new("missing_input");
    let output = run_in(&dir, &["flatten"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).starts_with("error: "));
}

// ---------------------------------------------------------------------------
// columns
// ---------------------------------------------------------------------------

#[test]
fn columns_prints_text_summary() {
    let dir = TempDir::new("columns_text");
    write_export(&dir, "splose_export.csv");

    let output = run_in(&dir, &["columns"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let out = stdout(&output);
    assert!(out.contains("payload_col=\"Json\""), "{out}");
    assert!(out.contains("Question columns (2):"), "{out}");
    assert!(out.contains("1. Reason"), "{out}");
    assert!(!dir.join("splose_flattened.csv").exists());
}

#[test]
fn columns_prints_json() {
    let dir = TempDir::new("columns_json");
    write_export(&dir, "input.csv");

    let output = run_in(&dir, &["columns", "--input", "input.csv", "--format", "json"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["title_col"], "Title");
    assert!(report["date_col"].is_null());
    assert!(report.get("rows_written").is_none());
}

#[test]
fn verbose_flag_enables_info_logs() {
    let dir = TempDir::new("verbose");
    write_export(&dir, "splose_export.csv");

    let output = run_in(&dir, &["-v", "flatten"]);
    assert!(output.status.success());
    assert!(stderr(&output).contains("Column discovery finished"));

    let quiet = run_in(&dir, &["flatten"]);
    assert!(!stderr(&quiet).contains("Column discovery finished"));
}
