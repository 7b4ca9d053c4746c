//! End-to-end runs of the filesettings binary.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Run the binary against `workspace` with HOME/XDG isolated under `temp_dir`
fn run(temp_dir: &TempDir, workspace: &Path, args: &[&str]) -> Output {
    let config_home = temp_dir.path().join("config");
    let home = temp_dir.path().join("home");
    fs::create_dir_all(&config_home).unwrap();
    fs::create_dir_all(&home).unwrap();

    let bin = env!("CARGO_BIN_EXE_filesettings");
    Command::new(bin)
        .env("XDG_CONFIG_HOME", config_home.as_os_str())
        .env("HOME", home.as_os_str())
        .env_remove("FILESETTINGS_LOG")
        .env_remove("FILESETTINGS_ENV")
        .arg("--workspace")
        .arg(workspace)
        .args(args)
        .output()
        .unwrap()
}

fn workspace_with_editorconfig(temp_dir: &TempDir) -> std::path::PathBuf {
    let workspace = temp_dir.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();
    fs::write(
        workspace.join(".editorconfig"),
        "root = true\n\n[*.py]\nindent_size = 2\ncharset = utf-8\n",
    )
    .unwrap();
    workspace
}

#[test]
fn test_resolve_json_layers_editorconfig_over_language_store() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = workspace_with_editorconfig(&temp_dir);

    let output = run(&temp_dir, &workspace, &["resolve", "app.py", "--format", "json"]);
    assert!(
        output.status.success(),
        "resolve should succeed: stderr={:?}",
        String::from_utf8_lossy(&output.stderr)
    );

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["language"], "python3");
    assert_eq!(value["settings"]["indent-width"], 2);
    assert_eq!(value["settings"]["right-margin-position"], 79);
    assert_eq!(value["settings"]["encoding"], "utf-8");
}

#[test]
fn test_no_editorconfig_flag() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = workspace_with_editorconfig(&temp_dir);

    let output = run(
        &temp_dir,
        &workspace,
        &["--no-editorconfig", "resolve", "app.py", "--format", "json"],
    );
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["settings"]["indent-width"], 4);
    assert_eq!(value["settings"]["encoding"], serde_json::Value::Null);
}

#[test]
fn test_explain_shows_sources() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = workspace_with_editorconfig(&temp_dir);

    let output = run(&temp_dir, &workspace, &["explain", "app.py"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("editorconfig"));
    assert!(stdout.contains("language-settings"));
    assert!(stdout.contains("default"));
}

#[test]
fn test_properties_lists_table() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("ws");
    fs::create_dir_all(&workspace).unwrap();

    let output = run(&temp_dir, &workspace, &["properties", "--format", "json"]);
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["total"], 9);
}

#[test]
fn test_validate_fails_on_bad_language_entry() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = temp_dir.path().join("ws");
    fs::create_dir_all(workspace.join(".filesettings")).unwrap();
    fs::write(
        workspace.join(".filesettings").join("config.toml"),
        "[languages.rust]\nindent_width = \"wide\"\n",
    )
    .unwrap();

    let output = run(&temp_dir, &workspace, &["validate"]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Language 'rust'"),
        "stderr should name the language: {}",
        stderr
    );
}

#[test]
fn test_logs_stay_off_stdout() {
    let temp_dir = TempDir::new().unwrap();
    let workspace = workspace_with_editorconfig(&temp_dir);

    let output = run(
        &temp_dir,
        &workspace,
        &["--verbose", "resolve", "app.py", "--format", "json"],
    );
    assert!(output.status.success());

    serde_json::from_slice::<serde_json::Value>(&output.stdout)
        .expect("stdout should hold only the JSON document");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("filesettings CLI starting"));
}
