//! End-to-end tests for the appstate binary

mod common;

use anyhow::Result;
use serde_json::Value;
use std::fs;
use std::time::Duration;
use tempfile::TempDir;

fn state_doc(dir: &TempDir) -> Value {
    let text = fs::read_to_string(dir.path().join("state.json")).unwrap();
    serde_json::from_str(&text).unwrap()
}

#[test]
fn test_set_is_persisted_before_exit() -> Result<()> {
    let dir = TempDir::new()?;

    let result = appstate!(dir.path(), "set", "LargePasteWarningDismissed", "true").assert_success()?;
    assert!(result.contains_stdout("LargePasteWarningDismissed"));

    // The debounce interval is one second, but the process flushes on exit
    assert!(result.duration < Duration::from_secs(5));
    assert_eq!(state_doc(&dir)["largePasteWarningDismissed"], Value::Bool(true));

    let result = appstate!(dir.path(), "get", "largePasteWarningDismissed").assert_success()?;
    assert_eq!(result.stdout.trim(), "true");
    Ok(())
}

#[test]
fn test_set_reports_failed_write() -> Result<()> {
    let dir = TempDir::new()?;
    // A directory where the state file belongs makes every write fail
    fs::create_dir(dir.path().join("state.json"))?;

    let result = appstate!(dir.path(), "set", "LargePasteWarningDismissed", "true").assert_failure()?;
    assert!(!result.contains_stdout("✓"));
    assert!(result.stderr.contains("Failed to save"));

    let result = appstate!(dir.path(), "reset", "LargePasteWarningDismissed").assert_failure()?;
    assert!(!result.contains_stdout("✓"));
    Ok(())
}

#[test]
fn test_get_defaults_without_file() -> Result<()> {
    let dir = TempDir::new()?;

    let result = appstate!(dir.path(), "get", "closeAllTabsWarningDismissed").assert_success()?;
    assert_eq!(result.stdout.trim(), "false");
    assert!(!dir.path().join("state.json").exists());
    Ok(())
}

#[test]
fn test_list_and_reset() -> Result<()> {
    let dir = TempDir::new()?;

    appstate!(dir.path(), "set", "MultiLinePasteWarningDismissed", "true").assert_success()?;

    let result = appstate!(dir.path(), "list").assert_success()?;
    assert!(result.contains_stdout("CloseAllTabsWarningDismissed"));
    assert!(result.contains_stdout("MultiLinePasteWarningDismissed"));
    assert!(result.contains_stdout("default: false"));

    appstate!(dir.path(), "reset", "MultiLinePasteWarningDismissed").assert_success()?;
    assert_eq!(state_doc(&dir)["multiLinePasteWarningDismissed"], Value::Bool(false));
    Ok(())
}

#[test]
fn test_rejects_unknown_attribute_and_bad_type() -> Result<()> {
    let dir = TempDir::new()?;

    let result = appstate!(dir.path(), "get", "NoSuchThing").assert_failure()?;
    assert!(result.contains_stderr("Unknown attribute"));

    let result = appstate!(dir.path(), "set", "LargePasteWarningDismissed", "sometimes").assert_failure()?;
    assert!(result.contains_stderr("Invalid value"));
    assert!(!dir.path().join("state.json").exists());
    Ok(())
}

#[test]
fn test_corrupt_state_file_is_tolerated() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("state.json"), "{ not json")?;

    let result = appstate!(dir.path(), "get", "LargePasteWarningDismissed").assert_success()?;
    assert_eq!(result.stdout.trim(), "false");

    appstate!(dir.path(), "set", "LargePasteWarningDismissed", "true").assert_success()?;
    assert_eq!(state_doc(&dir)["largePasteWarningDismissed"], Value::Bool(true));
    Ok(())
}

#[test]
fn test_config_file_name_and_path() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(
        dir.path().join("config.toml"),
        "[store]\nflush_interval_ms = 50\nfile_name = \"custom.json\"\n",
    )?;

    let result = appstate!(dir.path(), "path").assert_success()?;
    assert!(result.stdout.trim().ends_with("custom.json"));

    appstate!(dir.path(), "set", "CloseAllTabsWarningDismissed", "true").assert_success()?;
    assert!(dir.path().join("custom.json").exists());

    let result = appstate!(dir.path(), "config", "show").assert_success()?;
    assert!(result.contains_stdout("custom.json"));
    Ok(())
}

#[test]
fn test_invalid_config_is_reported() -> Result<()> {
    let dir = TempDir::new()?;
    fs::write(dir.path().join("config.toml"), "[store]\nflush_interval_ms = 1\n")?;

    let result = appstate!(dir.path(), "list").assert_failure()?;
    assert!(result.contains_stderr("flush_interval_ms"));
    Ok(())
}

#[test]
fn test_config_init_and_example() -> Result<()> {
    let dir = TempDir::new()?;

    appstate!(dir.path(), "config", "init").assert_success()?;
    assert!(dir.path().join("config.toml").exists());

    let result = appstate!(dir.path(), "config", "init").assert_success()?;
    assert!(result.contains_stdout("already exists"));

    let result = appstate!(dir.path(), "config", "example").assert_success()?;
    assert!(result.contains_stdout("flush_interval_ms = 1000"));
    Ok(())
}

#[test]
fn test_config_show_lists_valid_range() -> Result<()> {
    let dir = TempDir::new()?;

    let result = appstate!(dir.path(), "config", "show").assert_success()?;
    assert!(result.contains_stdout("flush_interval_ms: 10-60000"));
    Ok(())
}
