//! Integration tests for `cxflow config` command.
//!
//! Exercises validation and display against real TOML files.

use std::fs;

use cxflow_cli::cli::ConfigSection;
use cxflow_cli::commands::config::{show, validate};
use serial_test::serial;
use tempfile::TempDir;

#[tokio::test]
#[serial]
async fn test_config_validate_valid_toml() {
    // Given: A valid config file
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("cxflow.toml");
    fs::write(
        &config_path,
        r#"
[general]
log_level = "debug"
log_format = "json"

[scanner]
cli_path = "/opt/cx/cx"
scan_types = ["sast", "sca"]
"#,
    )
    .expect("should write config");

    // When: Validating
    let report = validate(&config_path).await;

    // Then: Valid, no errors
    assert!(report.valid, "valid config should pass: {:?}", report.errors);
    assert!(report.errors.is_empty());
}

#[tokio::test]
#[serial]
async fn test_config_validate_malformed_toml() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("bad.toml");
    fs::write(&config_path, "[general\nlog_level = \"info\"\n").expect("should write bad config");

    let report = validate(&config_path).await;

    assert!(!report.valid, "malformed TOML should fail");
    assert_eq!(report.errors.len(), 1);
}

#[tokio::test]
#[serial]
async fn test_config_validate_missing_file() {
    let report = validate(std::path::Path::new("/nonexistent/cxflow.toml")).await;
    assert!(!report.valid, "missing file should fail validation");
}

#[tokio::test]
#[serial]
async fn test_config_validate_enabled_email_without_recipient() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("cxflow.toml");
    fs::write(
        &config_path,
        r#"
[email]
enabled = true
sender = "scanner@example.com"
"#,
    )
    .expect("should write config");

    let report = validate(&config_path).await;

    assert!(!report.valid);
    assert!(
        report.errors[0].contains("recipient"),
        "error should name the field: {}",
        report.errors[0]
    );
}

#[tokio::test]
#[serial]
async fn test_config_show_full_uses_defaults_without_file() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("missing.toml");

    let report = show(&config_path, None).await.expect("should fall back to defaults");

    assert!(report.section.is_none());
    assert!(report.config_toml.contains("[scanner]"));
    assert!(report.config_toml.contains("/usr/local/bin/cx"));
    assert!(report.config_toml.contains("CXFLOW_EMAIL_PASSWORD"));
}

#[tokio::test]
#[serial]
async fn test_config_show_section_reflects_file_and_env() {
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("cxflow.toml");
    fs::write(
        &config_path,
        r#"
[reports]
json_output_name = "from-file"
sarif_output_name = "from-file"
"#,
    )
    .expect("should write config");

    // SAFETY: #[serial] keeps env-mutating tests from running concurrently.
    unsafe { std::env::set_var("CXFLOW_REPORTS_SARIF_OUTPUT_NAME", "from-env") };
    let result = show(&config_path, Some(ConfigSection::Reports)).await;
    unsafe { std::env::remove_var("CXFLOW_REPORTS_SARIF_OUTPUT_NAME") };

    let report = result.expect("should load");
    assert_eq!(report.section.as_deref(), Some("reports"));
    assert!(report.config_toml.contains("json_output_name = \"from-file\""));
    assert!(report.config_toml.contains("sarif_output_name = \"from-env\""));
    assert!(!report.config_toml.contains("cli_path"));
}
