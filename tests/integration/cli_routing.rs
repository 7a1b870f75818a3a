//! Integration tests for the CLI route table with scripted transports

use super::test_utils::{settings_in, ScriptedTransport};
use clap::Parser;
use registry_admin::cli::{Cli, RunContext};
use registry_admin::transport::{Method, Transport};
use registry_admin::ErrorKind;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;

fn run(context: &RunContext, args: &[&str]) -> registry_admin::Result<String> {
    let mut argv = vec!["registry-admin"];
    argv.extend_from_slice(args);
    let cli = Cli::try_parse_from(argv).unwrap();
    context.execute(&cli.command)
}

#[test]
fn test_fetched_registry_url_drives_admin_commands() {
    let temp_dir = TempDir::new().unwrap();
    let catalog = Arc::new(ScriptedTransport::new().on(
        Method::Get,
        "https://catalog.example.com/config.json",
        200,
        json!({"registryUrl": "https://registry.example.com"}),
    ));
    let registry = Arc::new(ScriptedTransport::new().on(
        Method::Get,
        "https://registry.example.com/api/roles",
        200,
        json!({"results": [{"id": "1234-1234", "name": "test", "arn": "asdf123"}]}),
    ));
    let context = RunContext::with_transports(
        settings_in(&temp_dir),
        Arc::clone(&catalog) as Arc<dyn Transport>,
        Arc::clone(&registry) as Arc<dyn Transport>,
    );

    let err = run(&context, &["roles", "list"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotConfigured);
    assert!(registry.seen().is_empty());

    let out = run(&context, &["config", "fetch"]).unwrap();
    assert!(out.contains("registryUrl"));

    let out = run(&context, &["roles", "list", "--format", "json"]).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["roles"][0]["id"], json!("1234-1234"));
    assert_eq!(catalog.seen().len(), 1);
}

#[test]
fn test_config_set_and_show_json() {
    let temp_dir = TempDir::new().unwrap();
    let transport = Arc::new(ScriptedTransport::new()) as Arc<dyn Transport>;
    let context =
        RunContext::with_transports(settings_in(&temp_dir), Arc::clone(&transport), transport);

    run(
        &context,
        &[
            "config",
            "set",
            "telemetry_disabled=true",
            "team=data-eng",
            "default_install_location=/home/me/data",
        ],
    )
    .unwrap();
    let out = run(&context, &["config", "show", "--format", "json"]).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["telemetry_disabled"], json!(true));
    assert_eq!(parsed["team"], json!("data-eng"));
    assert_eq!(parsed["default_install_location"], json!("/home/me/data"));

    let err = run(&context, &["config", "set", "telemetry_disabled=maybe"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfigValue);
}

#[test]
fn test_strict_settings_reject_unknown_keys() {
    let temp_dir = TempDir::new().unwrap();
    let mut settings = settings_in(&temp_dir);
    settings.strict_config = true;
    let transport = Arc::new(ScriptedTransport::new()) as Arc<dyn Transport>;
    let context = RunContext::with_transports(settings, Arc::clone(&transport), transport);

    let err = run(&context, &["config", "set", "team=data-eng"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownConfigKey);
    assert!(!temp_dir.path().join("config").join("config.yml").exists());
}

#[test]
fn test_settings_show_masks_credential() {
    let temp_dir = TempDir::new().unwrap();
    let mut settings = settings_in(&temp_dir);
    settings.credential = Some("super-secret-token".to_string());
    let transport = Arc::new(ScriptedTransport::new()) as Arc<dyn Transport>;
    let context = RunContext::with_transports(settings, Arc::clone(&transport), transport);

    let out = run(&context, &["settings", "show"]).unwrap();
    assert!(!out.contains("super-secret-token"));
    assert!(out.contains("********"));
}

#[test]
fn test_delete_with_yes_skips_prompt() {
    let temp_dir = TempDir::new().unwrap();
    let mut settings = settings_in(&temp_dir);
    settings.registry_url = Some("https://registry.example.com".to_string());
    let registry = Arc::new(ScriptedTransport::new().on_raw(
        Method::Delete,
        "https://registry.example.com/api/roles/1234-1234",
        200,
        "",
    ));
    let context = RunContext::with_transports(
        settings,
        Arc::new(ScriptedTransport::new()),
        Arc::clone(&registry) as Arc<dyn Transport>,
    );

    let out = run(&context, &["roles", "delete", "1234-1234", "--yes"]).unwrap();
    assert!(out.contains("Deleted role: 1234-1234"));
    assert_eq!(registry.seen().len(), 1);
}
