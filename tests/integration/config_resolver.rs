//! Integration tests for the config resolver against the filesystem store

use super::test_utils::{settings_in, ScriptedTransport};
use registry_admin::config::{keys, ConfigResolver, ResolverConfig};
use registry_admin::store::FileStore;
use registry_admin::transport::Method;
use registry_admin::ErrorKind;
use serde_json::{json, Value};
use tempfile::TempDir;

fn resolver<'a>(
    transport: &'a ScriptedTransport,
    temp_dir: &TempDir,
) -> ConfigResolver<&'a ScriptedTransport, FileStore> {
    let config = ResolverConfig::from_settings(&settings_in(temp_dir)).unwrap();
    ConfigResolver::new(transport, FileStore::new(), config)
}

#[test]
fn test_configure_persists_reconciled_yaml() {
    let temp_dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new().on(
        Method::Get,
        "https://foo.bar/config.json",
        200,
        json!({
            "registryUrl": "https://registry.foo.bar",
            "alpha": 1,
            "telemetry_disabled": true
        }),
    );
    let resolver = resolver(&transport, &temp_dir);

    let document = resolver.configure(Some("foo.bar")).unwrap();
    assert_eq!(document.navigator_url(), Some("https://foo.bar"));
    assert_eq!(document.registry_url(), Some("https://registry.foo.bar"));
    assert!(document.telemetry_disabled());

    let keys_in_order: Vec<&str> = document.keys().collect();
    assert_eq!(
        keys_in_order,
        vec![
            keys::NAVIGATOR_URL,
            keys::ELASTIC_SEARCH_URL,
            keys::DEFAULT_LOCAL_REGISTRY,
            keys::DEFAULT_REMOTE_REGISTRY,
            keys::DEFAULT_INSTALL_LOCATION,
            keys::REGISTRY_URL,
            keys::TELEMETRY_DISABLED,
            "alpha",
        ]
    );

    let path = temp_dir.path().join("config").join("config.yml");
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(text.starts_with("# registry-admin configuration file"));
    assert!(text.contains("registryUrl: https://registry.foo.bar"));
    assert!(text.contains("default_remote_registry: null"));
    assert!(text.contains("elastic_search_url: null"));

    assert_eq!(resolver.load().unwrap(), document);
}

#[test]
fn test_failed_fetch_leaves_existing_file_untouched() {
    let temp_dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new()
        .on(
            Method::Get,
            "https://catalog.example.com/config.json",
            200,
            json!({"registryUrl": "https://registry.example.com"}),
        )
        .on_raw(
            Method::Get,
            "https://broken.example.com/config.json",
            500,
            "upstream exploded",
        );
    let resolver = resolver(&transport, &temp_dir);
    resolver.configure(None).unwrap();

    let path = temp_dir.path().join("config").join("config.yml");
    let before = std::fs::read(&path).unwrap();

    let err = resolver
        .configure(Some("https://broken.example.com"))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigFetch);
    assert!(err.to_string().contains("500"));
    assert!(err.to_string().contains("upstream exploded"));

    let err = resolver.configure(Some("unreachable.example.com")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigFetch);

    let err = resolver.configure(Some("foo.bar:99999")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfigSource);

    assert_eq!(std::fs::read(&path).unwrap(), before);
    assert_eq!(transport.seen().len(), 3);
}

#[test]
fn test_load_without_file_is_template() {
    let temp_dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let resolver = resolver(&transport, &temp_dir);

    let document = resolver.load().unwrap();
    assert_eq!(&document, &resolver.config().template);
    assert!(document.navigator_url().is_none());
    assert!(!temp_dir.path().join("config").exists());
    assert!(transport.seen().is_empty());
}

#[test]
fn test_set_then_reset() {
    let temp_dir = TempDir::new().unwrap();
    let transport = ScriptedTransport::new();
    let resolver = resolver(&transport, &temp_dir);

    let document = resolver
        .set(vec![
            (keys::DEFAULT_REMOTE_REGISTRY, json!("s3://bucket")),
            (keys::TELEMETRY_DISABLED, json!(true)),
        ])
        .unwrap();
    assert_eq!(document.default_remote_registry(), Some("s3://bucket"));
    assert_eq!(resolver.load().unwrap(), document);

    let err = resolver
        .set(vec![(keys::REGISTRY_URL, json!("ftp://registry"))])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidConfigValue);
    assert_eq!(resolver.load().unwrap(), document);

    let reset = resolver.reset().unwrap();
    assert_eq!(reset.get(keys::DEFAULT_REMOTE_REGISTRY), Some(&Value::Null));
    assert_eq!(resolver.load().unwrap(), reset);
}

#[test]
fn test_hand_edited_file_keeps_unknown_keys() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config").join("config.yml");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(
        &path,
        "# edited by hand\nnavigator_url: https://catalog.internal\nteam: data-eng\n",
    )
    .unwrap();

    let transport = ScriptedTransport::new();
    let document = resolver(&transport, &temp_dir).load().unwrap();
    assert_eq!(document.navigator_url(), Some("https://catalog.internal"));
    assert_eq!(document.get("team"), Some(&json!("data-eng")));
    assert!(document.contains_key(keys::DEFAULT_LOCAL_REGISTRY));
}
