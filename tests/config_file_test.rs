//! Configuration file loading tests.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use upwork_api::api::GrantType;
use upwork_api::{Config, ConfigError};

fn write_config(contents: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("temporary directory");
    let path = dir.path().join("config.json");
    fs::write(&path, contents).expect("config written");
    (dir, path)
}

#[test]
fn test_reads_complete_file() {
    let (_dir, path) = write_config(
        r#"{
            "client_id": "consumerkey",
            "client_secret": "consumersecret",
            "redirect_uri": "https://a.callback.url",
            "access_token": "accesstoken",
            "refresh_token": "refreshtoken",
            "expires_in": "86399",
            "expires_at": "2030-01-01T01:00:00.000Z",
            "debug": "on"
        }"#,
    );

    let config = Config::read(&path).expect("valid config");

    assert_eq!(config.client_id, "consumerkey");
    assert_eq!(config.client_secret, "consumersecret");
    assert_eq!(config.redirect_uri.as_deref(), Some("https://a.callback.url"));
    assert_eq!(config.access_token.as_deref(), Some("accesstoken"));
    assert_eq!(config.refresh_token.as_deref(), Some("refreshtoken"));
    assert_eq!(config.expires_in.as_deref(), Some("86399"));
    assert!(config.expires_at.is_some());
    assert_eq!(config.grant_type, GrantType::AuthorizationCode);
    assert!(config.debug);
}

#[test]
fn test_missing_secret() {
    let (_dir, path) = write_config(
        r#"{"client_id": "consumerkey", "redirect_uri": "https://a.callback.url"}"#,
    );

    assert!(matches!(
        Config::read(&path),
        Err(ConfigError::MissingKey { key: "client_secret" })
    ));
}

#[test]
fn test_redirect_uri_required_for_authorization_code() {
    let (_dir, path) = write_config(r#"{"client_id": "consumerkey", "client_secret": "s"}"#);

    assert!(matches!(
        Config::read(&path),
        Err(ConfigError::MissingKey { key: "redirect_uri" })
    ));
}

#[test]
fn test_client_credentials_needs_no_redirect_uri() {
    let (_dir, path) = write_config(
        r#"{"client_id": "consumerkey", "client_secret": "s", "grant_type": "client_credentials"}"#,
    );

    let config = Config::read(&path).expect("valid config");
    assert_eq!(config.grant_type, GrantType::ClientCredentials);
    assert_eq!(config.redirect_uri, None);
}

#[test]
fn test_values_must_be_strings() {
    let (_dir, path) = write_config(
        r#"{
            "client_id": "consumerkey",
            "client_secret": "s",
            "redirect_uri": "r",
            "expires_in": 86399
        }"#,
    );

    match Config::read(&path) {
        Err(ConfigError::NotAString { key }) => assert_eq!(key, "expires_in"),
        other => panic!("expected a type error, got {other:?}"),
    }
}

#[test]
fn test_malformed_json() {
    let (_dir, path) = write_config(r#"{"client_id": "consumerkey","#);

    assert!(matches!(Config::read(&path), Err(ConfigError::Parse { .. })));
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().expect("temporary directory");

    assert!(matches!(
        Config::read(dir.path().join("absent.json")),
        Err(ConfigError::Read { .. })
    ));
}
