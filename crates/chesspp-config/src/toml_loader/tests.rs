//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::ClientConfig;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_parse_error() {
    let result = load_from_path(Path::new("/tmp/nonexistent_chesspp_config.toml"));
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(matches!(err, chesspp_common::ConfigError::ParseError(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[server]
base_url = "ws://play.example.net:9000"

[invite]
countdown_secs = 10
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.server.base_url, "ws://play.example.net:9000");
    assert_eq!(config.invite.countdown_secs, 10);
    // Defaults preserved
    assert_eq!(config.transport.max_reconnect_attempts, 5);
    assert_eq!(config.room.countdown_secs, 3);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let result = load_from_path(&path);
    assert!(result.is_err());
    let err = result.unwrap_err();
    assert!(matches!(err, chesspp_common::ConfigError::ParseError(_)));
}

#[test]
fn default_template_parses_to_defaults() {
    let config: ClientConfig = toml::from_str(&default_config_toml()).unwrap();
    assert_eq!(config, ClientConfig::default());
}

#[test]
fn save_then_load_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = ClientConfig::default();
    config.transport.reconnect_delay_secs = 4;
    config.chat.max_messages_per_scope = 100;

    save_to_path(&config, &path).unwrap();
    let loaded = load_from_path(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn default_config_path_ends_with_expected_name() {
    let path = default_config_path().unwrap();
    assert!(path.ends_with("chesspp/config.toml"));
}
