//! Configuration loading

use std::io::Write;

use assert_matches::assert_matches;
use pretty_assertions::assert_eq;
use roomchat::egui_app::Config;
use roomchat::shared::config::{ENV_ANON_KEY, ENV_BACKEND_URL};
use roomchat::shared::{AppConfig, ConfigError};
use serial_test::serial;

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
#[serial]
fn test_load_from_file() {
    let file = config_file(
        r#"
        page_size = 25
        cooldown_secs = 5
        max_message_chars = 140
        realtime_topic = "lobby"
        request_timeout_secs = 30
        "#,
    );
    let config = AppConfig::load(Some(file.path())).unwrap();
    assert_eq!(config.page_size, 25);
    assert_eq!(config.cooldown_secs, 5);
    assert_eq!(config.max_message_chars, 140);
    assert_eq!(config.realtime_topic, "lobby");
    assert_eq!(config.request_timeout_secs, 30);
    assert_eq!(config.table, "chat");
}

#[test]
#[serial]
fn test_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config.page_size, 50);
    assert_eq!(config.cooldown_secs, 3);
    assert_eq!(config.max_message_chars, 255);
}

#[test]
#[serial]
fn test_invalid_file_is_an_error() {
    let file = config_file("page_size = \"fifty\"");
    assert_matches!(AppConfig::load(Some(file.path())), Err(ConfigError::Parse(_)));

    let file = config_file("page_size = 0");
    assert_matches!(AppConfig::load(Some(file.path())), Err(ConfigError::InvalidValue(_)));
}

#[test]
#[serial]
fn test_environment_overrides_file() {
    let file = config_file(
        r#"
        backend_url = "https://from-file.example.co"
        anon_key = "file-key"
        "#,
    );
    std::env::set_var(ENV_BACKEND_URL, "https://from-env.example.co");
    std::env::set_var(ENV_ANON_KEY, "env-key");
    let loaded = AppConfig::load(Some(file.path()));
    std::env::remove_var(ENV_BACKEND_URL);
    std::env::remove_var(ENV_ANON_KEY);

    let config = loaded.unwrap();
    assert_eq!(config.backend_url.as_str(), "https://from-env.example.co/");
    assert_eq!(config.anon_key, "env-key");
}

#[test]
fn test_session_token_wrapper() {
    let mut config = Config::with_builder(
        AppConfig::builder()
            .backend_url("https://abc.example.co")
            .anon_key("anon"),
    )
    .unwrap();
    assert_eq!(config.bearer(), "anon");
    assert_eq!(config.api_url("/rest/v1/chat"), "https://abc.example.co/rest/v1/chat");

    config.set_token(Some("jwt".to_string()));
    assert_eq!(config.bearer(), "jwt");
    config.clear_token();
    assert_eq!(config.get_token(), None);
}
