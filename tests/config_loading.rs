//! Integration test: Configuration utilities
//!
//! Tests settings path resolution and YAML loading.

use std::env;
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use ws_listener::bin_common::{
    load_config_from_env, resolve_config_path, ListenerSettings, SettingsError, CONFIG_ENV_VAR,
    DEFAULT_CONFIG_PATH, DEFAULT_URL,
};

// Tests in this file share process environment variables
static ENV_LOCK: Mutex<()> = Mutex::new(());

fn lock_env() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_settings(yaml: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(yaml.as_bytes()).unwrap();
    file
}

#[test]
fn test_listener_config_default() {
    let _guard = lock_env();
    env::remove_var("WS_LISTENER_CONFIG");

    let config_path = load_config_from_env();
    assert_eq!(config_path.to_str().unwrap(), "config/ws_listener.yaml");
    assert_eq!(config_path.to_str().unwrap(), DEFAULT_CONFIG_PATH);
}

#[test]
fn test_listener_config_from_env() {
    let _guard = lock_env();
    env::set_var("WS_LISTENER_CONFIG", "/etc/ws/listener.yaml");

    let config_path = resolve_config_path(&[]);
    env::remove_var("WS_LISTENER_CONFIG");

    assert_eq!(config_path.to_str().unwrap(), "/etc/ws/listener.yaml");
}

#[test]
fn test_argument_beats_env() {
    let _guard = lock_env();
    env::set_var("WS_LISTENER_CONFIG", "/etc/ws/listener.yaml");

    let config_path = resolve_config_path(&["local.yaml".to_string()]);
    env::remove_var("WS_LISTENER_CONFIG");

    assert_eq!(config_path.to_str().unwrap(), "local.yaml");
}

#[test]
fn test_config_env_var_name() {
    assert_eq!(CONFIG_ENV_VAR, "WS_LISTENER_CONFIG");
}

#[test]
fn test_load_full_file() {
    let _guard = lock_env();
    env::remove_var("WS_LISTENER_URL");

    let file = write_settings(
        "url: wss://stream.example.com/feed\n\
         connect_timeout_secs: 4\n\
         reply_timeout_secs: 30\n\
         ping_timeout_secs: 2.5\n\
         retry_delay_secs: 1\n\
         log_level: debug\n",
    );

    let settings = ListenerSettings::load(file.path()).unwrap();
    assert_eq!(settings.url, "wss://stream.example.com/feed");
    assert_eq!(settings.log_level, "debug");

    let config = settings.to_listener_config().unwrap();
    assert_eq!(config.connect_timeout(), Duration::from_secs(4));
    assert_eq!(config.reply_timeout(), Duration::from_secs(30));
    assert_eq!(config.ping_timeout(), Duration::from_millis(2500));
    assert_eq!(config.retry_delay(), Duration::from_secs(1));
}

#[test]
fn test_missing_file_uses_defaults() {
    let _guard = lock_env();
    env::remove_var("WS_LISTENER_URL");

    let dir = tempfile::tempdir().unwrap();
    let settings = ListenerSettings::load(dir.path().join("absent.yaml")).unwrap();

    assert_eq!(settings, ListenerSettings::default());
    assert_eq!(settings.url, DEFAULT_URL);
}

#[test]
fn test_url_env_override() {
    let _guard = lock_env();
    env::set_var("WS_LISTENER_URL", "ws://10.0.0.5:9000/live");

    let file = write_settings("url: ws://127.0.0.1:8000/macro/sample/\n");
    let result = ListenerSettings::load(file.path());
    env::remove_var("WS_LISTENER_URL");

    assert_eq!(result.unwrap().url, "ws://10.0.0.5:9000/live");
}

#[test]
fn test_invalid_values_are_rejected() {
    let _guard = lock_env();
    env::remove_var("WS_LISTENER_URL");

    let file = write_settings("ping_timeout_secs: -1\n");
    let result = ListenerSettings::load(file.path());
    assert!(matches!(result, Err(SettingsError::ValidationError(_))));

    let file = write_settings("url: not a url\n");
    assert!(ListenerSettings::load(file.path()).is_err());
}

#[test]
fn test_malformed_yaml_is_reported() {
    let _guard = lock_env();
    env::remove_var("WS_LISTENER_URL");

    let file = write_settings("reply_timeout_secs: [1, 2\n");
    let result = ListenerSettings::load(file.path());
    assert!(matches!(result, Err(SettingsError::YamlError(_))));
}

#[test]
fn test_shipped_settings_file_is_valid() {
    let _guard = lock_env();
    env::remove_var("WS_LISTENER_URL");

    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/config/ws_listener.yaml");
    let settings = ListenerSettings::load(path).unwrap();
    assert_eq!(settings, ListenerSettings::default());
}
