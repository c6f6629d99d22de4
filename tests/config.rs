//! Config loading and validation tests.
//!
//! These tests verify that malformed or invalid config files are rejected
//! with clear errors and that relative paths follow the config file.

mod support;

use bullpen::core::app::App;
use bullpen::core::config::Config;
use bullpen::core::domain::{PolicyDraft, RotationInterval, SecretEntry};
use bullpen::core::store::{DocumentStore, EncryptedFile, Identity};
use bullpen::error::{ConfigError, Error};
use support::*;
use tempfile::TempDir;

fn write_config(dir: &TempDir, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join("bullpen.toml");
    std::fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_load_malformed_toml() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[vault\npath = ");

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, Error::Config(ConfigError::ReadFile { .. })));
}

#[test]
fn test_relative_paths_resolve_against_config_dir() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, TEST_CONFIG);

    let config = Config::load(&path).unwrap();
    assert_eq!(config.vault.path, dir.path().join("data/vault.age"));
    assert_eq!(
        config.identity_path().unwrap(),
        dir.path().join("keys/identity.key")
    );
}

#[test]
fn test_home_relative_identity_expands() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "[vault]\npath = \"data/vault.age\"\nidentity = \"~/.bullpen/identity.key\"\n",
    );

    let config = Config::load(&path).unwrap();
    let home = dirs::home_dir().unwrap();
    assert_eq!(
        config.identity_path().unwrap(),
        home.join(".bullpen/identity.key")
    );
    assert_eq!(config.vault.path, dir.path().join("data/vault.age"));
}

#[test]
fn test_invalid_default_interval_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[rotation]\ndefault_interval = \"FORTNIGHTLY\"\n");

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "rotation.default_interval",
            ..
        })
    ));
}

#[test]
fn test_custom_default_interval_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[rotation]\ndefault_interval = \"CUSTOM\"\n");

    assert!(Config::load(&path).is_err());
}

#[test]
fn test_zero_default_length_rejected() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "[rotation]\ndefault_length = 0\n");

    let err = Config::load(&path).unwrap_err();
    assert!(matches!(
        err,
        Error::Config(ConfigError::InvalidValue {
            field: "rotation.default_length",
            ..
        })
    ));
}

#[test]
fn test_config_save_then_load() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, TEST_CONFIG);
    let config = Config::load(&path).unwrap();

    let copy = dir.path().join("copy.toml");
    config.save(&copy).unwrap();
    let reloaded = Config::load(&copy).unwrap();

    assert_eq!(reloaded.vault.path, config.vault.path);
    assert_eq!(reloaded.rotation.default_interval, "MONTHLY");
    assert_eq!(reloaded.rotation.default_length, 32);
}

#[test]
fn test_open_before_init_is_not_initialized() {
    let dir = TempDir::new().unwrap();
    let config = Config::load(&write_config(&dir, TEST_CONFIG)).unwrap();

    let err = App::open(&config).err().unwrap();
    assert!(matches!(err, Error::Config(ConfigError::NotInitialized)));
}

#[test]
fn test_init_twice_fails() {
    let dir = TempDir::new().unwrap();
    let config = Config::load(&write_config(&dir, TEST_CONFIG)).unwrap();

    App::init(&config).unwrap();
    let err = App::init(&config).err().unwrap();
    assert!(matches!(
        err,
        Error::Config(ConfigError::AlreadyInitialized(_))
    ));
}

#[test]
fn test_configured_defaults_apply_to_new_policies() {
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "[vault]\npath = \"vault.age\"\nidentity = \"identity.key\"\n\n\
         [rotation]\ndefault_interval = \"WEEKLY\"\ndefault_length = 48\n",
    );
    let config = Config::load(&path).unwrap();
    App::init(&config).unwrap();

    let mut app = App::open(&config).unwrap();
    app.set_secret("app", SecretEntry::new("API_KEY", "v")).unwrap();
    let policy = app
        .save_policy(&PolicyDraft::for_secret("API_KEY", "app"))
        .unwrap();

    assert_eq!(policy.rotation_interval, RotationInterval::Weekly);
    app.rotate_by_id(&policy.policy_id).unwrap();

    let reopened = App::open(&config).unwrap();
    let secret = reopened.vault().find_secret("app", "default", "API_KEY").unwrap();
    assert_eq!(secret.value.len(), 48);
}

#[test]
fn test_extra_recipient_can_open_vault() {
    let dir = TempDir::new().unwrap();
    let backup_path = dir.path().join("backup.key");
    let backup = Identity::generate(&backup_path).unwrap();

    let config_text = format!(
        "{}recipients = [\"{}\"]\n",
        "[vault]\npath = \"vault.age\"\nidentity = \"identity.key\"\n",
        backup.public_key()
    );
    let config = Config::load(&write_config(&dir, &config_text)).unwrap();
    let mut app = App::init(&config).unwrap();
    app.set_secret("app", SecretEntry::new("API_KEY", "v")).unwrap();

    let store = EncryptedFile::new(&config.vault.path, Identity::load(&backup_path).unwrap());
    let document = store.load().unwrap().unwrap();
    assert_eq!(document.entry_count(), 1);
}
