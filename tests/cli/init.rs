//! Tests for `bullpen init`.

use crate::support::*;
use std::fs;

#[test]
fn test_init_creates_vault_and_key() {
    let t = Test::new();

    let output = t.init_cmd();
    assert_success(&output);
    assert_stdout_contains(&output, "initialized");

    let vault = t.dir.path().join("data/vault.age");
    let key = t.dir.path().join("keys/identity.key");
    assert!(vault.exists(), "vault file should exist");
    assert!(key.exists(), "identity key should exist");

    let contents = fs::read_to_string(vault).unwrap();
    assert!(contents.contains("BEGIN AGE ENCRYPTED FILE"));
}

#[cfg(unix)]
#[test]
fn test_init_files_are_private() {
    use std::os::unix::fs::PermissionsExt;

    let t = Test::init();
    for path in ["data/vault.age", "keys/identity.key"] {
        let mode = fs::metadata(t.dir.path().join(path))
            .unwrap()
            .permissions()
            .mode()
            & 0o777;
        assert_eq!(mode, 0o600, "{} should be 0600", path);
    }
}

#[test]
fn test_init_twice_fails() {
    let t = Test::init();

    let output = t.init_cmd();
    assert_failure(&output);
    assert_stderr_contains(&output, "already initialized");
}

#[test]
fn test_config_env_var_is_honored() {
    let t = Test::new();
    let alt = t.write(
        "alt.toml",
        "[vault]\npath = \"elsewhere/vault.age\"\nidentity = \"elsewhere/id.key\"\n",
    );

    let output = t
        .cmd()
        .env("BULLPEN_CONFIG", &alt)
        .arg("init")
        .output()
        .unwrap();
    assert_success(&output);
    assert!(t.dir.path().join("elsewhere/vault.age").exists());
    assert!(!t.dir.path().join("data/vault.age").exists());
}
