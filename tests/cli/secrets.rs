//! Tests for `bullpen set/get/rm/list`.

use crate::support::*;

#[test]
fn test_set_and_get_roundtrip() {
    let t = Test::init();
    assert_roundtrip(&t, "app", "DATABASE_URL", "postgres://localhost/db");
}

#[test]
fn test_set_existing_key_updates() {
    let t = Test::with_secrets("app", &[("API_KEY", "old")]);

    let output = t.set("app", "API_KEY", "new");
    assert_success(&output);
    assert_stdout_contains(&output, "updated");

    let output = t.get("app", "API_KEY");
    assert_stdout_contains(&output, "new");
}

#[test]
fn test_categories_are_separate() {
    let t = Test::init();
    assert_success(
        &t.cmd()
            .args(["set", "PASSWORD", "db-pass", "-p", "app", "-c", "db"])
            .output()
            .unwrap(),
    );
    assert_success(
        &t.cmd()
            .args(["set", "PASSWORD", "smtp-pass", "-p", "app", "-c", "smtp"])
            .output()
            .unwrap(),
    );

    let output = t
        .cmd()
        .args(["get", "PASSWORD", "-p", "app", "-c", "smtp"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "smtp-pass");
}

#[test]
fn test_list_and_rm() {
    let t = Test::with_secrets("app", STANDARD_SECRETS);

    let output = t.list("app");
    assert_success(&output);
    for (key, _) in STANDARD_SECRETS {
        assert_stdout_contains(&output, key);
    }
    assert_stdout_excludes(&output, "postgres://");

    assert_success(&t.rm("app", "API_KEY"));
    assert_failure(&t.get("app", "API_KEY"));
    assert_failure(&t.rm("app", "API_KEY"));
}

#[test]
fn test_invalid_key_rejected() {
    let t = Test::init();

    assert_failure(&t.set("app", "123BAD", "value"));
    assert_failure(&t.set("app", "HAS-DASH", "value"));
}

#[test]
fn test_reserved_project_rejected() {
    let t = Test::init();

    let output = t
        .cmd()
        .args(["set", "X", "v", "-p", "_system", "-c", "rotation_policies"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "reserved");
}

#[test]
fn test_vault_file_never_contains_plaintext() {
    let t = Test::with_secrets("app", &[("TOKEN", "plaintext-marker-123")]);

    let raw = std::fs::read_to_string(t.dir.path().join("data/vault.age")).unwrap();
    assert!(!raw.contains("plaintext-marker-123"));
}
