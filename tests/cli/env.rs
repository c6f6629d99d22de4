//! Tests for `bullpen import/export`.

use crate::support::*;

#[test]
fn test_import_then_export() {
    let t = Test::init();
    let path = t.write(".env", SAMPLE_ENV);

    let output = t.import("app", &path.to_string_lossy(), false);
    assert_success(&output);
    assert_stdout_contains(&output, "imported 3 secrets");

    let output = t.export("app");
    assert_success(&output);
    assert_eq!(stdout(&output), SAMPLE_ENV);
}

#[test]
fn test_import_complex_env() {
    let t = Test::init();
    let path = t.write(".env", SAMPLE_ENV_COMPLEX);

    assert_success(&t.import("app", &path.to_string_lossy(), false));

    assert_stdout_contains(&t.get("app", "QUOTED"), "quoted value");
    assert_stdout_contains(&t.get("app", "SINGLE_QUOTED"), "single quoted");
    assert_stdout_contains(&t.get("app", "EXPORTED"), "yes");
    assert_stdout_contains(&t.get("app", "SPECIAL_CHARS"), "p@ssw0rd!#$%");
}

#[test]
fn test_import_conflicts_need_overwrite() {
    let t = Test::with_secrets("app", &[("KEY1", "original")]);
    let path = t.write(".env", SAMPLE_ENV);
    let path = path.to_string_lossy().to_string();

    let output = t.import("app", &path, false);
    assert_success(&output);
    assert_stdout_contains(&output, "skipped");
    assert_stdout_contains(&t.get("app", "KEY1"), "original");

    assert_success(&t.import("app", &path, true));
    assert_stdout_contains(&t.get("app", "KEY1"), "value1");
}

#[test]
fn test_import_malformed_fails() {
    let t = Test::init();
    let path = t.write(".env", "GOOD=1\njust garbage\n");

    let output = t.import("app", &path.to_string_lossy(), false);
    assert_failure(&output);
    assert_stderr_contains(&output, "line 2");
}

#[test]
fn test_export_quotes_values_with_spaces() {
    let t = Test::with_secrets("app", &[("API_KEY", "sk-abc123"), ("DB_HOST", "local host")]);

    let output = t.export("app");
    assert_success(&output);
    assert_eq!(stdout(&output), "API_KEY=sk-abc123\nDB_HOST=\"local host\"\n");
}

#[test]
fn test_export_missing_project_fails() {
    let t = Test::init();
    assert_failure(&t.export("ghost"));
}
