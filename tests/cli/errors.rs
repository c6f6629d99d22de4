//! Tests for error handling and global flags.

use crate::support::*;

#[test]
fn test_help() {
    let t = Test::new();

    let output = t.cmd().arg("--help").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "bullpen");
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();
    assert_failure(&t.cmd().arg("unknown-command").output().unwrap());
}

#[test]
fn test_command_before_init_suggests_init() {
    let t = Test::new();

    let output = t.set("app", "KEY", "value");
    assert_failure(&output);
    assert_stderr_contains(&output, "not initialized");
    assert_stderr_contains(&output, "bullpen init");
}

#[test]
fn test_verbose_flag_accepted() {
    let t = Test::new();

    let output = t.cmd().args(["--verbose", "init"]).output().unwrap();
    assert_success(&output);
}

#[test]
fn test_invalid_config_reported() {
    let t = Test::new();
    t.write("bullpen.toml", "[rotation]\ndefault_length = 0\n");

    let output = t.init_cmd();
    assert_failure(&output);
    assert_stderr_contains(&output, "default_length");
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.cmd().arg("--version").output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, env!("CARGO_PKG_VERSION"));
}
