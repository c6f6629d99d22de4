//! Tests for `bullpen project`.

use crate::support::*;

#[test]
fn test_project_create_and_list() {
    let t = Test::init();

    let output = t
        .cmd()
        .args(["project", "create", "payments", "-d", "billing keys"])
        .output()
        .unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "payments");

    assert_success(&t.set("payments", "STRIPE_KEY", "sk"));

    let output = t.cmd().args(["project", "list"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "payments");
    assert_stdout_contains(&output, "1 secrets");
}

#[test]
fn test_project_create_duplicate_fails() {
    let t = Test::init();
    assert_success(&t.cmd().args(["project", "create", "app"]).output().unwrap());

    let output = t.cmd().args(["project", "create", "app"]).output().unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
}

#[test]
fn test_project_create_reserved_name_fails() {
    let t = Test::init();

    let output = t
        .cmd()
        .args(["project", "create", "_system"])
        .output()
        .unwrap();
    assert_failure(&output);
    assert_stderr_contains(&output, "reserved");
}
