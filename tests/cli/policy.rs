//! Tests for `bullpen policy`, `rotate`, `due` and `tick`.

use crate::support::*;

fn policy_id(output: &std::process::Output) -> String {
    let policies: serde_json::Value = serde_json::from_str(&stdout(output)).unwrap();
    policies[0]["policy_id"].as_str().unwrap().to_string()
}

#[test]
fn test_policy_put_and_list() {
    let t = Test::with_secrets("payments", &[("API_KEY", "initial")]);

    let output = t.policy_put(&policy_json("API_KEY", "payments"));
    assert_success(&output);
    assert_stdout_contains(&output, "saved policy");

    let output = t.policy_list_json();
    assert_success(&output);
    let id = policy_id(&output);

    let output = t.cmd().args(["policy", "show", &id]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "\"rotation_interval\": \"DAILY\"");

    // Policy records never show up as secrets.
    let output = t.list("_system");
    assert_success(&output);
    assert_stdout_excludes(&output, &id);
}

#[test]
fn test_policy_put_invalid_json_fails() {
    let t = Test::init();

    let output = t.policy_put("{\"secret_name\": 42}");
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid policy");
}

#[test]
fn test_rotate_by_secret() {
    let t = Test::with_secrets("payments", &[("API_KEY", "initial")]);
    assert_success(&t.policy_put(&policy_json("API_KEY", "payments")));

    let output = t.rotate_secret("payments", "API_KEY");
    assert_success(&output);
    assert_stdout_contains(&output, "rotated");

    let value = stdout(&t.get("payments", "API_KEY")).trim().to_string();
    assert_ne!(value, "initial");
    assert_eq!(value.len(), 24);
    assert!(value.chars().all(|c| c.is_ascii_hexdigit()));
}

#[test]
fn test_rotate_without_policy_fails_with_hint() {
    let t = Test::with_secrets("payments", &[("API_KEY", "initial")]);

    let output = t.rotate_secret("payments", "API_KEY");
    assert_failure(&output);
    assert_stderr_contains(&output, "no rotation policy");
    assert_stderr_contains(&output, "policy put");
}

#[test]
fn test_rotate_unknown_id_is_skipped() {
    let t = Test::init();

    let output = t.cmd().args(["rotate", "nope"]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "skipped");
}

#[test]
fn test_tick_rotates_overdue_policies() {
    let t = Test::with_secrets("payments", &[("API_KEY", "initial")]);
    let overdue = r#"{
  "secret_name": "API_KEY",
  "project": "payments",
  "rotation_interval": "DAILY",
  "last_rotation_date": "2020-01-01T00:00:00Z"
}"#;
    assert_success(&t.policy_put(overdue));

    let output = t.due_json();
    assert_success(&output);
    let due: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(due.as_array().unwrap().len(), 1);

    let output = t.tick_json();
    assert_success(&output);
    let report: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(report["total"], 1);
    assert_eq!(report["successful"], 1);

    let output = t.due_json();
    let due: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert!(due.as_array().unwrap().is_empty());
}

#[test]
fn test_policy_rm() {
    let t = Test::with_secrets("payments", &[("API_KEY", "initial")]);
    assert_success(&t.policy_put(&policy_json("API_KEY", "payments")));
    let id = policy_id(&t.policy_list_json());

    let output = t.cmd().args(["policy", "rm", &id]).output().unwrap();
    assert_success(&output);
    assert_stdout_contains(&output, "removed policy");

    let output = t.cmd().args(["policy", "show", &id]).output().unwrap();
    assert_failure(&output);
}
