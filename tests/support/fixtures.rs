//! Test fixtures, constants, and in-memory helpers.

use std::sync::{Arc, Mutex};

use bullpen::core::app::App;
use bullpen::core::domain::{
    NotificationConfig, NotificationEvent, PolicyDraft, RotationHook, RotationPolicy,
    SecretEntry,
};
use bullpen::core::rotation::{Dispatcher, PolicyEngine};
use bullpen::core::store::MemoryStore;
use bullpen::core::vault::VaultStore;
use bullpen::error::{ExecutionError, Result};

/// Config written into every CLI test directory.
pub const TEST_CONFIG: &str = r#"[vault]
path = "data/vault.age"
identity = "keys/identity.key"

[rotation]
default_interval = "MONTHLY"
default_length = 32
"#;

/// Standard test secrets used across multiple tests.
pub const STANDARD_SECRETS: &[(&str, &str)] = &[
    ("DATABASE_URL", "postgres://localhost/mydb"),
    ("API_KEY", "sk-test-12345"),
    ("JWT_SECRET", "super-secret-jwt-token"),
    ("REDIS_URL", "redis://localhost:6379"),
];

/// Sample .env file content for import tests.
pub const SAMPLE_ENV: &str = "KEY1=value1\nKEY2=value2\nKEY3=value3\n";

/// Sample .env with edge cases.
pub const SAMPLE_ENV_COMPLEX: &str = r#"
# This is a comment
SIMPLE=value
QUOTED="quoted value"
SINGLE_QUOTED='single quoted'
export EXPORTED=yes
ESCAPED="line1\nline2"

# Another comment
SPECIAL_CHARS=p@ssw0rd!#$%
"#;

/// Policy draft JSON rotating `secret` daily with 24-char hex values.
pub fn policy_json(secret: &str, project: &str) -> String {
    format!(
        r#"{{
  "secret_name": "{}",
  "project": "{}",
  "rotation_interval": "DAILY",
  "regeneration_strategy": {{ "type": "INTERNAL_GENERATOR", "generator_type": "hex", "length": 24 }},
  "max_versions_to_keep": 3
}}"#,
        secret, project
    )
}

/// An in-memory app with `secrets` stored in `project`.
pub fn memory_app(project: &str, secrets: &[(&str, &str)]) -> App<MemoryStore> {
    let mut app = App::in_memory();
    for (k, v) in secrets {
        app.set_secret(project, SecretEntry::new(*k, *v))
            .expect("failed to set secret");
    }
    app
}

/// Policy draft targeting `secret` in `project`.
pub fn draft(secret: &str, project: &str) -> PolicyDraft {
    PolicyDraft::for_secret(secret, project)
}

/// Dispatcher that records every call and can be told to fail deliveries.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_hooks: bool,
    pub fail_notifications: bool,
}

impl RecordingDispatcher {
    pub fn failing() -> Self {
        Self {
            fail_hooks: true,
            fail_notifications: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl Dispatcher for RecordingDispatcher {
    fn run_hook(&self, _policy: &RotationPolicy, hook: &RotationHook) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("hook:{:?}:{}", hook.hook_type, hook.target));
        if self.fail_hooks {
            return Err(ExecutionError::Hook {
                target: hook.target.clone(),
                reason: "unreachable".to_string(),
            }
            .into());
        }
        Ok(())
    }

    fn notify(
        &self,
        _policy: &RotationPolicy,
        notification: &NotificationConfig,
        event: NotificationEvent,
        _detail: Option<&str>,
    ) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("notify:{}:{}", event, notification.target));
        if self.fail_notifications {
            return Err(ExecutionError::Notification {
                target: notification.target.clone(),
                reason: "channel down".to_string(),
            }
            .into());
        }
        Ok(())
    }
}

/// Engine over a fresh memory store with `secrets` in `project`.
pub fn recording_engine(
    project: &str,
    secrets: &[(&str, &str)],
    dispatcher: RecordingDispatcher,
) -> PolicyEngine<MemoryStore, RecordingDispatcher> {
    let mut vault = VaultStore::new(MemoryStore::new());
    vault.load_vault().expect("failed to load");
    for (k, v) in secrets {
        vault
            .add_secret(project, SecretEntry::new(*k, *v))
            .expect("failed to add secret");
    }
    vault.save_vault().expect("failed to save");
    PolicyEngine::with_dispatcher(vault, dispatcher)
}
