//! Rotation policy types.
//!
//! A policy describes when a single secret is regenerated, how the new value
//! is produced, and which hooks and notifications surround the rotation.

use std::fmt;
use std::str::FromStr;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::constants::{DEFAULT_CATEGORY, DEFAULT_GENERATED_LENGTH, MAX_GENERATED_LENGTH};
use crate::core::rotation::schedule;
use crate::core::types::{Category, PolicyId, ProjectName, Timestamp};
use crate::error::{Result, ValidationError};

/// How often a secret is rotated.
///
/// Serialized as `DAILY`, `WEEKLY`, `MONTHLY`, `QUARTERLY`, `ANNUALLY`,
/// `custom`, or a duration string such as `7d`, `2w`, `1M`, `1Y`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum RotationInterval {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    Annually,
    /// A duration string; unparseable values fall back to 30 days.
    Duration(String),
    /// Driven by `custom_rotation_cron`.
    Custom,
}

impl FromStr for RotationInterval {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "" => Err(ValidationError::InvalidInterval("empty interval".to_string())),
            "DAILY" => Ok(Self::Daily),
            "WEEKLY" => Ok(Self::Weekly),
            "MONTHLY" => Ok(Self::Monthly),
            "QUARTERLY" => Ok(Self::Quarterly),
            "ANNUALLY" | "YEARLY" => Ok(Self::Annually),
            "CUSTOM" => Ok(Self::Custom),
            _ => Ok(Self::Duration(trimmed.to_string())),
        }
    }
}

impl fmt::Display for RotationInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Daily => write!(f, "DAILY"),
            Self::Weekly => write!(f, "WEEKLY"),
            Self::Monthly => write!(f, "MONTHLY"),
            Self::Quarterly => write!(f, "QUARTERLY"),
            Self::Annually => write!(f, "ANNUALLY"),
            Self::Duration(raw) => write!(f, "{}", raw),
            Self::Custom => write!(f, "custom"),
        }
    }
}

impl TryFrom<String> for RotationInterval {
    type Error = ValidationError;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RotationInterval> for String {
    fn from(value: RotationInterval) -> Self {
        value.to_string()
    }
}

/// Built-in value generators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeneratorType {
    Alphanumeric,
    StrongPassword,
    Uuid,
    Hex,
}

impl GeneratorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Alphanumeric => "alphanumeric",
            Self::StrongPassword => "strong_password",
            Self::Uuid => "uuid",
            Self::Hex => "hex",
        }
    }
}

/// How a new secret value is produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RegenerationStrategy {
    InternalGenerator {
        generator_type: GeneratorType,
        #[serde(default = "default_length")]
        length: usize,
    },
    /// Delegates to an external secret source. Not wired yet.
    ExternalSystem {
        system: String,
        #[serde(default)]
        config: serde_json::Value,
    },
    /// Delegates to an agent task. Not wired yet.
    AgentTask {
        agent: String,
        #[serde(default)]
        task: serde_json::Value,
    },
}

fn default_length() -> usize {
    DEFAULT_GENERATED_LENGTH
}

impl RegenerationStrategy {
    pub fn alphanumeric(length: usize) -> Self {
        Self::InternalGenerator {
            generator_type: GeneratorType::Alphanumeric,
            length,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::InternalGenerator { .. } => "internal_generator",
            Self::ExternalSystem { .. } => "external_system",
            Self::AgentTask { .. } => "agent_task",
        }
    }

    /// # Errors
    ///
    /// Returns `ValidationError::InvalidStrategy` for out-of-range lengths.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::InternalGenerator {
                generator_type,
                length,
            } => {
                if *generator_type == GeneratorType::Uuid {
                    return Ok(());
                }
                if *length == 0 || *length > MAX_GENERATED_LENGTH {
                    return Err(ValidationError::InvalidStrategy(format!(
                        "length must be between 1 and {}, got {}",
                        MAX_GENERATED_LENGTH, length
                    ))
                    .into());
                }
                if *generator_type == GeneratorType::StrongPassword && *length < 4 {
                    return Err(ValidationError::InvalidStrategy(
                        "strong_password needs a length of at least 4".to_string(),
                    )
                    .into());
                }
                Ok(())
            }
            Self::ExternalSystem { system, .. } if system.trim().is_empty() => Err(
                ValidationError::InvalidStrategy("external system name is empty".to_string())
                    .into(),
            ),
            Self::AgentTask { agent, .. } if agent.trim().is_empty() => Err(
                ValidationError::InvalidStrategy("agent name is empty".to_string()).into(),
            ),
            Self::ExternalSystem { .. } | Self::AgentTask { .. } => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookType {
    PreRotation,
    PostRotation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HookAction {
    Webhook,
    AgentTask,
}

/// A side effect fired before or after a rotation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationHook {
    #[serde(rename = "type")]
    pub hook_type: HookType,
    pub action: HookAction,
    pub target: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationChannel {
    Log,
    Email,
    Slack,
    Webhook,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationEvent {
    Success,
    Failure,
}

impl fmt::Display for NotificationEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "SUCCESS"),
            Self::Failure => write!(f, "FAILURE"),
        }
    }
}

/// Where rotation outcomes are reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub channel: NotificationChannel,
    pub target: String,
    /// Events to report; empty means all.
    #[serde(default)]
    pub events: Vec<NotificationEvent>,
}

impl NotificationConfig {
    pub fn wants(&self, event: NotificationEvent) -> bool {
        self.events.is_empty() || self.events.contains(&event)
    }
}

/// Rotation configuration for a single secret.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationPolicy {
    pub policy_id: PolicyId,
    pub secret_name: String,
    pub project: ProjectName,
    pub category: Category,
    pub is_enabled: bool,
    pub rotation_interval: RotationInterval,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_rotation_cron: Option<String>,
    pub regeneration_strategy: RegenerationStrategy,
    pub versioning_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_versions_to_keep: Option<usize>,
    #[serde(default)]
    pub hooks: Vec<RotationHook>,
    #[serde(default)]
    pub notifications: Vec<NotificationConfig>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_rotation_date: Option<Timestamp>,
    pub next_rotation_date: Timestamp,
}

/// Values used when a new policy leaves a field unset.
#[derive(Debug, Clone)]
pub struct PolicyDefaults {
    pub interval: RotationInterval,
    pub strategy: RegenerationStrategy,
}

impl Default for PolicyDefaults {
    fn default() -> Self {
        Self {
            interval: RotationInterval::Monthly,
            strategy: RegenerationStrategy::alphanumeric(DEFAULT_GENERATED_LENGTH),
        }
    }
}

/// A partial policy used for create and update.
///
/// Unset fields keep their stored value on update and take defaults on create.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyDraft {
    pub policy_id: Option<PolicyId>,
    pub secret_name: Option<String>,
    pub project: Option<ProjectName>,
    pub category: Option<Category>,
    pub is_enabled: Option<bool>,
    pub rotation_interval: Option<RotationInterval>,
    pub custom_rotation_cron: Option<String>,
    pub regeneration_strategy: Option<RegenerationStrategy>,
    pub versioning_enabled: Option<bool>,
    pub max_versions_to_keep: Option<usize>,
    pub hooks: Option<Vec<RotationHook>>,
    pub notifications: Option<Vec<NotificationConfig>>,
    pub last_rotation_date: Option<Timestamp>,
}

impl PolicyDraft {
    /// Draft targeting `secret_name` in `project`.
    pub fn for_secret(secret_name: impl Into<String>, project: impl Into<ProjectName>) -> Self {
        Self {
            secret_name: Some(secret_name.into()),
            project: Some(project.into()),
            ..Self::default()
        }
    }

    /// The category this draft targets, defaulting like new policies do.
    pub fn category_or_default(&self) -> &str {
        self.category.as_deref().unwrap_or(DEFAULT_CATEGORY)
    }
}

impl RotationPolicy {
    /// Build a new policy from a draft.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::MissingField` if `secret_name` or `project`
    /// is absent, or any error from [`RotationPolicy::validate`].
    pub fn from_draft(
        draft: &PolicyDraft,
        policy_id: PolicyId,
        defaults: &PolicyDefaults,
    ) -> Result<Self> {
        let secret_name = draft
            .secret_name
            .clone()
            .ok_or(ValidationError::MissingField("secret_name"))?;
        let project = draft
            .project
            .clone()
            .ok_or(ValidationError::MissingField("project"))?;
        let now = Utc::now();

        let mut policy = Self {
            policy_id,
            secret_name,
            project,
            category: draft.category_or_default().to_string(),
            is_enabled: draft.is_enabled.unwrap_or(true),
            rotation_interval: draft
                .rotation_interval
                .clone()
                .unwrap_or_else(|| defaults.interval.clone()),
            custom_rotation_cron: draft.custom_rotation_cron.clone(),
            regeneration_strategy: draft
                .regeneration_strategy
                .clone()
                .unwrap_or_else(|| defaults.strategy.clone()),
            versioning_enabled: draft.versioning_enabled.unwrap_or(true),
            max_versions_to_keep: draft.max_versions_to_keep,
            hooks: draft.hooks.clone().unwrap_or_default(),
            notifications: draft.notifications.clone().unwrap_or_default(),
            created_at: now,
            updated_at: now,
            last_rotation_date: draft.last_rotation_date,
            next_rotation_date: now,
        };
        policy.refresh_next_rotation();
        policy.validate()?;
        Ok(policy)
    }

    /// Merge the set fields of `draft` into this policy.
    ///
    /// The id and creation time never change. `next_rotation_date` is always
    /// re-derived afterwards.
    ///
    /// # Errors
    ///
    /// Returns any error from [`RotationPolicy::validate`].
    pub fn apply(&mut self, draft: &PolicyDraft) -> Result<()> {
        if let Some(v) = &draft.secret_name {
            self.secret_name = v.clone();
        }
        if let Some(v) = &draft.project {
            self.project = v.clone();
        }
        if let Some(v) = &draft.category {
            self.category = v.clone();
        }
        if let Some(v) = draft.is_enabled {
            self.is_enabled = v;
        }
        if let Some(v) = &draft.rotation_interval {
            self.rotation_interval = v.clone();
        }
        if let Some(v) = &draft.custom_rotation_cron {
            self.custom_rotation_cron = Some(v.clone());
        }
        if let Some(v) = &draft.regeneration_strategy {
            self.regeneration_strategy = v.clone();
        }
        if let Some(v) = draft.versioning_enabled {
            self.versioning_enabled = v;
        }
        if let Some(v) = draft.max_versions_to_keep {
            self.max_versions_to_keep = Some(v);
        }
        if let Some(v) = &draft.hooks {
            self.hooks = v.clone();
        }
        if let Some(v) = &draft.notifications {
            self.notifications = v.clone();
        }
        if let Some(v) = draft.last_rotation_date {
            self.last_rotation_date = Some(v);
        }

        self.updated_at = Utc::now();
        self.refresh_next_rotation();
        self.validate()
    }

    /// Base for the next-date derivation: last rotation, else creation.
    pub fn schedule_base(&self) -> Timestamp {
        self.last_rotation_date.unwrap_or(self.created_at)
    }

    /// Re-derive `next_rotation_date` from the interval and schedule base.
    pub fn refresh_next_rotation(&mut self) {
        self.next_rotation_date = schedule::calculate_next_rotation_date(
            &self.rotation_interval,
            self.custom_rotation_cron.as_deref(),
            Some(self.schedule_base()),
        );
    }

    /// Record a completed rotation at `at`.
    pub fn mark_rotated(&mut self, at: Timestamp) {
        self.last_rotation_date = Some(at);
        self.updated_at = at;
        self.refresh_next_rotation();
    }

    pub fn is_due(&self, now: Timestamp) -> bool {
        self.is_enabled && self.next_rotation_date <= now
    }

    /// Whether this policy rotates `(project, category, secret_name)`.
    pub fn targets(&self, project: &str, category: &str, secret_name: &str) -> bool {
        self.project == project && self.category == category && self.secret_name == secret_name
    }

    /// # Errors
    ///
    /// Returns `ValidationError` when a required field is empty, a custom
    /// interval lacks a valid cron, the strategy is out of range, or
    /// `max_versions_to_keep` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.secret_name.trim().is_empty() {
            return Err(ValidationError::MissingField("secret_name").into());
        }
        if self.project.trim().is_empty() {
            return Err(ValidationError::MissingField("project").into());
        }
        if self.category.trim().is_empty() {
            return Err(ValidationError::MissingField("category").into());
        }

        match (&self.rotation_interval, self.custom_rotation_cron.as_deref()) {
            (RotationInterval::Custom, None) => return Err(ValidationError::MissingCron.into()),
            (RotationInterval::Custom, Some(expr)) => {
                schedule::parse_cron(expr)?;
            }
            (RotationInterval::Duration(raw), _) if schedule::parse_duration(raw).is_none() => {
                warn!(
                    policy_id = %self.policy_id,
                    interval = %raw,
                    "unparseable rotation interval, next date falls back to 30 days"
                );
            }
            _ => {}
        }

        self.regeneration_strategy.validate()?;

        if self.max_versions_to_keep == Some(0) {
            return Err(ValidationError::InvalidPolicy(
                "max_versions_to_keep must be at least 1".to_string(),
            )
            .into());
        }

        Ok(())
    }
}
