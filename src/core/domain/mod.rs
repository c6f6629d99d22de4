//! Domain types.

mod document;
mod env;
pub mod policy;
mod project;
mod report;
mod secret;

pub use document::{Record, VaultDocument};
pub use env::Env;
pub use policy::{
    GeneratorType, HookAction, HookType, NotificationChannel, NotificationConfig,
    NotificationEvent, PolicyDefaults, PolicyDraft, RegenerationStrategy, RotationHook,
    RotationInterval, RotationPolicy,
};
pub use project::Project;
pub use report::{
    BatchReport, ImportReport, PolicyResult, PolicyStatus, RotationOutcome, SchedulerCounts,
    SkipReason,
};
pub use secret::SecretEntry;
