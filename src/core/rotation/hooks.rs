//! Hook and notification delivery.
//!
//! The engine hands every side effect to a [`Dispatcher`]. Delivery is
//! best-effort and at-most-once: the engine logs a failed hook or
//! notification and moves on.

use tracing::info;

use crate::core::domain::{NotificationConfig, NotificationEvent, RotationHook, RotationPolicy};
use crate::error::Result;

/// Delivers rotation hooks and notifications.
pub trait Dispatcher {
    /// Fire one hook for `policy`.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::Hook` if delivery fails.
    fn run_hook(&self, policy: &RotationPolicy, hook: &RotationHook) -> Result<()>;

    /// Send one notification. `detail` carries the error text on failure.
    ///
    /// # Errors
    ///
    /// Returns `ExecutionError::Notification` if delivery fails.
    fn notify(
        &self,
        policy: &RotationPolicy,
        notification: &NotificationConfig,
        event: NotificationEvent,
        detail: Option<&str>,
    ) -> Result<()>;
}

impl<D: Dispatcher + ?Sized> Dispatcher for Box<D> {
    fn run_hook(&self, policy: &RotationPolicy, hook: &RotationHook) -> Result<()> {
        (**self).run_hook(policy, hook)
    }

    fn notify(
        &self,
        policy: &RotationPolicy,
        notification: &NotificationConfig,
        event: NotificationEvent,
        detail: Option<&str>,
    ) -> Result<()> {
        (**self).notify(policy, notification, event, detail)
    }
}

/// Records intent through `tracing` and never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDispatcher;

impl Dispatcher for LogDispatcher {
    fn run_hook(&self, policy: &RotationPolicy, hook: &RotationHook) -> Result<()> {
        info!(
            policy_id = %policy.policy_id,
            hook = ?hook.hook_type,
            action = ?hook.action,
            target = %hook.target,
            "rotation hook"
        );
        Ok(())
    }

    fn notify(
        &self,
        policy: &RotationPolicy,
        notification: &NotificationConfig,
        event: NotificationEvent,
        detail: Option<&str>,
    ) -> Result<()> {
        info!(
            policy_id = %policy.policy_id,
            secret = %policy.secret_name,
            channel = ?notification.channel,
            target = %notification.target,
            event = %event,
            detail = detail.unwrap_or(""),
            "rotation notification"
        );
        Ok(())
    }
}
