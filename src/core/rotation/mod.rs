//! Policy-driven secret rotation.
//!
//! Control flows one way: [`RotationScheduler`] picks due policies and calls
//! [`PolicyEngine::rotate_secret`], which goes through the vault store to
//! the document store.

pub mod engine;
pub mod generate;
pub mod hooks;
pub mod schedule;
pub mod scheduler;

pub use engine::PolicyEngine;
pub use hooks::{Dispatcher, LogDispatcher};
pub use schedule::calculate_next_rotation_date;
pub use scheduler::RotationScheduler;
