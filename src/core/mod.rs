//! Core library components.
//!
//! The encrypted document store, the vault model on top of it, and the
//! rotation engine and scheduler.

pub mod app;
pub mod cipher;
pub mod config;
pub mod constants;
pub mod domain;
pub mod rotation;
pub mod store;
pub mod types;
pub mod validation;
pub mod vault;
