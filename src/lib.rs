//! Bullpen - an encrypted secrets vault with policy-driven rotation.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line driver
//! └── core/
//!     ├── config        # bullpen.toml management
//!     ├── cipher/       # Cipher trait + age implementation
//!     ├── store/        # DocumentStore: encrypted file, in-memory, identity
//!     ├── domain/       # Secrets, projects, policies, env text, reports
//!     ├── vault/        # VaultStore: CRUD and env import/export
//!     ├── rotation/     # Schedule, generators, hooks, engine, scheduler
//!     └── app           # Engine + scheduler wired together
//! ```
//!
//! # Example
//!
//! ```
//! use bullpen::core::app::App;
//! use bullpen::core::domain::{PolicyDraft, SecretEntry};
//!
//! let mut app = App::in_memory();
//! app.set_secret("payments", SecretEntry::new("API_KEY", "initial")).unwrap();
//! let policy = app
//!     .save_policy(&PolicyDraft::for_secret("API_KEY", "payments"))
//!     .unwrap();
//! assert!(app.rotate_by_id(&policy.policy_id).unwrap().rotated());
//! ```

pub mod cli;
pub mod core;
pub mod error;

pub use crate::core::app::App;
pub use crate::core::config::Config;
pub use crate::core::rotation::{PolicyEngine, RotationScheduler};
pub use crate::core::vault::VaultStore;
pub use crate::error::{Error, Result};
