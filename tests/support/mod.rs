//! Test support utilities for bullpen integration tests.
//!
//! Provides isolated CLI environments and in-memory vault helpers.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use tempfile::TempDir;

/// Test environment with isolated temp directories.
///
/// Each test gets its own working dir (holding `bullpen.toml` and the vault)
/// and home dir. Child processes use `.current_dir()` so tests can run in
/// parallel.
pub struct Test {
    /// Working directory for the CLI
    pub dir: TempDir,
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create an environment with a config file but no vault.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let home = TempDir::new().expect("failed to create temp home");

        std::fs::write(dir.path().join("bullpen.toml"), TEST_CONFIG)
            .expect("failed to write config");

        Self { dir, home }
    }

    /// Create an environment with the vault initialized.
    pub fn init() -> Self {
        let t = Self::new();
        let output = t.init_cmd();
        assert!(
            output.status.success(),
            "Failed to initialize vault: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Initialized environment with secrets set in `project`.
    pub fn with_secrets(project: &str, secrets: &[(&str, &str)]) -> Self {
        let t = Self::init();
        for (k, v) in secrets {
            let output = t.set(project, k, v);
            assert!(
                output.status.success(),
                "Failed to set secret {}: {}",
                k,
                String::from_utf8_lossy(&output.stderr)
            );
        }
        t
    }

    /// Write a file into the working directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> std::path::PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("failed to write file");
        path
    }
}
