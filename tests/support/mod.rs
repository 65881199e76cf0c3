//! Test support utilities for berth integration tests.
//!
//! Provides reusable test environment setup and helper commands.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use tempfile::TempDir;

/// Test environment with an isolated working directory.
///
/// Child processes run with `.current_dir()` and an explicit environment,
/// so tests can safely run in parallel.
pub struct Test {
    /// Temporary working directory
    pub dir: TempDir,
    /// Deployment variables passed to every command
    pub vars: Vec<(String, String)>,
}

impl Test {
    /// A test environment with no deployment variables set.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self {
            dir,
            vars: Vec::new(),
        }
    }

    /// A test environment with the given deployment variables.
    pub fn with_vars(vars: &[(&str, &str)]) -> Self {
        let mut t = Self::new();
        t.vars = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        t
    }

    /// The three variables every variant needs.
    pub fn basic() -> Self {
        Self::with_vars(BASIC_VARS)
    }

    /// Everything the secure variant needs.
    pub fn secure() -> Self {
        Self::with_vars(SECURE_VARS)
    }

    /// Write a `berth.toml` into the working directory.
    pub fn write_config(&self, contents: &str) {
        std::fs::write(self.dir.path().join("berth.toml"), contents)
            .expect("failed to write berth.toml");
    }
}
