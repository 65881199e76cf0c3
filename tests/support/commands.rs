//! Command helper methods for Test.

use super::Test;
use super::ALL_VARS;
use assert_cmd::Command;
use serde_json::Value;
use std::path::PathBuf;
use std::process::Output;

impl Test {
    /// Create a berth command with a controlled environment.
    ///
    /// Returns a Command configured with:
    /// - every deployment variable cleared, then `self.vars` applied
    /// - NO_COLOR set, so output can be matched literally
    /// - current directory set to the test directory
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("berth").expect("failed to find berth binary");
        for var in ALL_VARS {
            cmd.env_remove(var);
        }
        cmd.env_remove("BERTH_LOG");
        cmd.env_remove("BERTH_VARIANT");
        cmd.env("NO_COLOR", "1");
        for (k, v) in &self.vars {
            cmd.env(k, v);
        }
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Shortcut for `berth synth --variant <variant>`.
    pub fn synth(&self, variant: &str) -> Output {
        self.cmd()
            .args(["synth", "--variant", variant])
            .output()
            .expect("failed to run berth synth")
    }

    /// Shortcut for `berth synth --variant <variant> --stdout`.
    pub fn synth_stdout(&self, variant: &str) -> Output {
        self.cmd()
            .args(["synth", "--variant", variant, "--stdout"])
            .output()
            .expect("failed to run berth synth --stdout")
    }

    /// Shortcut for `berth check --variant <variant>`.
    pub fn check(&self, variant: &str) -> Output {
        self.cmd()
            .args(["check", "--variant", variant])
            .output()
            .expect("failed to run berth check")
    }

    /// Shortcut for `berth secrets`.
    pub fn secrets(&self, json: bool) -> Output {
        let mut cmd = self.cmd();
        cmd.arg("secrets");
        if json {
            cmd.arg("--json");
        }
        cmd.output().expect("failed to run berth secrets")
    }

    /// Shortcut for `berth name <suffix>`.
    pub fn name(&self, suffix: &str) -> Output {
        self.cmd()
            .args(["name", suffix])
            .output()
            .expect("failed to run berth name")
    }

    /// Default output directory.
    pub fn out_dir(&self) -> PathBuf {
        self.dir.path().join("berth.out")
    }

    /// Templates written to the default output directory.
    pub fn written_templates(&self) -> Vec<PathBuf> {
        match std::fs::read_dir(self.out_dir()) {
            Ok(entries) => entries.filter_map(|e| e.ok().map(|e| e.path())).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Parse the single template in the default output directory.
    pub fn read_template(&self) -> Value {
        let templates = self.written_templates();
        assert_eq!(templates.len(), 1, "expected exactly one template");
        let contents = std::fs::read_to_string(&templates[0]).expect("failed to read template");
        serde_json::from_str(&contents).expect("template is not valid JSON")
    }
}
