//! Tests for error handling and CLI flags.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_help() {
    let t = Test::new();

    t.cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("synth"));
}

#[test]
fn test_unknown_command_fails() {
    let t = Test::new();

    t.cmd()
        .arg("deploy")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_unknown_variant_fails() {
    let t = Test::basic();

    let output = t.synth("mega");
    assert_exit_one(&output);
    assert_stderr_contains(&output, "invalid value 'mega'");
    assert!(t.written_templates().is_empty());
}

#[test]
fn test_variant_from_env() {
    let t = Test::basic();

    let output = t
        .cmd()
        .env("BERTH_VARIANT", "tls")
        .args(["synth", "--stdout"])
        .output()
        .unwrap();
    assert_success(&output);
    assert!(stdout(&output).contains("AWS::CertificateManager::Certificate"));
}

#[test]
fn test_version_flag() {
    let t = Test::new();

    let output = t.cmd().arg("--version").output().unwrap();
    assert_success(&output);
    assert!(stdout(&output).contains("berth"));
}

#[test]
fn test_completions_bash_outputs_script() {
    let t = Test::new();

    let output = t.cmd().args(["completions", "bash"]).output().unwrap();
    assert_success(&output);
    let out = stdout(&output);
    assert!(out.contains("_berth") || out.contains("complete"));
}

#[test]
fn test_explicit_config_must_exist() {
    let t = Test::basic();

    let output = t
        .cmd()
        .args(["--config", "missing.toml", "synth"])
        .output()
        .unwrap();
    assert_exit_one(&output);
    assert_stderr_contains(&output, "failed to read config file");
}

#[test]
fn test_malformed_config() {
    let t = Test::basic();
    t.write_config("[service\n");

    let output = t.synth("basic");
    assert_exit_one(&output);
    assert_stderr_contains(&output, "failed to parse config file");
    assert_stderr_contains(&output, "check berth.toml syntax");
}
