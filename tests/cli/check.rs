//! Tests for `berth check`.

use crate::support::*;

#[test]
fn test_check_reports_plan() {
    let t = Test::basic();

    let output = t.check("tls");
    assert_success(&output);
    assert_stdout_contains(&output, "deployment environment complete");
    assert_stdout_contains(&output, STACK_NAME);
    assert_stdout_contains(&output, "t3.small x 2..4");
    assert_stdout_contains(&output, "HTTPS :443");
    assert_stdout_contains(&output, "(resolved at deploy time)");
}

#[test]
fn test_check_secure_counts_secrets() {
    let t = Test::secure();

    let output = t.check("secure");
    assert_success(&output);
    assert_stdout_contains(&output, "29 (7 encrypted)");
    assert_stdout_contains(&output, "eu-west-1");
}

#[test]
fn test_check_writes_nothing() {
    let t = Test::basic();

    assert_success(&t.check("basic"));
    assert!(t.written_templates().is_empty());
}

#[test]
fn test_check_missing_vars() {
    let t = Test::new();

    let output = t.check("basic");
    assert_exit_one(&output);
    assert_stderr_contains(&output, "THIS_DEPLOYMENT_ENV");
}
