//! Tests for `berth name`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_name_example() {
    let t = Test::basic();

    let output = t.name("VPC");
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "DevTeam1VPC");
}

#[test]
fn test_suffix_appended_verbatim() {
    let t = Test::with_vars(&[
        ("THIS_DEPLOYMENT_ENV", "prod"),
        ("THIS_DEPLOYMENT_NAMESPACE", "9lives"),
    ]);

    let output = t.name("ingress");
    assert_success(&output);
    assert_eq!(stdout(&output).trim(), "Prod9livesingress");
}

#[test]
fn test_name_needs_kind_and_namespace() {
    let t = Test::with_vars(&[("THIS_DEPLOYMENT_ENV", "dev")]);

    let output = t.name("VPC");
    assert_exit_one(&output);
    assert_stderr_contains(&output, "Please `export THIS_DEPLOYMENT_NAMESPACE=` within your shell.");
}

#[test]
fn test_name_ignores_domain() {
    let t = Test::with_vars(&[
        ("THIS_DEPLOYMENT_ENV", "dev"),
        ("THIS_DEPLOYMENT_NAMESPACE", "team1"),
    ]);

    t.cmd()
        .args(["name", "ALB"])
        .assert()
        .success()
        .stdout(predicate::eq("DevTeam1ALB\n"));
}
