//! Tests for `berth secrets`.

use crate::support::*;
use serde_json::Value;

#[test]
fn test_lists_default_catalogue_with_placeholders() {
    let t = Test::new();

    let output = t.secrets(false);
    assert_success(&output);
    assert_stdout_contains(&output, "29 secrets");
    assert_stdout_contains(&output, "/{env}/{app}/DB_HOST");
}

#[test]
fn test_json_paths_use_environment() {
    let t = Test::secure();

    let output = t.secrets(true);
    assert_success(&output);

    let entries: Vec<Value> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(entries.len(), 29);

    let app_key = entries.iter().find(|e| e["key"] == "APP_KEY").unwrap();
    assert_eq!(app_key["encrypted"], true);
    assert_eq!(app_key["path"], "/dev/shop/APP_KEY");
    assert_eq!(app_key["version_path"], "/dev/shop/APP_KEYver");

    let app_env = entries.iter().find(|e| e["key"] == "APP_ENV").unwrap();
    assert_eq!(app_env["encrypted"], false);
    assert!(app_env.get("version_path").is_none());
}

#[test]
fn test_config_replaces_catalogue() {
    let t = Test::new();
    t.write_config(SMALL_CONFIG);

    let output = t.secrets(true);
    assert_success(&output);
    let entries: Vec<Value> = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(entries.len(), 3);
}

#[test]
fn test_duplicate_key_in_config_fails() {
    let t = Test::new();
    t.write_config("[secrets]\nplain = [\"DB_HOST\", \"DB_HOST\"]\n");

    let output = t.secrets(false);
    assert_exit_one(&output);
    assert_stderr_contains(&output, "secret declared more than once: DB_HOST");
}
