//! Input validation.
//!
//! Secret keys become container environment variable names and parameter
//! store path segments, so they are held to environment variable rules.

use crate::error::{ConfigError, Result};

/// Validate a secret key name.
///
/// Secret keys must be valid environment variable names:
/// - Only A-Z, a-z, 0-9, and underscore
/// - Cannot start with a digit
/// - Cannot be empty
///
/// # Errors
///
/// Returns `ConfigError::InvalidSecretKey` describing the first problem.
pub fn validate_key(key: &str) -> Result<()> {
    let invalid = |reason: String| ConfigError::InvalidSecretKey {
        key: key.to_string(),
        reason,
    };

    let Some(first) = key.chars().next() else {
        return Err(invalid("key is empty".to_string()).into());
    };

    if first.is_ascii_digit() {
        return Err(invalid("cannot start with a digit".to_string()).into());
    }

    for (i, ch) in key.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '_' {
            return Err(invalid(format!(
                "invalid character '{}' at position {}. Only A-Z, 0-9, and underscore are allowed",
                ch,
                i + 1
            ))
            .into());
        }
    }

    Ok(())
}

/// Validate a deployment type or namespace.
///
/// Both end up in the stack name, logical IDs and the template file name, so
/// only A-Z, a-z, 0-9, `-` and `_` are accepted.
///
/// # Errors
///
/// Returns `ConfigError::InvalidIdentity` naming the variable `var`.
pub fn validate_identity(var: &'static str, value: &str) -> Result<()> {
    let invalid = |reason: String| ConfigError::InvalidIdentity {
        var,
        value: value.to_string(),
        reason,
    };

    for (i, ch) in value.chars().enumerate() {
        if !ch.is_ascii_alphanumeric() && ch != '-' && ch != '_' {
            return Err(invalid(format!(
                "invalid character '{}' at position {}. Only A-Z, 0-9, '-' and '_' are allowed",
                ch,
                i + 1
            ))
            .into());
        }
    }

    Ok(())
}
