//! Name command.

use crate::core::constants::{ENV_KIND, ENV_NAMESPACE};
use crate::core::naming::Namer;
use crate::core::validation::validate_identity;
use crate::error::{ConfigError, Result};

/// Print `Kind` + `Namespace` + suffix for the current environment.
pub fn execute(suffix: &str) -> Result<()> {
    let read = |key: &str| std::env::var(key).unwrap_or_default();
    let (kind, namespace) = (read(ENV_KIND), read(ENV_NAMESPACE));

    let missing: Vec<&'static str> = [(ENV_KIND, &kind), (ENV_NAMESPACE, &namespace)]
        .into_iter()
        .filter(|(_, v)| v.is_empty())
        .map(|(k, _)| k)
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingVariables(missing).into());
    }
    validate_identity(ENV_KIND, &kind)?;
    validate_identity(ENV_NAMESPACE, &namespace)?;

    println!("{}", Namer::new(&kind, &namespace).generate_name(suffix));
    Ok(())
}
