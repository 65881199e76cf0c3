//! Secrets command.
//!
//! Lists the secrets catalogue in effect and where each key lives in the
//! parameter store. Paths use the deployment type and app name when they are
//! set, and placeholders otherwise.

use serde::Serialize;
use std::path::Path;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::constants::{ENV_APP_NAME, ENV_KIND};
use crate::error::{Result, SynthError};

#[derive(Serialize)]
struct Entry<'a> {
    key: &'a str,
    encrypted: bool,
    path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version_path: Option<String>,
}

fn env_or(key: &str, placeholder: &str) -> String {
    std::env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| placeholder.to_string())
}

/// List catalogue keys.
pub fn execute(json: bool, config: Option<&Path>) -> Result<()> {
    let config = Config::load(config)?;
    let catalogue = config.catalogue()?;

    let kind = env_or(ENV_KIND, "{env}");
    let app = env_or(ENV_APP_NAME, "{app}");

    let entries: Vec<Entry> = catalogue
        .entries()
        .iter()
        .map(|spec| {
            let path = format!("/{}/{}/{}", kind, app, spec.key);
            Entry {
                key: &spec.key,
                encrypted: spec.encrypted,
                version_path: spec.encrypted.then(|| format!("{}ver", path)),
                path,
            }
        })
        .collect();

    if json {
        let out = serde_json::to_string_pretty(&entries).map_err(SynthError::Serialize)?;
        println!("{}", out);
        return Ok(());
    }

    output::header(&format!("{} secrets", entries.len()));
    for entry in &entries {
        let marker = if entry.encrypted {
            output::dim(" (SecureString)")
        } else {
            String::new()
        };
        output::list_item(&format!(
            "{}  {}{}",
            output::key(entry.key),
            entry.path,
            marker
        ));
    }

    Ok(())
}
