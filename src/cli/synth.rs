//! Synth command.
//!
//! Reads the deployment environment, assembles the stack once, and writes
//! `{out}/{StackName}.template.json`.

use std::path::{Path, PathBuf};
use tracing::info;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::deployment::{Deployment, Variant};
use crate::core::stack::{self, Stack};
use crate::error::Result;

/// Where a stack's template lands inside `out`.
pub fn template_path(out: &Path, stack: &Stack) -> PathBuf {
    out.join(format!("{}.template.json", stack.name))
}

/// Synthesize and emit the template.
pub fn execute(variant: Variant, out: &Path, to_stdout: bool, config: Option<&Path>) -> Result<()> {
    // Environment first: nothing is declared unless it is complete.
    let deployment = Deployment::from_env(variant)?;
    let config = Config::load(config)?;

    let stack = stack::assemble(&deployment, &config)?;
    let json = stack.template.to_json()?;

    if to_stdout {
        println!("{}", json);
        return Ok(());
    }

    std::fs::create_dir_all(out)?;
    let path = template_path(out, &stack);
    std::fs::write(&path, format!("{}\n", json))?;
    info!(path = %path.display(), "template written");

    output::success(&format!("synthesized {}", output::key(&stack.name)));
    output::kv("variant", variant);
    output::kv("resources", stack.template.resources().len());
    output::kv("template", output::path(&path.display().to_string()));
    output::kv("sha256", output::dim(&stack.template.fingerprint()?[..16]));

    output::section("Outputs");
    for (id, text) in stack.advisories() {
        output::kv(&id, text);
    }

    if variant.uses_tls() {
        println!();
        output::hint(&format!(
            "the certificate for {} is validated by DNS: add the records ACM shows once deployed",
            deployment.domain_name
        ));
    }

    Ok(())
}
