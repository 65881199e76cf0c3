//! Stack assembly.
//!
//! [`assemble`] is the single composition function: it takes the deployment
//! and configuration and returns the fully wired, validated template.
//!
//! ```text
//! network ─▶ (secrets) ─▶ compute ─▶ edge ─▶ scaling ─▶ validate
//! ```

pub mod compute;
pub mod edge;
pub mod network;
pub mod scaling;

use tracing::info;

use crate::core::config::Config;
use crate::core::deployment::Deployment;
use crate::core::secrets;
use crate::core::template::intrinsic::render;
use crate::core::template::Template;
use crate::error::Result;

/// A synthesized stack.
#[derive(Debug, Clone)]
pub struct Stack {
    pub name: String,
    pub template: Template,
}

impl Stack {
    /// Output values meant for the operator, as `(logical id, text)`.
    ///
    /// Values only known after deployment render as `<Resource.Attribute>`.
    pub fn advisories(&self) -> Vec<(String, String)> {
        self.template
            .outputs()
            .iter()
            .map(|(id, out)| (id.clone(), render(&out.value)))
            .collect()
    }
}

/// Build the full declaration graph for a deployment.
///
/// # Errors
///
/// Fails on an invalid secrets catalogue, inconsistent capacity bounds, or
/// any dangling cross-reference in the finished template.
pub fn assemble(deployment: &Deployment, config: &Config) -> Result<Stack> {
    let name = deployment.stack_name();
    let mut template = Template::new(format!(
        "{} ({} variant) for {}",
        name, deployment.variant, deployment.domain_name
    ));

    scaling::check_capacity(config.service.min_capacity, config.service.max_capacity)?;

    let network = network::declare(&mut template, deployment)?;

    let secret_refs = if deployment.variant.uses_secrets() {
        let catalogue = config.catalogue()?;
        secrets::resolve(deployment, &catalogue, &mut template)?
    } else {
        Vec::new()
    };

    let compute = compute::declare(
        &mut template,
        deployment,
        &network,
        &config.service,
        &secret_refs,
    )?;
    let edge = edge::declare(&mut template, deployment, &network, &compute)?;
    let scaling = scaling::declare(&mut template, &config.service, &compute, &edge)?;

    template.validate()?;

    info!(
        stack = %name,
        resources = template.resources().len(),
        parameters = template.parameters().len(),
        scaling_target = %scaling.target,
        scaling_policies = scaling.policies.len(),
        "stack assembled"
    );

    Ok(Stack { name, template })
}
