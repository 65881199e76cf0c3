//! Check command.
//!
//! Validates the deployment environment and configuration and shows what a
//! synth would declare, without writing anything.

use std::path::Path;

use crate::cli::output;
use crate::core::config::Config;
use crate::core::constants;
use crate::core::deployment::{Deployment, Variant};
use crate::core::stack;
use crate::error::Result;

fn or_deploy_time(value: &str) -> String {
    if value.is_empty() {
        output::dim("(resolved at deploy time)")
    } else {
        value.to_string()
    }
}

/// Validate the environment and print the plan.
pub fn execute(variant: Variant, config: Option<&Path>) -> Result<()> {
    let deployment = Deployment::from_env(variant)?;
    let config = Config::load(config)?;
    let stack = stack::assemble(&deployment, &config)?;

    output::success("deployment environment complete");

    output::section("Deployment");
    output::kv("stack", &stack.name);
    output::kv("variant", variant);
    output::kv("domain", &deployment.domain_name);
    output::kv("region", or_deploy_time(&deployment.region));
    output::kv("account", or_deploy_time(&deployment.account));

    output::section("Service");
    output::kv("launch", if variant.uses_ec2() { "EC2" } else { "FARGATE" });
    output::kv("image", deployment.repository());
    if variant.uses_ec2() {
        output::kv(
            "capacity",
            format!(
                "{} x {}..{}",
                constants::INSTANCE_TYPE,
                constants::INSTANCE_MIN,
                constants::INSTANCE_MAX
            ),
        );
    }
    output::kv("tasks", config.service.desired_count);
    output::kv(
        "scaling",
        format!("{}..{}", config.service.min_capacity, config.service.max_capacity),
    );
    if let Some(prefix) = deployment.stream_prefix() {
        output::kv("logs", prefix);
    }
    if variant.uses_secrets() {
        let catalogue = config.catalogue()?;
        output::kv(
            "secrets",
            format!(
                "{} ({} encrypted)",
                catalogue.len(),
                catalogue.encrypted().count()
            ),
        );
    }
    output::kv("listener", if variant.uses_tls() { "HTTPS :443" } else { "HTTP :80" });
    output::kv("resources", stack.template.resources().len());

    Ok(())
}
