//! Deployment identity.
//!
//! Reads the deployment environment once at startup into an immutable
//! [`Deployment`] that every declaration function borrows.

use tracing::debug;

use crate::core::constants::*;
use crate::core::naming::Namer;
use crate::core::validation::validate_identity;
use crate::error::{ConfigError, Result};

/// Which flavour of the stack to synthesize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// Fargate service behind a plain HTTP listener.
    #[default]
    Basic,
    /// EC2 capacity, container logs, and an HTTPS listener with a certificate.
    Tls,
    /// `Tls` plus container secrets resolved from the parameter store.
    Secure,
}

impl Variant {
    /// Whether the service runs on cluster-managed EC2 instances.
    pub fn uses_ec2(self) -> bool {
        !matches!(self, Variant::Basic)
    }

    /// Whether the listener terminates TLS.
    pub fn uses_tls(self) -> bool {
        !matches!(self, Variant::Basic)
    }

    /// Whether container secrets are wired from SSM.
    pub fn uses_secrets(self) -> bool {
        matches!(self, Variant::Secure)
    }

    /// Environment variables that must be non-empty, in reporting order.
    pub fn required_vars(self) -> &'static [&'static str] {
        match self {
            Variant::Basic | Variant::Tls => &[ENV_KIND, ENV_NAMESPACE, ENV_DOMAIN],
            Variant::Secure => &[
                ENV_KIND,
                ENV_NAMESPACE,
                ENV_DOMAIN,
                ENV_LOG_STREAM_PREFIX,
                ENV_ECR_REPO,
                ENV_APP_NAME,
                ENV_KMS_KEY_ID,
            ],
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Basic => "basic",
            Variant::Tls => "tls",
            Variant::Secure => "secure",
        }
    }
}

impl std::fmt::Display for Variant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The diagnostic printed for a missing environment variable.
pub fn missing_var_message(var: &str) -> String {
    format!("Please `export {}=` within your shell.", var)
}

/// Deployment identity, sourced once from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deployment {
    pub variant: Variant,
    /// Deployment type, e.g. `dev` or `prod`.
    pub kind: String,
    pub namespace: String,
    pub domain_name: String,
    /// Empty means "the region the template is deployed to".
    pub region: String,
    /// Empty means "the account the template is deployed to".
    pub account: String,
    pub log_stream_prefix: Option<String>,
    pub ecr_repo_name: Option<String>,
    pub app_name: Option<String>,
    pub kms_key_id: Option<String>,
}

impl Deployment {
    /// Read the deployment from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingVariables` naming every required variable
    /// that is unset or empty.
    pub fn from_env(variant: Variant) -> Result<Self> {
        Self::from_lookup(variant, |key| std::env::var(key).ok())
    }

    /// Read the deployment through an arbitrary lookup.
    ///
    /// Unset and empty are treated the same.
    pub fn from_lookup<F>(variant: Variant, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).unwrap_or_default();

        let missing: Vec<&'static str> = variant
            .required_vars()
            .iter()
            .copied()
            .filter(|var| get(var).is_empty())
            .collect();

        if !missing.is_empty() {
            debug!(?missing, "deployment environment incomplete");
            return Err(ConfigError::MissingVariables(missing).into());
        }

        for var in [ENV_KIND, ENV_NAMESPACE] {
            validate_identity(var, &get(var))?;
        }

        let optional = |key: &str| Some(get(key)).filter(|v| !v.is_empty());

        let deployment = Self {
            variant,
            kind: get(ENV_KIND),
            namespace: get(ENV_NAMESPACE),
            domain_name: get(ENV_DOMAIN),
            region: get(ENV_REGION),
            account: get(ENV_ACCOUNT),
            log_stream_prefix: optional(ENV_LOG_STREAM_PREFIX),
            ecr_repo_name: optional(ENV_ECR_REPO),
            app_name: optional(ENV_APP_NAME),
            kms_key_id: optional(ENV_KMS_KEY_ID),
        };

        debug!(
            variant = %variant,
            kind = %deployment.kind,
            namespace = %deployment.namespace,
            "deployment loaded"
        );

        Ok(deployment)
    }

    /// Name generator for this deployment.
    pub fn namer(&self) -> Namer {
        Namer::new(&self.kind, &self.namespace)
    }

    /// The stack name, e.g. `DevTeam1LaravelOnAwsWorkshopStack`.
    pub fn stack_name(&self) -> String {
        self.namer().generate_name(STACK_SUFFIX)
    }

    /// ECR repository the container image is pulled from.
    pub fn repository(&self) -> &str {
        match self.variant {
            Variant::Secure => self.ecr_repo_name.as_deref().unwrap_or(DEFAULT_ECR_REPO),
            _ => DEFAULT_ECR_REPO,
        }
    }

    /// Log stream prefix, when the variant ships container logs.
    pub fn stream_prefix(&self) -> Option<&str> {
        match self.variant {
            Variant::Basic => None,
            Variant::Tls => Some(DEFAULT_LOG_STREAM_PREFIX),
            Variant::Secure => self.log_stream_prefix.as_deref(),
        }
    }

    /// Parameter store path for an application key: `/{kind}/{app}/{key}`.
    pub fn parameter_path(&self, key: &str) -> String {
        format!(
            "/{}/{}/{}",
            self.kind,
            self.app_name.as_deref().unwrap_or_default(),
            key
        )
    }

    /// Host operators should point at the load balancer.
    pub fn site_host(&self) -> String {
        format!("{}.{}", SITE_HOST, self.domain_name)
    }
}
