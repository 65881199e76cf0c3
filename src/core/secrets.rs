//! Container secrets from the SSM parameter store.
//!
//! Each catalogue key becomes a container environment variable whose value
//! ECS fetches from `/{kind}/{app}/{KEY}` when the task starts. Encrypted
//! keys are pinned to the version stored in the sibling `{KEY}ver`
//! parameter and decrypted with the deployment's KMS key.

use serde_json::{json, Value};
use std::collections::HashSet;
use tracing::debug;

use crate::core::deployment::Deployment;
use crate::core::naming::logical_id;
use crate::core::template::intrinsic::{account_or_pseudo, region_or_pseudo, sub};
use crate::core::template::{Parameter, Template};
use crate::core::types::{LogicalId, ParameterPath, SecretKey};
use crate::core::validation::validate_key;
use crate::error::{ConfigError, Result};

/// Keys read as plain `String` parameters.
const DEFAULT_PLAIN: &[&str] = &[
    "APP_NAME",
    "APP_ENV",
    "APP_DEBUG",
    "APP_URL",
    "LOG_CHANNEL",
    "DB_CONNECTION",
    "DB_HOST",
    "DB_PORT",
    "DB_DATABASE",
    "BROADCAST_DRIVER",
    "CACHE_DRIVER",
    "QUEUE_CONNECTION",
    "SESSION_DRIVER",
    "SESSION_LIFETIME",
    "REDIS_HOST",
    "REDIS_PORT",
    "MAIL_DRIVER",
    "MAIL_HOST",
    "MAIL_PORT",
    "MAIL_ENCRYPTION",
    "MAIL_FROM_ADDRESS",
    "MAIL_FROM_NAME",
];

/// Keys stored as `SecureString`.
const DEFAULT_ENCRYPTED: &[&str] = &[
    "APP_KEY",
    "DB_USERNAME",
    "DB_PASSWORD",
    "REDIS_PASSWORD",
    "MAIL_USERNAME",
    "MAIL_PASSWORD",
    "ZZZ_KEY",
];

/// One catalogue entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretSpec {
    pub key: SecretKey,
    pub encrypted: bool,
}

/// The application keys injected into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalogue {
    entries: Vec<SecretSpec>,
}

impl Default for Catalogue {
    fn default() -> Self {
        let spec = |encrypted: bool| {
            move |key: &&str| SecretSpec {
                key: key.to_string(),
                encrypted,
            }
        };
        let entries = DEFAULT_PLAIN
            .iter()
            .map(spec(false))
            .chain(DEFAULT_ENCRYPTED.iter().map(spec(true)))
            .collect();
        Self { entries }
    }
}

impl Catalogue {
    /// Build a catalogue from plain and encrypted key lists.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::EmptyCatalogue` if both lists are empty,
    /// `ConfigError::InvalidSecretKey` for a malformed key, and
    /// `ConfigError::DuplicateSecret` if two keys would share a name or a
    /// template logical ID.
    pub fn from_lists(plain: &[String], encrypted: &[String]) -> Result<Self> {
        if plain.is_empty() && encrypted.is_empty() {
            return Err(ConfigError::EmptyCatalogue.into());
        }

        let mut seen = HashSet::new();
        let mut entries = Vec::with_capacity(plain.len() + encrypted.len());

        let tagged = plain
            .iter()
            .map(|k| (k, false))
            .chain(encrypted.iter().map(|k| (k, true)));

        for (key, is_encrypted) in tagged {
            validate_key(key)?;
            if !seen.insert(logical_id(key)) {
                return Err(ConfigError::DuplicateSecret(key.clone()).into());
            }
            entries.push(SecretSpec {
                key: key.clone(),
                encrypted: is_encrypted,
            });
        }

        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SecretSpec] {
        &self.entries
    }

    pub fn encrypted(&self) -> impl Iterator<Item = &SecretSpec> {
        self.entries.iter().filter(|s| s.encrypted)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How an encrypted reference is resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Encryption {
    /// KMS key the execution role decrypts with.
    pub key_arn: Value,
    /// Template parameter holding the pinned version number.
    pub version_parameter: LogicalId,
}

/// A deferred lookup of one parameter, resolved by ECS at container start.
#[derive(Debug, Clone, PartialEq)]
pub struct SecretReference {
    pub key: SecretKey,
    pub parameter_path: ParameterPath,
    pub encryption: Option<Encryption>,
    region: String,
    account: String,
}

impl SecretReference {
    fn arn_prefix(&self) -> String {
        format!(
            "arn:${{AWS::Partition}}:ssm:{}:{}:parameter{}",
            region_or_pseudo(&self.region),
            account_or_pseudo(&self.account),
            self.parameter_path
        )
    }

    /// ARN of the parameter, as granted to the execution role.
    pub fn parameter_arn(&self) -> Value {
        sub(self.arn_prefix())
    }

    /// The `ValueFrom` ECS resolves; encrypted keys pin a version.
    pub fn value_from(&self) -> Value {
        match &self.encryption {
            Some(enc) => sub(format!("{}:${{{}}}", self.arn_prefix(), enc.version_parameter)),
            None => self.parameter_arn(),
        }
    }

    /// The container definition `Secrets` entry.
    pub fn to_container_secret(&self) -> Value {
        json!({ "Name": self.key, "ValueFrom": self.value_from() })
    }
}

/// ARN of the deployment's KMS key.
pub fn kms_key_arn(deployment: &Deployment) -> Value {
    sub(format!(
        "arn:${{AWS::Partition}}:kms:{}:{}:key/{}",
        region_or_pseudo(&deployment.region),
        account_or_pseudo(&deployment.account),
        deployment.kms_key_id.as_deref().unwrap_or_default()
    ))
}

/// Declare the lookups for every catalogue key.
///
/// Encrypted keys add one `AWS::SSM::Parameter::Value<String>` template
/// parameter each, pointing at `{path}ver`.
pub fn resolve(
    deployment: &Deployment,
    catalogue: &Catalogue,
    template: &mut Template,
) -> Result<Vec<SecretReference>> {
    let namer = deployment.namer();
    let key_arn = kms_key_arn(deployment);
    let mut refs = Vec::with_capacity(catalogue.len());

    for spec in catalogue.entries() {
        let parameter_path = deployment.parameter_path(&spec.key);

        let encryption = if spec.encrypted {
            let version_path = format!("{}ver", parameter_path);
            let id = template.add_parameter(
                namer.logical_id(&format!("Ssm{}ver", spec.key)),
                Parameter::ssm_string(version_path)
                    .describe(format!("Version of the {} SecureString", spec.key)),
            )?;
            Some(Encryption {
                key_arn: key_arn.clone(),
                version_parameter: id,
            })
        } else {
            None
        };

        refs.push(SecretReference {
            key: spec.key.clone(),
            parameter_path,
            encryption,
            region: deployment.region.clone(),
            account: deployment.account.clone(),
        });
    }

    debug!(
        secrets = refs.len(),
        encrypted = catalogue.encrypted().count(),
        "secrets resolved"
    );

    Ok(refs)
}
