//! Resource name generation.
//!
//! Every resource that must not collide across parallel deployments is named
//! `Kind` + `Namespace` + suffix, e.g. `DevTeam1VPC`.

use crate::core::types::{LogicalId, ResourceName};

/// Upper-case the first character, leaving the rest untouched.
///
/// Characters without an upper-case form (digits, `-`) pass through.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strip everything CloudFormation rejects in a logical ID.
pub fn logical_id(name: &str) -> LogicalId {
    name.chars().filter(|c| c.is_ascii_alphanumeric()).collect()
}

/// Produces collision-free names for one (kind, namespace) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namer {
    prefix: String,
}

impl Namer {
    /// Create a namer for a deployment kind (`dev`, `prod`) and namespace.
    pub fn new(kind: &str, namespace: &str) -> Self {
        Self {
            prefix: format!("{}{}", capitalize(kind), capitalize(namespace)),
        }
    }

    /// `capitalize(kind) + capitalize(namespace) + suffix`.
    pub fn generate_name(&self, suffix: &str) -> ResourceName {
        format!("{}{}", self.prefix, suffix)
    }

    /// Logical ID for a generated name.
    pub fn logical_id(&self, suffix: &str) -> LogicalId {
        logical_id(&self.generate_name(suffix))
    }

    /// The shared prefix, e.g. `DevTeam1`.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}
