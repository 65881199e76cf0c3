//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A CloudFormation logical ID (alphanumeric only).
pub type LogicalId = String;

/// A generated resource name, e.g. `DevTeam1VPC`.
pub type ResourceName = String;

/// An application configuration key injected into the container (e.g. DB_HOST).
pub type SecretKey = String;

/// A path in the SSM parameter store, e.g. `/dev/shop/DB_HOST`.
pub type ParameterPath = String;
