//! Test fixtures and constants.

/// Every variable berth reads, cleared before each command.
pub const ALL_VARS: &[&str] = &[
    "CDK_DEFAULT_REGION",
    "CDK_DEFAULT_ACCOUNT",
    "THIS_DEPLOYMENT_ENV",
    "THIS_DEPLOYMENT_NAMESPACE",
    "THIS_DEPLOYMENT_DOMAINNAME",
    "THIS_LOG_STREAM_PREFIX",
    "THIS_ECR_REPO_NAME",
    "APP_NAME",
    "THIS_AWS_KMS_KEY_ID",
];

/// Variables for the basic and tls variants.
pub const BASIC_VARS: &[(&str, &str)] = &[
    ("THIS_DEPLOYMENT_ENV", "dev"),
    ("THIS_DEPLOYMENT_NAMESPACE", "team1"),
    ("THIS_DEPLOYMENT_DOMAINNAME", "example.com"),
];

/// Variables for the secure variant.
pub const SECURE_VARS: &[(&str, &str)] = &[
    ("CDK_DEFAULT_REGION", "eu-west-1"),
    ("CDK_DEFAULT_ACCOUNT", "123456789012"),
    ("THIS_DEPLOYMENT_ENV", "dev"),
    ("THIS_DEPLOYMENT_NAMESPACE", "team1"),
    ("THIS_DEPLOYMENT_DOMAINNAME", "example.com"),
    ("THIS_LOG_STREAM_PREFIX", "shop"),
    ("THIS_ECR_REPO_NAME", "shop-web"),
    ("APP_NAME", "shop"),
    ("THIS_AWS_KMS_KEY_ID", "1234abcd-12ab-34cd-56ef-1234567890ab"),
];

/// Stack name for BASIC_VARS and SECURE_VARS.
pub const STACK_NAME: &str = "DevTeam1LaravelOnAwsWorkshopStack";

/// A config that narrows the catalogue and resizes the service.
pub const SMALL_CONFIG: &str = r#"
[secrets]
plain = ["APP_NAME", "DB_HOST"]
encrypted = ["DB_PASSWORD"]

[service]
desired_count = 3
max_capacity = 6
"#;
