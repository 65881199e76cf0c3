//! Constants used throughout berth.
//!
//! Centralizes environment variable names and the fixed sizing of the stack.

/// Optional configuration file name.
pub const CONFIG_FILE: &str = "berth.toml";

/// Default directory synthesized templates are written to.
pub const OUT_DIR: &str = "berth.out";

/// Environment variable that overrides the log filter.
pub const LOG_ENV: &str = "BERTH_LOG";

pub const ENV_REGION: &str = "CDK_DEFAULT_REGION";
pub const ENV_ACCOUNT: &str = "CDK_DEFAULT_ACCOUNT";
pub const ENV_KIND: &str = "THIS_DEPLOYMENT_ENV";
pub const ENV_NAMESPACE: &str = "THIS_DEPLOYMENT_NAMESPACE";
pub const ENV_DOMAIN: &str = "THIS_DEPLOYMENT_DOMAINNAME";
pub const ENV_LOG_STREAM_PREFIX: &str = "THIS_LOG_STREAM_PREFIX";
pub const ENV_ECR_REPO: &str = "THIS_ECR_REPO_NAME";
pub const ENV_APP_NAME: &str = "APP_NAME";
pub const ENV_KMS_KEY_ID: &str = "THIS_AWS_KMS_KEY_ID";

/// Suffix the stack name is generated from.
pub const STACK_SUFFIX: &str = "LaravelOnAwsWorkshopStack";

/// Repository pulled by the basic variant.
pub const DEFAULT_ECR_REPO: &str = "my-laravel-on-aws-ecs-workshop-dev";

/// Log stream prefix used by the tls variant.
pub const DEFAULT_LOG_STREAM_PREFIX: &str = "MyLaravel";

/// Host label operators are told to point at the load balancer.
pub const SITE_HOST: &str = "mylaravel";

pub const VPC_CIDR: &str = "10.0.0.0/16";
pub const SUBNET_MASK: u8 = 24;
pub const MAX_AZS: usize = 2;

pub const CONTAINER_NAME: &str = "defaultContainer";
pub const CONTAINER_PORT: u16 = 80;
pub const TASK_CPU: u32 = 256;
pub const TASK_MEMORY_MIB: u32 = 512;
pub const FARGATE_CONTAINER_MEMORY_MIB: u32 = 256;
pub const DESIRED_COUNT: u32 = 2;

pub const INSTANCE_TYPE: &str = "t3.small";
pub const INSTANCE_MIN: u32 = 2;
pub const INSTANCE_MAX: u32 = 4;
pub const ECS_AMI_PARAMETER: &str =
    "/aws/service/ecs/optimized-ami/amazon-linux-2/recommended/image_id";

/// Six months, the closest retention CloudWatch Logs accepts.
pub const LOG_RETENTION_DAYS: u32 = 180;

pub const SCALING_MIN: u32 = 2;
pub const SCALING_MAX: u32 = 10;
pub const CPU_TARGET_PERCENT: f64 = 50.0;
pub const REQUESTS_PER_TARGET: f64 = 30.0;
