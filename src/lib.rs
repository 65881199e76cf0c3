//! Berth - CloudFormation for a load-balanced web application on ECS.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── synth         # Write the template
//! │   ├── check         # Validate the environment, show the plan
//! │   ├── secrets       # List the secrets catalogue
//! │   ├── name          # Print a generated resource name
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── deployment    # Deployment identity from the environment
//!     ├── config        # berth.toml overrides
//!     ├── naming        # Kind + Namespace + suffix names
//!     ├── secrets       # Parameter store references
//!     ├── template/     # CloudFormation template model
//!     └── stack/        # network, compute, edge, scaling
//! ```
//!
//! # Variants
//!
//! - `basic`: Fargate behind an HTTP listener
//! - `tls`: EC2 capacity, container logs, HTTPS with an ACM certificate
//! - `secure`: `tls` plus container secrets from SSM, decrypted with KMS

pub mod cli;
pub mod core;
pub mod error;
