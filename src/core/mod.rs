//! Core library components.
//!
//! This module contains the reusable declaration logic: the deployment
//! identity, naming, the template model, and the stack builders.

pub mod cidr;
pub mod config;
pub mod constants;
pub mod deployment;
pub mod naming;
pub mod secrets;
pub mod stack;
pub mod template;
pub mod types;
pub mod validation;
