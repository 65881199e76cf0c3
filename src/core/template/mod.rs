//! CloudFormation template model.
//!
//! A [`Template`] is the declaration graph handed to the provisioning tool.
//! Resources refer to each other by logical ID through `Ref`, `Fn::GetAtt`,
//! `Fn::Sub` and `DependsOn`; [`Template::validate`] checks every one of
//! those references lands on something declared.

pub mod intrinsic;

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::trace;

use crate::core::types::LogicalId;
use crate::error::{Result, SynthError};

const FORMAT_VERSION: &str = "2010-09-09";

/// One resource declaration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Resource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub properties: Value,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<LogicalId>,
}

impl Resource {
    pub fn new(resource_type: &str, properties: Value) -> Self {
        Self {
            resource_type: resource_type.to_string(),
            properties,
            depends_on: Vec::new(),
        }
    }

    /// Declare an explicit ordering dependency.
    pub fn depends_on(mut self, id: impl Into<LogicalId>) -> Self {
        self.depends_on.push(id.into());
        self
    }
}

/// A template parameter, resolved by CloudFormation at deploy time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(rename = "Type")]
    pub parameter_type: String,
    pub default: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    /// A parameter whose value is read from SSM by name.
    pub fn ssm_string(name: impl Into<String>) -> Self {
        Self {
            parameter_type: "AWS::SSM::Parameter::Value<String>".to_string(),
            default: name.into(),
            description: None,
        }
    }

    /// An SSM-backed parameter holding an EC2 image ID.
    pub fn ssm_image_id(name: impl Into<String>) -> Self {
        Self {
            parameter_type: "AWS::SSM::Parameter::Value<AWS::EC2::Image::Id>".to_string(),
            default: name.into(),
            description: None,
        }
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Export {
    pub name: String,
}

/// A stack output, shown to the operator after deployment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Output {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export: Option<Export>,
}

impl Output {
    /// An output exported under `name`.
    pub fn exported(value: Value, name: impl Into<String>) -> Self {
        Self {
            description: None,
            value,
            export: Some(Export { name: name.into() }),
        }
    }
}

/// The aggregate declaration graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Template {
    #[serde(rename = "AWSTemplateFormatVersion")]
    format_version: &'static str,
    #[serde(rename = "Description")]
    description: String,
    #[serde(rename = "Parameters", skip_serializing_if = "BTreeMap::is_empty")]
    parameters: BTreeMap<LogicalId, Parameter>,
    #[serde(rename = "Resources")]
    resources: BTreeMap<LogicalId, Resource>,
    #[serde(rename = "Outputs", skip_serializing_if = "BTreeMap::is_empty")]
    outputs: BTreeMap<LogicalId, Output>,
}

impl Template {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            description: description.into(),
            parameters: BTreeMap::new(),
            resources: BTreeMap::new(),
            outputs: BTreeMap::new(),
        }
    }

    /// Declare a resource.
    ///
    /// # Errors
    ///
    /// Returns `SynthError::DuplicateResource` if the logical ID is taken.
    pub fn add_resource(&mut self, id: impl Into<LogicalId>, resource: Resource) -> Result<LogicalId> {
        let id = id.into();
        self.claim(&id)?;
        trace!(id = %id, kind = %resource.resource_type, "resource declared");
        self.resources.insert(id.clone(), resource);
        Ok(id)
    }

    /// Declare a parameter.
    pub fn add_parameter(&mut self, id: impl Into<LogicalId>, parameter: Parameter) -> Result<LogicalId> {
        let id = id.into();
        self.claim(&id)?;
        self.parameters.insert(id.clone(), parameter);
        Ok(id)
    }

    /// Declare an output.
    pub fn add_output(&mut self, id: impl Into<LogicalId>, output: Output) -> Result<LogicalId> {
        let id = id.into();
        if self.outputs.contains_key(&id) {
            return Err(SynthError::DuplicateResource(id).into());
        }
        self.outputs.insert(id.clone(), output);
        Ok(id)
    }

    fn claim(&self, id: &str) -> Result<()> {
        if self.resources.contains_key(id) || self.parameters.contains_key(id) {
            return Err(SynthError::DuplicateResource(id.to_string()).into());
        }
        Ok(())
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Mutable access while the graph is still being assembled.
    pub fn resource_mut(&mut self, id: &str) -> Option<&mut Resource> {
        self.resources.get_mut(id)
    }

    pub fn resources(&self) -> &BTreeMap<LogicalId, Resource> {
        &self.resources
    }

    pub fn parameters(&self) -> &BTreeMap<LogicalId, Parameter> {
        &self.parameters
    }

    pub fn outputs(&self) -> &BTreeMap<LogicalId, Output> {
        &self.outputs
    }

    /// Resources of a given CloudFormation type.
    pub fn resources_of<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = (&'a LogicalId, &'a Resource)> + 'a {
        self.resources
            .iter()
            .filter(move |(_, r)| r.resource_type == resource_type)
    }

    fn is_declared(&self, id: &str) -> bool {
        id.starts_with("AWS::") || self.resources.contains_key(id) || self.parameters.contains_key(id)
    }

    /// Check every cross-reference resolves.
    ///
    /// # Errors
    ///
    /// Returns `SynthError::DanglingReference` for the first `Ref`,
    /// `Fn::GetAtt`, `Fn::Sub` variable or `DependsOn` entry that names
    /// nothing in the template.
    pub fn validate(&self) -> Result<()> {
        for (id, resource) in &self.resources {
            for dep in &resource.depends_on {
                if !self.resources.contains_key(dep) {
                    return Err(dangling(id, dep));
                }
            }
            self.check_refs(id, &resource.properties)?;
        }
        for (id, output) in &self.outputs {
            self.check_refs(id, &output.value)?;
        }
        Ok(())
    }

    fn check_refs(&self, from: &str, value: &Value) -> Result<()> {
        for target in references(value) {
            if !self.is_declared(&target) {
                return Err(dangling(from, &target));
            }
        }
        Ok(())
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self).map_err(SynthError::Serialize)?)
    }

    /// SHA-256 of the serialized template, hex-encoded.
    pub fn fingerprint(&self) -> Result<String> {
        let json = self.to_json()?;
        Ok(format!("{:x}", Sha256::digest(json.as_bytes())))
    }
}

fn dangling(from: &str, target: &str) -> crate::error::Error {
    SynthError::DanglingReference {
        from: from.to_string(),
        target: target.to_string(),
    }
    .into()
}

/// Every logical ID a value refers to.
pub fn references(value: &Value) -> Vec<String> {
    let mut out = Vec::new();
    collect_references(value, &mut out);
    out
}

fn collect_references(value: &Value, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(target)) = map.get("Ref") {
                out.push(target.clone());
            }
            if let Some(Value::Array(parts)) = map.get("Fn::GetAtt") {
                if let Some(Value::String(target)) = parts.first() {
                    out.push(target.clone());
                }
            }
            if let Some(Value::String(template)) = map.get("Fn::Sub") {
                out.extend(sub_variables(template));
            }
            for v in map.values() {
                collect_references(v, out);
            }
        }
        Value::Array(items) => {
            for v in items {
                collect_references(v, out);
            }
        }
        _ => {}
    }
}

/// Logical IDs named by `${...}` placeholders in a `Fn::Sub` string.
///
/// `${!Literal}` is an escape and `${Id.Attr}` refers to `Id`.
fn sub_variables(template: &str) -> Vec<String> {
    let mut vars = Vec::new();
    let mut rest = template;
    while let Some(start) = rest.find("${") {
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else { break };
        let var = &after[..end];
        if !var.starts_with('!') {
            let id = var.split('.').next().unwrap_or(var);
            vars.push(id.to_string());
        }
        rest = &after[end + 1..];
    }
    vars
}
