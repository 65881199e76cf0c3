//! CloudFormation intrinsic functions.
//!
//! Thin constructors over `serde_json::Value` so declaration code reads like
//! the template it produces.

use serde_json::{json, Value};

/// `{"Ref": id}`
pub fn reference(id: &str) -> Value {
    json!({ "Ref": id })
}

/// `{"Fn::GetAtt": [id, attribute]}`
pub fn get_att(id: &str, attribute: &str) -> Value {
    json!({ "Fn::GetAtt": [id, attribute] })
}

/// `{"Fn::Sub": template}`
pub fn sub(template: impl Into<String>) -> Value {
    json!({ "Fn::Sub": template.into() })
}

/// `{"Fn::Join": [separator, parts]}`
pub fn join(separator: &str, parts: Vec<Value>) -> Value {
    json!({ "Fn::Join": [separator, parts] })
}

/// `{"Fn::Select": [index, list]}`
pub fn select(index: usize, list: Value) -> Value {
    json!({ "Fn::Select": [index.to_string(), list] })
}

/// Availability zones of the deployment region.
pub fn azs() -> Value {
    json!({ "Fn::GetAZs": "" })
}

/// A `Key`/`Value` tag.
pub fn tag(key: &str, value: impl Into<Value>) -> Value {
    json!({ "Key": key, "Value": value.into() })
}

/// Region literal, or the `AWS::Region` pseudo parameter when unknown.
pub fn region_or_pseudo(region: &str) -> String {
    if region.is_empty() {
        "${AWS::Region}".to_string()
    } else {
        region.to_string()
    }
}

/// Account literal, or the `AWS::AccountId` pseudo parameter when unknown.
pub fn account_or_pseudo(account: &str) -> String {
    if account.is_empty() {
        "${AWS::AccountId}".to_string()
    } else {
        account.to_string()
    }
}

/// Render a value as operator-facing text.
///
/// Values only known after deployment become placeholders such as
/// `<DevTeam1ALB.DNSName>`; joins and substitutions are flattened.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Object(map) if map.len() == 1 => {
            if let Some(Value::String(id)) = map.get("Ref") {
                return format!("<{}>", id);
            }
            if let Some(Value::Array(parts)) = map.get("Fn::GetAtt") {
                let parts: Vec<String> = parts.iter().map(render).collect();
                return format!("<{}>", parts.join("."));
            }
            if let Some(Value::Array(args)) = map.get("Fn::Join") {
                if let [Value::String(sep), Value::Array(parts)] = args.as_slice() {
                    let parts: Vec<String> = parts.iter().map(render).collect();
                    return parts.join(sep.as_str());
                }
            }
            if let Some(Value::String(template)) = map.get("Fn::Sub") {
                return template.clone();
            }
            value.to_string()
        }
        other => other.to_string(),
    }
}
