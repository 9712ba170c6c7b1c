// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Construction of the Kro schema block from lifted variables.

use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::extract::{NAME_VARIABLE, VariableMap};

/// API version of the generated schema.
pub const SCHEMA_API_VERSION: &str = "v1alpha1";
/// Kind of the generated schema.
pub const SCHEMA_KIND: &str = "Application";

/// Schema envelope embedded in the resource group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schema {
    /// Always [`SCHEMA_API_VERSION`].
    pub api_version: String,
    /// Always [`SCHEMA_KIND`].
    pub kind:        String,
    /// Parameter name to descriptor, in variable insertion order.
    pub spec:        Mapping
}

/// Builds the schema for the aggregated variables.
///
/// String variables become compact `type | constraint` descriptors, mapping
/// variables are embedded verbatim, anything else is left out.
///
/// # Examples
///
/// ```
/// use k8s_to_kro::{VariableMap, build_schema};
/// use serde_yaml::Value;
///
/// let mut variables = VariableMap::new();
/// variables.insert("name", Value::from("web"));
/// variables.insert("image", Value::from("nginx"));
///
/// let schema = build_schema(&variables);
/// assert_eq!(schema.spec.get("name"), Some(&Value::from("string | required=true")));
/// assert_eq!(schema.spec.get("image"), Some(&Value::from("string | default=\"nginx\"")));
/// ```
pub fn build_schema(variables: &VariableMap) -> Schema {
    let spec = variables
        .iter()
        .filter_map(|variable| {
            describe(&variable.name, &variable.value)
                .map(|descriptor| (Value::from(variable.name.as_str()), descriptor))
        })
        .collect();

    Schema {
        api_version: SCHEMA_API_VERSION.to_owned(),
        kind: SCHEMA_KIND.to_owned(),
        spec
    }
}

/// Descriptor for a single variable, `None` when the value type has no
/// schema representation.
pub fn describe(name: &str, value: &Value) -> Option<Value> {
    match value {
        Value::String(_) if name == NAME_VARIABLE => Some(Value::from("string | required=true")),
        Value::String(default) => Some(Value::from(format!("string | default=\"{default}\""))),
        Value::Mapping(_) => Some(value.clone()),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yaml(source: &str) -> Value {
        serde_yaml::from_str(source).expect("expected valid yaml")
    }

    #[test]
    fn envelope_is_fixed() {
        let schema = build_schema(&VariableMap::new());

        assert_eq!(schema.api_version, "v1alpha1");
        assert_eq!(schema.kind, "Application");
        assert!(schema.spec.is_empty());
    }

    #[test]
    fn name_is_required_without_default() {
        assert_eq!(
            describe("name", &Value::from("web")),
            Some(Value::from("string | required=true"))
        );
    }

    #[test]
    fn other_strings_carry_quoted_default() {
        assert_eq!(
            describe("image", &Value::from("nginx:1.25")),
            Some(Value::from("string | default=\"nginx:1.25\""))
        );
    }

    #[test]
    fn mappings_are_embedded_verbatim() {
        let resources = yaml("limits:\n  cpu: 500m\nrequests:\n  memory: 64Mi\n");
        assert_eq!(describe("resources", &resources), Some(resources.clone()));
    }

    #[test]
    fn other_value_types_are_omitted() {
        let mut variables = VariableMap::new();
        variables.insert("name", Value::from(42));
        variables.insert("flags", yaml("[a, b]"));
        variables.insert("enabled", Value::from(true));

        let schema = build_schema(&variables);
        assert!(schema.spec.is_empty());
    }

    #[test]
    fn spec_follows_variable_order() {
        let mut variables = VariableMap::new();
        variables.insert("name", Value::from("web"));
        variables.insert("image", Value::from("nginx"));
        variables.insert("resources", yaml("limits: {}"));

        let schema = build_schema(&variables);
        let keys: Vec<&str> = schema.spec.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, ["name", "image", "resources"]);
    }

    #[test]
    fn serializes_with_camel_case_api_version() {
        let rendered = serde_yaml::to_string(&build_schema(&VariableMap::new()))
            .expect("expected serialization");
        assert!(rendered.starts_with("apiVersion: v1alpha1\nkind: Application\n"));
    }
}
