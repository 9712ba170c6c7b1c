// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Rewriting of manifests into Kro resource templates.
//!
//! Every scalar string leaf that equals a variable value is replaced with a
//! `${schema.spec.<name>}` placeholder. Matching is plain string equality
//! with no awareness of where the leaf lives, so a label value that happens
//! to equal the application name is rewritten as well.

use std::borrow::Cow;

use serde_yaml::{Mapping, Value, value::TaggedValue};

use crate::{extract::VariableMap, manifest::Manifest};

/// Placeholder expression referencing the schema parameter `name`.
///
/// ```
/// assert_eq!(k8s_to_kro::placeholder("image"), "${schema.spec.image}");
/// ```
pub fn placeholder(name: &str) -> String {
    format!("${{schema.spec.{name}}}")
}

/// Returns the manifest body with variable values replaced by placeholders.
///
/// The input manifest is left untouched. Mapping keys and non-string leaves
/// are never rewritten.
pub fn rewrite_manifest(manifest: &Manifest, variables: &VariableMap) -> Value {
    rewrite_value(manifest.body(), variables)
}

/// Recursively rewrites a YAML tree.
pub fn rewrite_value(value: &Value, variables: &VariableMap) -> Value {
    match value {
        Value::Mapping(mapping) => Value::Mapping(
            mapping
                .iter()
                .map(|(key, item)| (key.clone(), rewrite_value(item, variables)))
                .collect::<Mapping>()
        ),
        Value::Sequence(items) => {
            Value::Sequence(items.iter().map(|item| rewrite_value(item, variables)).collect())
        }
        Value::String(text) => match substitute(text, variables) {
            Some(replacement) => Value::String(replacement),
            None => value.clone()
        },
        Value::Tagged(tagged) => Value::Tagged(Box::new(TaggedValue {
            tag:   tagged.tag.clone(),
            value: rewrite_value(&tagged.value, variables)
        })),
        Value::Null | Value::Bool(_) | Value::Number(_) => value.clone()
    }
}

/// Placeholder for the first variable, in insertion order, whose value
/// renders to exactly `text`.
///
/// This is a linear scan on purpose: when two variables share a value the
/// one inserted first wins.
pub fn substitute(text: &str, variables: &VariableMap) -> Option<String> {
    variables
        .iter()
        .find(|variable| match_text(&variable.value).is_some_and(|candidate| candidate == text))
        .map(|variable| placeholder(&variable.name))
}

// Mirrors how the variable would print as text: integers in decimal,
// booleans capitalized. Floats, mappings and sequences never match a leaf.
fn match_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(text) => Some(Cow::Borrowed(text)),
        Value::Number(number) if number.is_i64() || number.is_u64() => {
            Some(Cow::Owned(number.to_string()))
        }
        Value::Bool(true) => Some(Cow::Borrowed("True")),
        Value::Bool(false) => Some(Cow::Borrowed("False")),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::manifest::{lookup, parse_manifests};

    fn variables(pairs: &[(&str, &str)]) -> VariableMap {
        let mut map = VariableMap::new();
        for (name, value) in pairs {
            map.insert(*name, Value::from(*value));
        }
        map
    }

    fn manifest(yaml: &str) -> Manifest {
        parse_manifests(yaml)
            .expect("expected valid manifest")
            .into_iter()
            .next()
            .expect("expected one manifest")
    }

    #[test]
    fn placeholder_uses_schema_spec_path() {
        assert_eq!(placeholder("name"), "${schema.spec.name}");
    }

    #[test]
    fn rewrites_matching_leaves_everywhere() {
        let source = manifest(
            "kind: Service\nmetadata:\n  name: app\n  labels:\n    team: app\n    tier: \
             backend\nspec:\n  selector:\n    app: app\n"
        );
        let rewritten = rewrite_manifest(&source, &variables(&[("name", "app")]));

        let expected = Value::from("${schema.spec.name}");
        assert_eq!(lookup(&rewritten, &["metadata", "name"]), Some(&expected));
        assert_eq!(lookup(&rewritten, &["metadata", "labels", "team"]), Some(&expected));
        assert_eq!(lookup(&rewritten, &["spec", "selector", "app"]), Some(&expected));
        assert_eq!(
            lookup(&rewritten, &["metadata", "labels", "tier"]).and_then(Value::as_str),
            Some("backend")
        );
    }

    #[test]
    fn keys_are_never_rewritten() {
        let source = manifest("kind: Service\nspec:\n  selector:\n    app: other\n");
        let rewritten = rewrite_manifest(&source, &variables(&[("name", "app")]));

        assert_eq!(
            lookup(&rewritten, &["spec", "selector", "app"]).and_then(Value::as_str),
            Some("other")
        );
    }

    #[test]
    fn rewrites_strings_inside_sequences() {
        let source = manifest(
            "kind: Deployment\nspec:\n  template:\n    spec:\n      containers:\n        - image: \
             nginx\n          args: [nginx, --port]\n"
        );
        let rewritten = rewrite_manifest(&source, &variables(&[("image", "nginx")]));

        let container = lookup(&rewritten, &["spec", "template", "spec", "containers"])
            .and_then(Value::as_sequence)
            .and_then(|items| items.first())
            .expect("expected container");
        assert_eq!(
            lookup(container, &["image"]).and_then(Value::as_str),
            Some("${schema.spec.image}")
        );
        let args = lookup(container, &["args"]).and_then(Value::as_sequence).expect("args");
        assert_eq!(args[0], Value::from("${schema.spec.image}"));
        assert_eq!(args[1], Value::from("--port"));
    }

    #[test]
    fn non_string_leaves_pass_through() {
        let source = manifest("kind: Deployment\nspec:\n  replicas: 3\n  paused: false\n");
        let rewritten = rewrite_manifest(&source, &variables(&[("replicas", "3")]));

        assert_eq!(lookup(&rewritten, &["spec", "replicas"]), Some(&Value::from(3)));
        assert_eq!(lookup(&rewritten, &["spec", "paused"]), Some(&Value::from(false)));
    }

    #[test]
    fn structured_variables_are_not_substituted() {
        let resources: Value =
            serde_yaml::from_str("limits:\n  cpu: 500m\n").expect("expected yaml");
        let mut map = VariableMap::new();
        map.insert("resources", resources);

        let source = manifest("kind: Pod\nspec:\n  resources:\n    limits:\n      cpu: 500m\n");
        let rewritten = rewrite_manifest(&source, &map);

        assert_eq!(&rewritten, source.body());
    }

    #[test]
    fn first_inserted_variable_wins_on_shared_value() {
        let map = variables(&[("name", "web"), ("image", "web")]);
        assert_eq!(substitute("web", &map).as_deref(), Some("${schema.spec.name}"));
    }

    #[test]
    fn numeric_variables_match_their_decimal_rendering() {
        let mut map = VariableMap::new();
        map.insert("name", Value::from(8080));

        assert_eq!(substitute("8080", &map).as_deref(), Some("${schema.spec.name}"));
        assert!(substitute("8080.0", &map).is_none());
    }

    #[test]
    fn boolean_variables_match_capitalized_text() {
        let mut map = VariableMap::new();
        map.insert("name", Value::from(true));

        assert_eq!(substitute("True", &map).as_deref(), Some("${schema.spec.name}"));
        assert!(substitute("true", &map).is_none());
    }

    #[test]
    fn float_variables_never_match() {
        let mut map = VariableMap::new();
        map.insert("name", serde_yaml::from_str("1e20").expect("expected yaml"));

        assert!(substitute("1e20", &map).is_none());
        assert!(substitute("1e+20", &map).is_none());
    }

    #[test]
    fn input_manifest_is_not_mutated() {
        let source = manifest("kind: Service\nmetadata:\n  name: app\n");
        let before = source.clone();
        let _ = rewrite_manifest(&source, &variables(&[("name", "app")]));

        assert_eq!(source, before);
    }

    proptest! {
        #[test]
        fn strings_without_matching_variable_are_unchanged(text in "[a-z0-9-]{1,16}") {
            let map = variables(&[("name", "NOT-LOWERCASE")]);
            let value = Value::from(text.as_str());
            prop_assert_eq!(rewrite_value(&value, &map), value);
        }

        #[test]
        fn matching_leaf_always_becomes_placeholder(text in "[a-z0-9.:/-]{1,24}") {
            let map = variables(&[("image", text.as_str())]);
            let mut tree: Value = serde_yaml::from_str("items: [x]").expect("expected yaml");
            if let Some(items) = tree.get_mut("items").and_then(Value::as_sequence_mut) {
                items.push(Value::from(text.as_str()));
            }

            let rewritten = rewrite_value(&tree, &map);
            let items = rewritten.get("items").and_then(Value::as_sequence).cloned().unwrap_or_default();
            prop_assert_eq!(items.len(), 2);
            prop_assert_eq!(&items[1], &Value::from("${schema.spec.image}"));
        }
    }
}
