// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Heuristic extraction of user-facing parameters from manifests.
//!
//! Only two shapes are recognized: any manifest's `metadata.name`, and the
//! first container of a Deployment pod template (`image` and `resources`).
//! Every other kind contributes nothing.

use serde_yaml::Value;
use tracing::debug;

use crate::{
    error::Error,
    manifest::{Manifest, lookup}
};

/// Variable name lifted from `metadata.name`.
pub const NAME_VARIABLE: &str = "name";
/// Variable name lifted from the first Deployment container image.
pub const IMAGE_VARIABLE: &str = "image";
/// Variable name lifted from the first Deployment container resources.
pub const RESOURCES_VARIABLE: &str = "resources";

/// A single lifted parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    /// Parameter name referenced by placeholders.
    pub name:  String,
    /// Literal value found in the manifest.
    pub value: Value
}

/// Insertion-ordered mapping from parameter name to literal value.
///
/// Inserting an existing name replaces its value but keeps its position, so
/// iteration order is the order in which names were first seen.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VariableMap {
    entries: Vec<Variable>
}

impl VariableMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `name`, returning the previous value if any.
    pub fn insert<N>(&mut self, name: N, value: Value) -> Option<Value>
    where
        N: Into<String>
    {
        let name = name.into();
        match self.entries.iter_mut().find(|entry| entry.name == name) {
            Some(entry) => Some(std::mem::replace(&mut entry.value, value)),
            None => {
                self.entries.push(Variable {
                    name,
                    value
                });
                None
            }
        }
    }

    /// Returns the value stored under `name`.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| &entry.value)
    }

    /// Iterates over variables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.entries.iter()
    }

    /// Number of distinct variable names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no variable has been recorded.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Folds `other` into `self` with plain overwrite semantics.
    pub fn merge(&mut self, other: Self) {
        for Variable {
            name,
            value
        } in other.entries
        {
            if let Some(previous) = self.insert(name.clone(), value) {
                debug!("Variable '{}' overwritten (previous value {:?})", name, previous);
            }
        }
    }
}

impl<'a> IntoIterator for &'a VariableMap {
    type Item = &'a Variable;
    type IntoIter = std::slice::Iter<'a, Variable>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Extracts the variables a single manifest yields.
///
/// # Errors
///
/// Returns [`Error::Manifest`] for Deployments whose `spec.template` lacks a
/// `spec`, whose `containers` is not a list, or whose first container has no
/// `image`.
///
/// # Examples
///
/// ```
/// use k8s_to_kro::{extract_variables, parse_manifests};
///
/// let manifests = parse_manifests("kind: Service\nmetadata:\n  name: web\n").unwrap();
/// let variables = extract_variables(&manifests[0]).unwrap();
/// assert_eq!(variables.get("name").and_then(|v| v.as_str()), Some("web"));
/// ```
pub fn extract_variables(manifest: &Manifest) -> Result<VariableMap, Error> {
    let mut variables = VariableMap::new();

    if let Some(name) = manifest.name() {
        variables.insert(NAME_VARIABLE, name.clone());
    }

    if manifest.kind() == "Deployment" {
        extract_deployment(manifest, &mut variables)?;
    }

    debug!(
        "Extracted {} variables from {} in document {}",
        variables.len(),
        manifest.kind(),
        manifest.document()
    );
    Ok(variables)
}

fn extract_deployment(manifest: &Manifest, variables: &mut VariableMap) -> Result<(), Error> {
    let Some(template) = manifest.lookup(&["spec", "template"]) else {
        return Ok(());
    };

    let pod_spec = lookup(template, &["spec"]).ok_or_else(|| {
        Error::manifest(manifest.document(), "Deployment `spec.template` has no `spec`")
    })?;

    let containers = match lookup(pod_spec, &["containers"]) {
        None | Some(Value::Null) => return Ok(()),
        Some(Value::Sequence(containers)) => containers,
        Some(_) => {
            return Err(Error::manifest(
                manifest.document(),
                "Deployment `containers` must be a list"
            ));
        }
    };

    let Some(first) = containers.first() else {
        return Ok(());
    };

    let image = lookup(first, &["image"]).ok_or_else(|| {
        Error::manifest(manifest.document(), "first Deployment container has no `image`")
    })?;
    variables.insert(IMAGE_VARIABLE, image.clone());

    if let Some(resources) = lookup(first, &["resources"]) {
        variables.insert(RESOURCES_VARIABLE, resources.clone());
    }

    Ok(())
}

/// Extracts variables from every manifest and merges them in order.
///
/// Later manifests overwrite earlier values for the same name; there is no
/// conflict detection.
///
/// # Errors
///
/// Propagates the first error returned by [`extract_variables`].
pub fn collect_variables(manifests: &[Manifest]) -> Result<VariableMap, Error> {
    manifests.iter().try_fold(VariableMap::new(), |mut merged, manifest| {
        merged.merge(extract_variables(manifest)?);
        Ok(merged)
    })
}
