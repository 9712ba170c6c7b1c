// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Loading of Kubernetes manifest streams.
//!
//! A manifest is kept as a generic YAML tree. The only structural guarantee
//! enforced at load time is that the document is a mapping carrying a string
//! `kind`, everything else is probed lazily by the extractor and the
//! dependency detector.

use std::{fs, path::Path};

use serde::Deserialize;
use serde_yaml::Value;
use tracing::debug;

use crate::error::{self, Error};

/// One parsed Kubernetes resource document.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    document: usize,
    kind:     String,
    body:     Value
}

impl Manifest {
    /// Wraps a parsed YAML document.
    ///
    /// # Parameters
    ///
    /// * `document` - One-based position of the document in its stream, used
    ///   for diagnostics.
    /// * `body` - The parsed document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Manifest`] when the document is not a mapping or has
    /// no string `kind` field.
    pub fn from_value(document: usize, body: Value) -> Result<Self, Error> {
        if !body.is_mapping() {
            return Err(Error::manifest(document, "document is not a mapping"));
        }

        let kind = match body.get("kind") {
            Some(Value::String(kind)) => kind.clone(),
            Some(_) => return Err(Error::manifest(document, "`kind` must be a string")),
            None => return Err(Error::manifest(document, "missing `kind` field"))
        };

        Ok(Self {
            document,
            kind,
            body
        })
    }

    /// One-based position of this manifest in the input stream.
    pub fn document(&self) -> usize {
        self.document
    }

    /// The manifest `kind`, e.g. `Deployment`.
    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// Identifier used for the resource entry: the lower-cased kind.
    ///
    /// Not unique across a stream, two manifests of the same kind share it.
    pub fn resource_id(&self) -> String {
        self.kind.to_lowercase()
    }

    /// The raw `metadata.name` value, whatever its type.
    pub fn name(&self) -> Option<&Value> {
        self.lookup(&["metadata", "name"])
    }

    /// Follows `path` through nested mappings.
    ///
    /// Returns `None` as soon as a segment is missing or the current node is
    /// not a mapping.
    pub fn lookup(&self, path: &[&str]) -> Option<&Value> {
        lookup(&self.body, path)
    }

    /// Borrows the whole document.
    pub fn body(&self) -> &Value {
        &self.body
    }
}

pub(crate) fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |node, segment| node.as_mapping()?.get(*segment))
}

/// Loads every manifest from the YAML stream stored at `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read, and the errors of
/// [`parse_manifests`] otherwise.
pub fn load_manifests(path: &Path) -> Result<Vec<Manifest>, Error> {
    debug!("Reading manifests from {}", path.display());
    let contents = fs::read_to_string(path).map_err(|source| error::io_error(path, source))?;
    parse_manifests(&contents)
}

/// Parses a stream of YAML documents into manifests, skipping empty ones.
///
/// # Errors
///
/// Returns [`Error::Parse`] on invalid YAML and [`Error::Manifest`] when a
/// non-empty document is not a mapping with a string `kind`.
///
/// # Examples
///
/// ```
/// use k8s_to_kro::parse_manifests;
///
/// let yaml = "kind: Service\n---\n---\nkind: ConfigMap\n";
/// let manifests = parse_manifests(yaml).expect("valid stream");
/// assert_eq!(manifests.len(), 2);
/// assert_eq!(manifests[1].kind(), "ConfigMap");
/// ```
pub fn parse_manifests(contents: &str) -> Result<Vec<Manifest>, Error> {
    let mut manifests = Vec::new();

    for (index, document) in serde_yaml::Deserializer::from_str(contents).enumerate() {
        let mut value = Value::deserialize(document)?;
        value.apply_merge()?;
        if is_empty_document(&value) {
            debug!("Skipping empty document {}", index + 1);
            continue;
        }
        manifests.push(Manifest::from_value(index + 1, value)?);
    }

    debug!("Parsed {} manifests", manifests.len());
    Ok(manifests)
}

fn is_empty_document(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Mapping(mapping) => mapping.is_empty(),
        Value::Sequence(items) => items.is_empty(),
        Value::String(text) => text.is_empty(),
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_i64() == Some(0) || number.as_f64() == Some(0.0),
        _ => false
    }
}
