// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Assembly and rendering of the Kro `ResourceGroup` document.

use std::{io, path::Path};

use serde::Serialize;
use serde_yaml::Value;
use tracing::info;

use crate::{
    error::Error,
    extract::collect_variables,
    manifest::{Manifest, load_manifests, parse_manifests},
    relations::{depends_on, detect_relations},
    rewrite::rewrite_manifest,
    schema::{Schema, build_schema}
};

/// API version of the emitted document.
pub const RESOURCE_GROUP_API_VERSION: &str = "kro.run/v1alpha1";
/// Kind of the emitted document.
pub const RESOURCE_GROUP_KIND: &str = "ResourceGroup";
/// Default `metadata.name` of the emitted document.
pub const DEFAULT_RESOURCE_GROUP_NAME: &str = "converted-application";

/// Tunables for a conversion run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionOptions {
    /// Value of `metadata.name` on the resource group.
    pub name:                String,
    /// Whether to populate `dependsOn` from detected relations.
    pub detect_dependencies: bool
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            name:                DEFAULT_RESOURCE_GROUP_NAME.to_owned(),
            detect_dependencies: false
        }
    }
}

/// Encoding used when rendering the resource group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Block-style YAML.
    #[default]
    Yaml,
    /// Pretty-printed JSON.
    Json
}

/// The aggregate Kro document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceGroup {
    /// Always [`RESOURCE_GROUP_API_VERSION`].
    pub api_version: String,
    /// Always [`RESOURCE_GROUP_KIND`].
    pub kind:        String,
    /// Document metadata.
    pub metadata:    Metadata,
    /// Schema and resource templates.
    pub spec:        ResourceGroupSpec
}

/// `metadata` block of the resource group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    /// Resource group name.
    pub name: String
}

/// `spec` block of the resource group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResourceGroupSpec {
    /// Generated parameter schema.
    pub schema:    Schema,
    /// One template per input manifest, in input order.
    pub resources: Vec<Resource>
}

/// One templated resource.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Lower-cased kind of the source manifest. Not unique.
    pub id:         String,
    /// Rewritten manifest body.
    pub template:   Value,
    /// Ids this resource depends on.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>
}

/// Converts manifests into a resource group.
///
/// Variables from all manifests are merged first, so a value lifted from a
/// later manifest is also substituted in earlier ones. Manifests sharing a
/// kind produce resources with duplicate ids.
///
/// # Errors
///
/// Propagates extraction errors for malformed Deployments.
pub fn create_resource_group(
    manifests: &[Manifest],
    options: &ConversionOptions
) -> Result<ResourceGroup, Error> {
    let variables = collect_variables(manifests)?;
    info!("Collected {} variables from {} manifests", variables.len(), manifests.len());

    let relations = if options.detect_dependencies {
        detect_relations(manifests)
    } else {
        Vec::new()
    };

    let resources = manifests
        .iter()
        .map(|manifest| {
            let id = manifest.resource_id();
            Resource {
                depends_on: depends_on(&relations, &id),
                template: rewrite_manifest(manifest, &variables),
                id
            }
        })
        .collect();

    Ok(ResourceGroup {
        api_version: RESOURCE_GROUP_API_VERSION.to_owned(),
        kind:        RESOURCE_GROUP_KIND.to_owned(),
        metadata:    Metadata {
            name: options.name.clone()
        },
        spec:        ResourceGroupSpec {
            schema: build_schema(&variables),
            resources
        }
    })
}

/// Parses a YAML stream and converts it into a resource group.
///
/// # Errors
///
/// Returns parse, manifest and extraction errors.
///
/// # Examples
///
/// ```
/// use k8s_to_kro::{ConversionOptions, convert};
///
/// let yaml = "kind: Service\nmetadata:\n  name: web\n";
/// let group = convert(yaml, &ConversionOptions::default()).expect("valid input");
/// assert_eq!(group.spec.resources[0].id, "service");
/// ```
pub fn convert(contents: &str, options: &ConversionOptions) -> Result<ResourceGroup, Error> {
    let manifests = parse_manifests(contents)?;
    create_resource_group(&manifests, options)
}

/// Loads the YAML stream at `path` and converts it into a resource group.
///
/// # Errors
///
/// Returns [`Error::Io`] when the file cannot be read, and the errors of
/// [`convert`] otherwise.
pub fn convert_file(path: &Path, options: &ConversionOptions) -> Result<ResourceGroup, Error> {
    let manifests = load_manifests(path)?;
    create_resource_group(&manifests, options)
}

/// Renders the resource group to `writer` in the requested format.
///
/// # Errors
///
/// Returns [`Error::RenderYaml`] or [`Error::RenderJson`] when encoding or the
/// underlying write fails.
pub fn write_resource_group<W: io::Write>(
    writer: &mut W,
    group: &ResourceGroup,
    format: OutputFormat
) -> Result<(), Error> {
    match format {
        OutputFormat::Yaml => serde_yaml::to_writer(writer, group).map_err(|source| {
            Error::RenderYaml {
                source
            }
        }),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, group)?;
            writer.write_all(b"\n").map_err(|source| Error::RenderJson {
                source: serde_json::Error::io(source)
            })
        }
    }
}
