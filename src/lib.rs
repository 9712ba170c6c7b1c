// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Conversion of Kubernetes manifests into a templated Kro `ResourceGroup`.
//!
//! The pipeline is a single pass: manifests are parsed, candidate parameters
//! (names, container images, resource requests) are lifted into a schema,
//! and every manifest is rewritten to reference that schema through
//! `${schema.spec.<name>}` placeholders.

mod error;
mod extract;
pub mod logging;
mod manifest;
mod relations;
mod resource_group;
mod rewrite;
mod schema;

pub use error::{Error, io_error, write_error};
pub use extract::{
    IMAGE_VARIABLE, NAME_VARIABLE, RESOURCES_VARIABLE, Variable, VariableMap, collect_variables,
    extract_variables
};
pub use manifest::{Manifest, load_manifests, parse_manifests};
pub use relations::{Relation, RelationKind, depends_on, detect_relations};
pub use resource_group::{
    ConversionOptions, DEFAULT_RESOURCE_GROUP_NAME, Metadata, OutputFormat,
    RESOURCE_GROUP_API_VERSION, RESOURCE_GROUP_KIND, Resource, ResourceGroup, ResourceGroupSpec,
    convert, convert_file, create_resource_group, write_resource_group
};
pub use rewrite::{placeholder, rewrite_manifest, rewrite_value, substitute};
pub use schema::{SCHEMA_API_VERSION, SCHEMA_KIND, Schema, build_schema, describe};
