// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Detection of dependencies between manifests of the same stream.
//!
//! Two relations are recognized:
//!
//! * a Service whose `spec.selector` matches a Deployment's pod template
//!   labels depends on that Deployment;
//! * an Ingress whose rules route to a Service backend by name depends on
//!   that Service.

use serde_yaml::Value;
use tracing::debug;

use crate::manifest::{Manifest, lookup};

/// How a relation was discovered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// Service selector matching Deployment pod labels.
    Selector,
    /// Ingress backend naming a Service.
    Backend
}

/// Directed dependency from `source` to `target`, both resource ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Id of the dependent resource.
    pub source: String,
    /// Id of the resource it depends on.
    pub target: String,
    /// Detection rule that produced the relation.
    pub kind:   RelationKind
}

/// Detects relations across every ordered pair of manifests.
///
/// Manifests that lack the probed fields simply produce no relation.
pub fn detect_relations(manifests: &[Manifest]) -> Vec<Relation> {
    let mut relations = Vec::new();

    for source in manifests {
        for target in manifests {
            let kind = match (source.kind(), target.kind()) {
                ("Service", "Deployment") if selects(source, target) => RelationKind::Selector,
                ("Ingress", "Service") if routes_to(source, target) => RelationKind::Backend,
                _ => continue
            };

            debug!(
                "Detected {:?} relation {} -> {}",
                kind,
                source.resource_id(),
                target.resource_id()
            );
            relations.push(Relation {
                source: source.resource_id(),
                target: target.resource_id(),
                kind
            });
        }
    }

    relations
}

/// Target ids the resource `id` depends on, deduplicated in first-seen order.
pub fn depends_on(relations: &[Relation], id: &str) -> Vec<String> {
    let mut targets: Vec<String> = Vec::new();
    for relation in relations.iter().filter(|relation| relation.source == id) {
        if !targets.contains(&relation.target) {
            targets.push(relation.target.clone());
        }
    }
    targets
}

fn selects(service: &Manifest, deployment: &Manifest) -> bool {
    let Some(selector) = service.lookup(&["spec", "selector"]).and_then(Value::as_mapping) else {
        return false;
    };
    let Some(labels) = deployment
        .lookup(&["spec", "template", "metadata", "labels"])
        .and_then(Value::as_mapping)
    else {
        return false;
    };

    !selector.is_empty() && selector.iter().all(|(key, value)| labels.get(key) == Some(value))
}

fn routes_to(ingress: &Manifest, service: &Manifest) -> bool {
    let Some(service_name) = service.name().and_then(Value::as_str) else {
        return false;
    };
    let Some(rules) = ingress.lookup(&["spec", "rules"]).and_then(Value::as_sequence) else {
        return false;
    };

    rules
        .iter()
        .filter_map(|rule| lookup(rule, &["http", "paths"]).and_then(Value::as_sequence))
        .flatten()
        .filter_map(|path| lookup(path, &["backend", "service", "name"]).and_then(Value::as_str))
        .any(|backend| backend == service_name)
}
