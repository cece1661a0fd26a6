// SPDX-License-Identifier: MIT OR Apache-2.0
//! Bundle export.
//!
//! Scans the scene for graph bindings, collects their overrides and
//! extracts every group they reach.

use crate::collect::OverrideCollector;
use indexmap::IndexMap;
use std::collections::HashSet;
use ordoplay_interchange_graph::config::CONFIG_FORMAT_VERSION;
use ordoplay_interchange_graph::{Bundle, GraphExtractor, Group, InterchangeConfig, SceneHost};

/// Identifier written into the bundle metadata
pub const EXPORTER_ID: &str = "ordoplay_interchange";

/// Options for [`export_bundle`]
#[derive(Debug, Clone, Default)]
pub struct ExportOptions {
    /// Skip objects that are hidden
    pub only_visible: bool,
    /// Only export objects in these collections or their descendants.
    /// Empty means every object.
    pub target_collections: Vec<String>,
}

impl ExportOptions {
    /// Restrict the export to objects under the given collections
    pub fn in_collections<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.target_collections = names.into_iter().map(Into::into).collect();
        self
    }
}

/// Names of `targets` and every collection nested below them
fn collection_closure<H: SceneHost + ?Sized>(host: &H, targets: &[String]) -> HashSet<String> {
    let mut seen = HashSet::new();
    let mut stack: Vec<String> = targets.to_vec();
    while let Some(name) = stack.pop() {
        if seen.insert(name.clone()) {
            stack.extend(host.collection_children(&name));
        }
    }
    seen
}

/// Export overrides and the groups they use
pub fn export_bundle<H: SceneHost + ?Sized>(
    host: &H,
    config: &InterchangeConfig,
    options: &ExportOptions,
) -> Bundle {
    let collector = OverrideCollector::new(host, config);
    let mut overrides = Vec::new();
    let mut seeds = Vec::new();
    let allowed = (!options.target_collections.is_empty())
        .then(|| collection_closure(host, &options.target_collections));

    for object in host.objects() {
        if options.only_visible && !object.visible {
            continue;
        }
        if allowed.as_ref().is_some_and(|a| !a.contains(&object.collection)) {
            continue;
        }
        for (ov, group) in collector.collect_with_groups(object.id) {
            if !seeds.contains(&group) {
                seeds.push(group);
            }
            overrides.push(ov);
        }
    }

    let groups = GraphExtractor::new(host, config).extract_closure(&seeds);
    let meta = bundle_meta(&groups, overrides.len(), config, options);
    tracing::info!(
        "Exported {} groups and {} overrides",
        groups.len(),
        overrides.len()
    );

    Bundle {
        groups,
        overrides,
        meta,
    }
}

fn bundle_meta(
    groups: &[Group],
    overrides: usize,
    config: &InterchangeConfig,
    options: &ExportOptions,
) -> IndexMap<String, String> {
    let unknown: Vec<String> = groups
        .iter()
        .flat_map(|g| {
            g.unknown_nodes()
                .map(move |n| format!("{}:{}:{}", g.name, n.name, n.concrete_type))
        })
        .collect();
    if !unknown.is_empty() {
        tracing::warn!("{} nodes of unknown type were snapshotted", unknown.len());
    }
    let preview: Vec<&str> = unknown
        .iter()
        .take(config.extract.max_unknown_preview)
        .map(String::as_str)
        .collect();

    let mut meta = IndexMap::new();
    meta.insert("exporter".to_string(), EXPORTER_ID.to_string());
    meta.insert("format_version".to_string(), CONFIG_FORMAT_VERSION.to_string());
    meta.insert("only_visible".to_string(), options.only_visible.to_string());
    meta.insert("target_collections".to_string(), options.target_collections.join(","));
    meta.insert("groups_count".to_string(), groups.len().to_string());
    meta.insert("overrides_count".to_string(), overrides.to_string());
    meta.insert("unknown_nodes_count".to_string(), unknown.len().to_string());
    meta.insert("unknown_nodes_preview".to_string(), preview.join("; "));
    meta
}
