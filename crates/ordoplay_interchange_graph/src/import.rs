// SPDX-License-Identifier: MIT OR Apache-2.0
//! Group import.
//!
//! Materializes decoded groups into a host. Only missing groups are created;
//! a group that already exists under the same name is left alone and
//! reported as unchanged or conflicting depending on its fingerprint.

use crate::config::InterchangeConfig;
use crate::extract::GraphExtractor;
use crate::host::{GroupId, SceneHost};
use crate::resolve::{find_within, MatchTier};
use crate::schema::Group;
use serde::Serialize;

/// Outcome of importing a list of groups
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Groups created
    pub created: usize,
    /// Groups already present with the same fingerprint
    pub unchanged: usize,
    /// Groups already present with a different fingerprint
    pub conflicts: usize,
    /// Groups the host refused to create
    pub failed: usize,
}

/// Import groups that the host does not have yet
pub fn import_groups<H: SceneHost + ?Sized>(
    host: &mut H,
    groups: &[Group],
    config: &InterchangeConfig,
) -> ImportStats {
    let mut stats = ImportStats::default();

    for group in groups {
        match existing_group(host, &group.name, config) {
            Some(id) => {
                let current = GraphExtractor::new(&*host, config).extract(id);
                match current {
                    Ok(current) if current.fingerprint == group.computed_fingerprint() => {
                        stats.unchanged += 1;
                    }
                    Ok(_) => {
                        tracing::warn!(
                            "Group '{}' exists with a different topology, leaving it untouched",
                            group.name
                        );
                        stats.conflicts += 1;
                    }
                    Err(e) => {
                        tracing::warn!("Could not compare existing group: {}", e);
                        stats.conflicts += 1;
                    }
                }
            }
            None => match host.create_group(&config.graph_kind, group) {
                Ok(_) => {
                    tracing::debug!("Created group '{}'", group.name);
                    stats.created += 1;
                }
                Err(e) => {
                    tracing::warn!("Failed to create group '{}': {}", group.name, e);
                    stats.failed += 1;
                }
            },
        }
    }

    tracing::info!(
        "Group import: created={} unchanged={} conflicts={} failed={}",
        stats.created,
        stats.unchanged,
        stats.conflicts,
        stats.failed
    );
    stats
}

fn existing_group<H: SceneHost + ?Sized>(
    host: &H,
    name: &str,
    config: &InterchangeConfig,
) -> Option<GroupId> {
    let entries = host.groups();
    find_within(
        entries
            .iter()
            .filter(|e| e.kind == config.graph_kind)
            .map(|e| (e.name.as_str(), e.id)),
        name,
        MatchTier::Exact,
    )
    .map(|(id, _)| id)
}
