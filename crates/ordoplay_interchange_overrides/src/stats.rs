// SPDX-License-Identifier: MIT OR Apache-2.0
//! Apply statistics.
//!
//! Batches are not transactional: earlier items stay applied when later ones
//! fail. Each item reports an [`ItemStats`] and the batch folds them into an
//! append-only [`ApplyStats`].

use serde::Serialize;
use std::fmt;

/// Why an item did not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FailureKind {
    /// The document entry had the wrong structure
    MalformedDocument,
    /// Target object not found and placeholders disabled
    UnresolvedObject,
    /// Group not found and no placeholder possible
    UnresolvedGroup,
    /// Every input write was refused
    WriteRejected,
    /// The host failed outside of a property write
    HostApi,
}

/// Outcome of a single override item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default)]
pub enum ItemResult {
    /// Resolved against existing entities and applied
    #[default]
    Applied,
    /// Applied, but at least one placeholder had to be created
    Placeholder,
    /// Aborted
    Failed(FailureKind),
}

/// Counters for one override item
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ItemStats {
    /// Outcome
    pub result: ItemResult,
    /// Bindings created
    pub created_bindings: usize,
    /// Placeholder objects and groups created
    pub placeholders: usize,
    /// Input values written
    pub inputs_set: usize,
    /// Input keys that could not be written
    pub inputs_failed: usize,
    /// Target object missing
    pub missing_object: bool,
    /// Group missing
    pub missing_group: bool,
}

impl ItemStats {
    /// Mark the item as failed
    pub fn fail(&mut self, kind: FailureKind) {
        self.result = ItemResult::Failed(kind);
        match kind {
            FailureKind::UnresolvedObject => self.missing_object = true,
            FailureKind::UnresolvedGroup => self.missing_group = true,
            _ => {}
        }
    }

    /// Whether the item completed
    pub fn succeeded(&self) -> bool {
        !matches!(self.result, ItemResult::Failed(_))
    }
}

/// Accumulated counters for a batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ApplyStats {
    /// Items received, including dropped document entries
    pub overrides: usize,
    /// Items processed
    pub targets: usize,
    /// Bindings created
    pub created_bindings: usize,
    /// Placeholder objects and groups created
    pub placeholders: usize,
    /// Input values written
    pub inputs_set: usize,
    /// Input keys that could not be written
    pub inputs_failed: usize,
    /// Items whose object was missing
    pub missing_objects: usize,
    /// Items whose group was missing
    pub missing_groups: usize,
    /// Items that ended in [`ItemResult::Failed`]
    pub failed_items: usize,
    /// Document entries dropped before processing
    pub malformed: usize,
}

impl ApplyStats {
    /// Fold one item into the batch totals
    pub fn absorb(&mut self, item: &ItemStats) {
        self.targets += 1;
        self.created_bindings += item.created_bindings;
        self.placeholders += item.placeholders;
        self.inputs_set += item.inputs_set;
        self.inputs_failed += item.inputs_failed;
        self.missing_objects += usize::from(item.missing_object);
        self.missing_groups += usize::from(item.missing_group);
        self.failed_items += usize::from(!item.succeeded());
    }

    /// Merge another batch into this one
    pub fn merge(&mut self, other: &ApplyStats) {
        self.overrides += other.overrides;
        self.targets += other.targets;
        self.created_bindings += other.created_bindings;
        self.placeholders += other.placeholders;
        self.inputs_set += other.inputs_set;
        self.inputs_failed += other.inputs_failed;
        self.missing_objects += other.missing_objects;
        self.missing_groups += other.missing_groups;
        self.failed_items += other.failed_items;
        self.malformed += other.malformed;
    }
}

impl fmt::Display for ApplyStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "overrides={} targets={} created_bindings={} inputs_set={} failed={} placeholders={} \
             missing_objects={} missing_groups={} malformed={}",
            self.overrides,
            self.targets,
            self.created_bindings,
            self.inputs_set,
            self.inputs_failed,
            self.placeholders,
            self.missing_objects,
            self.missing_groups,
            self.malformed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb() {
        let mut batch = ApplyStats::default();
        batch.absorb(&ItemStats {
            created_bindings: 1,
            inputs_set: 2,
            inputs_failed: 1,
            ..ItemStats::default()
        });
        let mut missing = ItemStats::default();
        missing.fail(FailureKind::UnresolvedObject);
        batch.absorb(&missing);

        assert_eq!(batch.targets, 2);
        assert_eq!(batch.created_bindings, 1);
        assert_eq!(batch.inputs_set, 2);
        assert_eq!(batch.missing_objects, 1);
        assert_eq!(batch.failed_items, 1);
    }

    #[test]
    fn test_summary_line() {
        let stats = ApplyStats {
            overrides: 3,
            targets: 3,
            inputs_set: 5,
            ..ApplyStats::default()
        };
        let line = stats.to_string();
        assert!(line.starts_with("overrides=3 targets=3"));
        assert!(line.contains("inputs_set=5"));
    }
}
