// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph binding overrides for `OrdoPlay` interchange.
//!
//! A binding attaches a node group to a scene object and carries per-input
//! override values. This crate:
//! - Collects the effective overrides from live bindings
//! - Applies override documents back, creating bindings and placeholders
//! - Exports a whole bundle of overrides plus the groups they use
//!
//! Host access goes through [`ordoplay_interchange_graph::SceneHost`].

pub mod keys;
pub mod stats;
pub mod collect;
pub mod apply;
pub mod bundle;

pub use keys::{InputSlot, KeyMatch, KeyPlanner, WritePlan};
pub use stats::{ApplyStats, FailureKind, ItemResult, ItemStats};
pub use collect::OverrideCollector;
pub use apply::OverrideApplier;
pub use bundle::{export_bundle, ExportOptions, EXPORTER_ID};
