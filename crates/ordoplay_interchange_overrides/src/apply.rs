// SPDX-License-Identifier: MIT OR Apache-2.0
//! Override application.
//!
//! Each override walks the same steps: resolve the target object, resolve
//! the group, resolve or create the binding, write flags, write inputs.
//! Missing entities either abort the item or are replaced by placeholders.
//! Nothing is rolled back; a failed item never stops the batch.

use crate::keys::{InputSlot, KeyPlanner};
use crate::stats::{ApplyStats, FailureKind, ItemResult, ItemStats};
use ordoplay_interchange_graph::codec::{decode_overrides, DocumentShape};
use ordoplay_interchange_graph::{
    find, find_within, BindingId, Group, GroupId, HostError, HostValue, InterchangeConfig, Link,
    MatchTier, Node, ObjectId, Override, SceneHost, Socket, SocketDirection,
};
use serde_json::Value;

/// Writes overrides onto a host
pub struct OverrideApplier<'a, H: SceneHost + ?Sized> {
    host: &'a mut H,
    config: &'a InterchangeConfig,
    create_placeholders: bool,
}

impl<'a, H: SceneHost + ?Sized> OverrideApplier<'a, H> {
    /// Create an applier. Placeholders are enabled by default.
    pub fn new(host: &'a mut H, config: &'a InterchangeConfig) -> Self {
        Self {
            host,
            config,
            create_placeholders: true,
        }
    }

    /// Set whether missing objects and groups are replaced by placeholders
    pub fn create_placeholders(mut self, enabled: bool) -> Self {
        self.create_placeholders = enabled;
        self
    }

    /// Decode a document in any supported shape and apply its overrides
    pub fn apply_document(&mut self, doc: &Value) -> ApplyStats {
        let decoded = decode_overrides(doc, &self.config.document);
        if decoded.shape == DocumentShape::Unrecognized {
            tracing::warn!("Document contains no override records");
        }
        let mut stats = self.apply_batch(&decoded.items);
        stats.overrides += decoded.dropped;
        stats.malformed += decoded.dropped;
        stats
    }

    /// Apply a list of overrides in order
    pub fn apply_batch(&mut self, overrides: &[Override]) -> ApplyStats {
        let mut stats = ApplyStats {
            overrides: overrides.len(),
            ..ApplyStats::default()
        };
        for ov in overrides {
            let item = self.apply_one(ov);
            stats.absorb(&item);
        }
        tracing::info!("Override apply: {}", stats);
        stats
    }

    /// Apply a single override
    pub fn apply_one(&mut self, ov: &Override) -> ItemStats {
        let mut item = ItemStats::default();
        if let Err(e) = self.apply_steps(ov, &mut item) {
            tracing::warn!(
                "Override for '{}' / '{}' failed: {}",
                ov.object_name,
                ov.group_name,
                e
            );
            item.fail(FailureKind::HostApi);
        }
        if item.succeeded() && item.placeholders > 0 {
            item.result = ItemResult::Placeholder;
        }
        item
    }

    fn apply_steps(&mut self, ov: &Override, item: &mut ItemStats) -> Result<(), HostError> {
        let Some(object) = self.resolve_object(ov, item)? else {
            tracing::warn!("Object '{}' not found", ov.object_name);
            item.fail(FailureKind::UnresolvedObject);
            return Ok(());
        };
        let Some(group) = self.resolve_group(ov, item)? else {
            tracing::warn!("Group '{}' not found", ov.group_name);
            item.fail(FailureKind::UnresolvedGroup);
            return Ok(());
        };
        let binding = self.resolve_binding(object, group, ov, item)?;

        if ov.enabled_viewport.is_some() || ov.enabled_render.is_some() {
            self.host
                .set_binding_flags(binding, ov.enabled_viewport, ov.enabled_render)?;
        }

        self.apply_inputs(binding, group, ov, item)?;
        if item.inputs_set == 0 && item.inputs_failed > 0 {
            item.fail(FailureKind::WriteRejected);
        }
        Ok(())
    }

    fn resolve_object(
        &mut self,
        ov: &Override,
        item: &mut ItemStats,
    ) -> Result<Option<ObjectId>, HostError> {
        let name = if ov.object_name.is_empty() {
            self.config.placeholder.object_name.as_str()
        } else {
            ov.object_name.as_str()
        };
        let objects = self.host.objects();
        if let Some(id) = find(objects.iter().map(|o| (o.name.as_str(), o.id)), name) {
            return Ok(Some(id));
        }
        if !self.create_placeholders {
            return Ok(None);
        }
        let id = self.host.create_object(name)?;
        tracing::warn!("Object '{}' missing, created a placeholder", name);
        item.placeholders += 1;
        Ok(Some(id))
    }

    fn resolve_group(
        &mut self,
        ov: &Override,
        item: &mut ItemStats,
    ) -> Result<Option<GroupId>, HostError> {
        let groups = self.host.groups();
        let found = find(
            groups
                .iter()
                .filter(|g| g.kind == self.config.graph_kind)
                .map(|g| (g.name.as_str(), g.id)),
            &ov.group_name,
        );
        if found.is_some() {
            return Ok(found);
        }
        if !self.create_placeholders || ov.group_name.is_empty() {
            return Ok(None);
        }
        let placeholder = self.placeholder_group(&ov.group_name);
        let id = self.host.create_group(&self.config.graph_kind, &placeholder)?;
        tracing::warn!("Group '{}' missing, created a placeholder", ov.group_name);
        item.placeholders += 1;
        Ok(Some(id))
    }

    /// A group with one input and one output of the primary data type,
    /// wired straight through
    fn placeholder_group(&self, name: &str) -> Group {
        let cfg = &self.config.placeholder;
        let nodes = vec![
            Node::new("Group Input", "GROUP_INPUT", "NodeGroupInput").with_location(-200.0, 0.0),
            Node::new("Group Output", "GROUP_OUTPUT", "NodeGroupOutput").with_location(200.0, 0.0),
        ];
        let links = vec![Link::new(
            "Group Input",
            cfg.socket_name.as_str(),
            "Group Output",
            cfg.socket_name.as_str(),
        )];
        let mut group = Group {
            name: name.to_string(),
            inputs: vec![Socket::new(&cfg.socket_name, "Socket_0", &cfg.socket_type)],
            outputs: vec![Socket::new(&cfg.socket_name, "Socket_1", &cfg.socket_type)],
            nodes,
            links,
            ..Group::default()
        };
        group.fingerprint = group.computed_fingerprint();
        group
    }

    fn resolve_binding(
        &mut self,
        object: ObjectId,
        group: GroupId,
        ov: &Override,
        item: &mut ItemStats,
    ) -> Result<BindingId, HostError> {
        let bindings: Vec<_> = self
            .host
            .bindings(object)?
            .into_iter()
            .filter(|b| b.is_graph)
            .collect();

        let by_name = ov.modifier_name.as_deref().and_then(|name| {
            find_within(
                bindings.iter().map(|b| (b.name.as_str(), b)),
                name,
                MatchTier::Exact,
            )
        });
        // The override may name the group loosely; bindings are matched
        // against the name the group actually has.
        let group_name = self
            .host
            .group_name(group)
            .unwrap_or_else(|| ov.group_name.clone());
        let existing = match by_name {
            Some((b, _)) => Some(b),
            None => {
                let bound: Vec<(String, _)> = bindings
                    .iter()
                    .filter_map(|b| Some((self.host.group_name(b.group?)?, b)))
                    .collect();
                find_within(
                    bound.iter().map(|(name, b)| (name.as_str(), *b)),
                    &group_name,
                    MatchTier::Exact,
                )
                .map(|(b, _)| b)
            }
        };

        if let Some(binding) = existing {
            if binding.group != Some(group) {
                tracing::debug!("Rebinding '{}' to {:?}", binding.name, group);
                self.host.set_binding_group(binding.id, group)?;
            }
            return Ok(binding.id);
        }

        let name = ov
            .modifier_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(group_name.as_str());
        let id = self.host.create_binding(object, name, group)?;
        tracing::debug!("Created binding '{}'", name);
        item.created_bindings += 1;
        Ok(id)
    }

    fn apply_inputs(
        &mut self,
        binding: BindingId,
        group: GroupId,
        ov: &Override,
        item: &mut ItemStats,
    ) -> Result<(), HostError> {
        let planner = KeyPlanner::new(&self.config.keys);
        let sockets = self.host.group_sockets(group, SocketDirection::Input)?;
        let slots = InputSlot::from_sockets(&sockets);

        for (key, value) in &ov.inputs {
            if value.is_null() {
                tracing::debug!("Skipping '{}': no value", key);
                continue;
            }
            let Some(plan) = planner.plan(key, &slots) else {
                tracing::debug!("No input matches '{}'", key);
                item.inputs_failed += 1;
                continue;
            };

            let host_value = value.to_host();
            let mut written = None;
            for candidate in &plan.candidates {
                match self.host.write_property(binding, candidate, host_value.clone()) {
                    Ok(()) => {
                        written = Some(candidate);
                        break;
                    }
                    Err(e) if e.is_write_rejection() => {
                        tracing::debug!("Write '{}' -> '{}' refused: {}", key, candidate, e);
                    }
                    Err(e) => return Err(e),
                }
            }

            match written {
                Some(target) => {
                    tracing::debug!("Set '{}' via '{}' ({:?})", key, target, plan.matched);
                    self.clear_dynamic_source(binding, &planner, target);
                    item.inputs_set += 1;
                }
                None => {
                    tracing::debug!("Every candidate for '{}' was refused", key);
                    item.inputs_failed += 1;
                }
            }
        }
        Ok(())
    }

    fn clear_dynamic_source(&mut self, binding: BindingId, planner: &KeyPlanner<'_>, key: &str) {
        let flag = planner.dynamic_source_flag(key);
        if !self.host.has_property(binding, &flag) {
            return;
        }
        if let Err(e) = self.host.write_property(binding, &flag, HostValue::Bool(false)) {
            tracing::debug!("Could not clear '{}': {}", flag, e);
        }
    }
}
