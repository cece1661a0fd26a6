// SPDX-License-Identifier: MIT OR Apache-2.0
//! Override collection.
//!
//! Reads the currently effective input values off every graph binding of an
//! object. A binding that cannot be read is skipped; the others still are.

use crate::keys::{InputSlot, KeyPlanner};
use indexmap::IndexMap;
use ordoplay_interchange_graph::{
    BindingEntry, GroupId, HostError, InterchangeConfig, ObjectEntry, ObjectId, Override,
    PortableValue, Sanitizer, SceneHost, SocketDirection,
};

/// Reads overrides from live bindings
pub struct OverrideCollector<'a, H: SceneHost + ?Sized> {
    host: &'a H,
    config: &'a InterchangeConfig,
    sanitizer: Sanitizer,
}

impl<'a, H: SceneHost + ?Sized> OverrideCollector<'a, H> {
    /// Create a collector over a host
    pub fn new(host: &'a H, config: &'a InterchangeConfig) -> Self {
        Self {
            host,
            config,
            sanitizer: Sanitizer::new(config.extract.max_string_len),
        }
    }

    /// Collect the overrides of every graph binding on an object
    pub fn collect(&self, object: ObjectId) -> Vec<Override> {
        self.collect_with_groups(object)
            .into_iter()
            .map(|(ov, _)| ov)
            .collect()
    }

    /// Like [`OverrideCollector::collect`], also returning the bound group
    /// of each override
    pub fn collect_with_groups(&self, object: ObjectId) -> Vec<(Override, GroupId)> {
        let Some(entry) = self.host.objects().into_iter().find(|o| o.id == object) else {
            tracing::warn!("Cannot collect overrides: object {:?} not found", object);
            return Vec::new();
        };
        let bindings = match self.host.bindings(object) {
            Ok(bindings) => bindings,
            Err(e) => {
                tracing::warn!("Cannot list bindings of '{}': {}", entry.name, e);
                return Vec::new();
            }
        };
        let graph_groups: IndexMap<GroupId, String> = self
            .host
            .groups()
            .into_iter()
            .filter(|g| g.kind == self.config.graph_kind)
            .map(|g| (g.id, g.name))
            .collect();

        bindings
            .iter()
            .filter(|b| b.is_graph)
            .filter_map(|b| {
                let group = b.group?;
                let group_name = graph_groups.get(&group)?;
                match self.binding_override(&entry, b, group, group_name) {
                    Ok(ov) => Some((ov, group)),
                    Err(e) => {
                        tracing::warn!("Override on '{}' ({}) failed: {}", entry.name, b.name, e);
                        None
                    }
                }
            })
            .collect()
    }

    fn binding_override(
        &self,
        object: &ObjectEntry,
        binding: &BindingEntry,
        group: GroupId,
        group_name: &str,
    ) -> Result<Override, HostError> {
        let planner = KeyPlanner::new(&self.config.keys);
        let sockets = self.host.group_sockets(group, SocketDirection::Input)?;
        let slots = InputSlot::from_sockets(&sockets);

        let mut inputs = IndexMap::new();
        for (socket, slot) in sockets.iter().zip(&slots) {
            let read = planner
                .read_candidates(slot)
                .into_iter()
                .find_map(|key| self.host.read_property(binding.id, &key).ok());
            let value = match read.as_ref().or(socket.default.as_ref()) {
                Some(v) => self.sanitizer.sanitize(v),
                None => PortableValue::Null,
            };
            let key = if socket.name.is_empty() {
                planner.positional(slot.ordinal)
            } else {
                socket.name.clone()
            };
            inputs.insert(key, value);
        }

        Ok(Override {
            object_name: object.name.clone(),
            modifier_name: Some(binding.name.clone()),
            group_name: group_name.to_string(),
            enabled_viewport: Some(binding.show_preview),
            enabled_render: Some(binding.show_final),
            inputs,
        })
    }
}
