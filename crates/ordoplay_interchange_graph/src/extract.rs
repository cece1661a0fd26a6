// SPDX-License-Identifier: MIT OR Apache-2.0
//! Group extraction.
//!
//! Walks a group's interface sockets, nodes and links through the host and
//! produces a [`Group`] snapshot. Nodes whose concrete type is not on the
//! allow-list get a property snapshot and their unlinked input defaults, so a
//! node type this code has never heard of still round-trips approximately.

use crate::config::InterchangeConfig;
use crate::host::{GroupEntry, GroupId, HostError, HostLink, HostNode, HostSocket, SceneHost};
use crate::schema::{Group, Link, Node, Socket, SocketDefault, SocketDirection};
use crate::value::{PortableValue, Sanitizer};
use std::collections::{HashMap, HashSet, VecDeque};

/// Extracts group snapshots from a scene host
pub struct GraphExtractor<'a, H: SceneHost + ?Sized> {
    host: &'a H,
    config: &'a InterchangeConfig,
    sanitizer: Sanitizer,
}

impl<'a, H: SceneHost + ?Sized> GraphExtractor<'a, H> {
    /// Create an extractor over a host
    pub fn new(host: &'a H, config: &'a InterchangeConfig) -> Self {
        Self {
            host,
            config,
            sanitizer: Sanitizer::new(config.extract.max_string_len),
        }
    }

    /// Extract a single group
    pub fn extract(&self, group: GroupId) -> Result<Group, ExtractError> {
        let entries = self.group_entries();
        self.extract_with_refs(group, &entries).map(|(g, _)| g)
    }

    /// Extract the seeds and every graph-kind group they reach through
    /// group nodes.
    ///
    /// Each group is extracted once, in breadth-first order from the seeds.
    /// A reference back to an already visited group stays a plain
    /// `group_ref`, so cyclic nesting terminates. Groups that fail to
    /// extract are logged and skipped.
    pub fn extract_closure(&self, seeds: &[GroupId]) -> Vec<Group> {
        let entries = self.group_entries();
        let mut visited = HashSet::new();
        let mut pending: VecDeque<GroupId> = VecDeque::new();
        let mut out = Vec::new();

        for seed in seeds {
            if visited.insert(*seed) {
                pending.push_back(*seed);
            }
        }

        while let Some(id) = pending.pop_front() {
            match self.extract_with_refs(id, &entries) {
                Ok((group, refs)) => {
                    for sub in refs {
                        let is_graph = entries
                            .get(&sub)
                            .is_some_and(|e| e.kind == self.config.graph_kind);
                        if is_graph && visited.insert(sub) {
                            pending.push_back(sub);
                        }
                    }
                    out.push(group);
                }
                Err(e) => {
                    tracing::warn!("Skipping group: {}", e);
                }
            }
        }

        out
    }

    fn group_entries(&self) -> HashMap<GroupId, GroupEntry> {
        self.host.groups().into_iter().map(|e| (e.id, e)).collect()
    }

    fn extract_with_refs(
        &self,
        id: GroupId,
        entries: &HashMap<GroupId, GroupEntry>,
    ) -> Result<(Group, Vec<GroupId>), ExtractError> {
        let entry = entries.get(&id).ok_or(ExtractError::GroupNotFound(id))?;
        let name = entry.name.clone();
        let host_err = |source: HostError| ExtractError::Host {
            group: name.clone(),
            source,
        };

        let inputs = self
            .host
            .group_sockets(id, SocketDirection::Input)
            .map_err(host_err)?;
        let outputs = self
            .host
            .group_sockets(id, SocketDirection::Output)
            .map_err(host_err)?;
        let host_nodes = self.host.group_nodes(id).map_err(host_err)?;
        let host_links = self.host.group_links(id).map_err(host_err)?;

        let mut nodes = Vec::with_capacity(host_nodes.len());
        let mut by_name: HashMap<&str, &HostNode> = HashMap::new();
        let mut refs = Vec::new();
        for host_node in &host_nodes {
            if by_name.contains_key(host_node.name.as_str()) {
                tracing::warn!(
                    "Duplicate node name '{}' in group '{}', keeping the first",
                    host_node.name,
                    name
                );
                continue;
            }
            by_name.insert(&host_node.name, host_node);
            if let Some(sub) = host_node.subgroup {
                refs.push(sub);
            }
            nodes.push(self.node(host_node, entries));
        }

        let links = host_links
            .iter()
            .filter(|l| {
                let valid = link_resolves(l, &by_name);
                if !valid {
                    tracing::warn!(
                        "Dropping dangling link {}:{} -> {}:{} in group '{}'",
                        l.from_node,
                        l.from_socket,
                        l.to_node,
                        l.to_socket,
                        name
                    );
                }
                valid
            })
            .map(|l| Link::new(&l.from_node, &l.from_socket, &l.to_node, &l.to_socket))
            .collect::<Vec<_>>();

        let mut group = Group {
            name,
            fingerprint: String::new(),
            inputs: inputs.iter().enumerate().map(|(i, s)| self.socket(i, s)).collect(),
            outputs: outputs.iter().enumerate().map(|(i, s)| self.socket(i, s)).collect(),
            nodes,
            links,
        };
        group.fingerprint = group.computed_fingerprint();

        tracing::debug!(
            "Extracted group '{}': {} nodes, {} links, {} unknown",
            group.name,
            group.nodes.len(),
            group.links.len(),
            group.unknown_nodes().count()
        );

        Ok((group, refs))
    }

    fn socket(&self, index: usize, socket: &HostSocket) -> Socket {
        Socket {
            index,
            name: socket.name.clone(),
            identifier: if socket.identifier.is_empty() {
                socket.name.clone()
            } else {
                socket.identifier.clone()
            },
            socket_type: socket.socket_type.clone(),
            default: self.portable(socket.default.as_ref()),
        }
    }

    fn node(&self, node: &HostNode, entries: &HashMap<GroupId, GroupEntry>) -> Node {
        let settings = &self.config.extract;
        let is_unknown = !settings.is_known(&node.type_id);

        let props = (is_unknown || !settings.snapshot_unknown_only).then(|| {
            node.properties
                .iter()
                .filter(|(key, _)| settings.snapshots_key(key))
                .map(|(key, value)| (key.clone(), self.sanitizer.sanitize(value)))
                .collect()
        });

        let inputs_defaults = is_unknown.then(|| {
            node.inputs
                .iter()
                .filter(|s| !s.is_linked)
                .map(|s| SocketDefault {
                    name: s.name.clone(),
                    socket_type: s.socket_type.clone(),
                    default: self.portable(s.default.as_ref()),
                })
                .collect()
        });

        Node {
            name: node.name.clone(),
            node_type: node.node_type.clone(),
            concrete_type: node.type_id.clone(),
            label: node.label.clone(),
            location: node.location,
            group_ref: node
                .subgroup
                .and_then(|sub| entries.get(&sub))
                .map(|e| e.name.clone()),
            is_unknown,
            props,
            inputs_defaults,
        }
    }

    fn portable(&self, value: Option<&crate::value::HostValue>) -> PortableValue {
        value.map_or(PortableValue::Null, |v| self.sanitizer.sanitize(v))
    }
}

/// Check both endpoints against the node set. Socket names are only checked
/// when the host lists sockets for that side of the node.
fn link_resolves(link: &HostLink, nodes: &HashMap<&str, &HostNode>) -> bool {
    let (Some(from), Some(to)) = (
        nodes.get(link.from_node.as_str()),
        nodes.get(link.to_node.as_str()),
    ) else {
        return false;
    };
    let from_ok = from.outputs.is_empty() || from.outputs.iter().any(|s| s.name == link.from_socket);
    let to_ok = to.inputs.is_empty() || to.inputs.iter().any(|s| s.name == link.to_socket);
    from_ok && to_ok
}

/// Error extracting a group
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    /// Group is not known to the host
    #[error("Group not found: {0:?}")]
    GroupNotFound(GroupId),

    /// Host query failed
    #[error("Failed to extract group '{group}': {source}")]
    Host {
        /// Group name
        group: String,
        /// Underlying host failure
        source: HostError,
    },
}
