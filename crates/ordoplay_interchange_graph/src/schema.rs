// SPDX-License-Identifier: MIT OR Apache-2.0
//! Canonical interchange schema.
//!
//! These are plain snapshots: produced fresh per extraction, decoded from
//! documents, never tied to a live host entity.

use crate::fingerprint;
use crate::value::PortableValue;
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Read `null` as the field's default instead of rejecting the record
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Socket direction on a group interface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SocketDirection {
    /// Input socket
    Input,
    /// Output socket
    Output,
}

/// An interface socket of a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Socket {
    /// Position in the interface, starting at 0
    pub index: usize,
    /// Display name
    pub name: String,
    /// Stable identifier, survives renames
    pub identifier: String,
    /// Socket type tag
    #[serde(rename = "type")]
    pub socket_type: String,
    /// Default value
    pub default: PortableValue,
}

impl Socket {
    /// Create a socket without a default value
    pub fn new(
        name: impl Into<String>,
        identifier: impl Into<String>,
        socket_type: impl Into<String>,
    ) -> Self {
        Self {
            index: 0,
            name: name.into(),
            identifier: identifier.into(),
            socket_type: socket_type.into(),
            default: PortableValue::Null,
        }
    }

    /// Set the position in the interface
    pub fn at(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Set the default value
    pub fn with_default(mut self, value: impl Into<PortableValue>) -> Self {
        self.default = value.into();
        self
    }
}

impl Default for Socket {
    fn default() -> Self {
        Self::new("", "", "")
    }
}

/// Default of an unconnected node input, captured for unknown nodes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SocketDefault {
    /// Socket name
    pub name: String,
    /// Socket type tag
    #[serde(rename = "type")]
    pub socket_type: String,
    /// Current default value
    pub default: PortableValue,
}

/// A node inside a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Node {
    /// Name, unique within its group
    pub name: String,
    /// Declared node type (e.g. `GROUP`, `MATH`)
    #[serde(rename = "type")]
    pub node_type: String,
    /// Concrete type id (e.g. `GeometryNodeSetPosition`)
    #[serde(alias = "bl_idname")]
    pub concrete_type: String,
    /// Display label
    #[serde(deserialize_with = "null_as_default")]
    pub label: String,
    /// Position in the editor
    pub location: [f32; 2],
    /// Name of the group this node instantiates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_ref: Option<String>,
    /// Whether the concrete type is outside the allow-list
    pub is_unknown: bool,
    /// Property snapshot (unknown nodes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub props: Option<IndexMap<String, PortableValue>>,
    /// Defaults of unconnected inputs (unknown nodes)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inputs_defaults: Option<Vec<SocketDefault>>,
}

impl Node {
    /// Create a node of the given declared and concrete type
    pub fn new(
        name: impl Into<String>,
        node_type: impl Into<String>,
        concrete_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
            concrete_type: concrete_type.into(),
            ..Self::default()
        }
    }

    /// Set the position
    pub fn with_location(mut self, x: f32, y: f32) -> Self {
        self.location = [x, y];
        self
    }
}

/// A link between two node sockets of the same group
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Link {
    /// Source node name
    pub from_node: String,
    /// Source socket name
    pub from_socket: String,
    /// Target node name
    pub to_node: String,
    /// Target socket name
    pub to_socket: String,
}

impl Link {
    /// Create a link
    pub fn new(
        from_node: impl Into<String>,
        from_socket: impl Into<String>,
        to_node: impl Into<String>,
        to_socket: impl Into<String>,
    ) -> Self {
        Self {
            from_node: from_node.into(),
            from_socket: from_socket.into(),
            to_node: to_node.into(),
            to_socket: to_socket.into(),
        }
    }

    /// Check if this link touches a node
    pub fn involves_node(&self, name: &str) -> bool {
        self.from_node == name || self.to_node == name
    }
}

/// A reusable named node group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Group {
    /// Group name
    pub name: String,
    /// Topology fingerprint
    pub fingerprint: String,
    /// Ordered input sockets
    #[serde(deserialize_with = "null_as_default")]
    pub inputs: Vec<Socket>,
    /// Ordered output sockets
    #[serde(deserialize_with = "null_as_default")]
    pub outputs: Vec<Socket>,
    /// Nodes
    #[serde(deserialize_with = "null_as_default")]
    pub nodes: Vec<Node>,
    /// Links
    #[serde(deserialize_with = "null_as_default")]
    pub links: Vec<Link>,
}

impl Group {
    /// Get a node by name
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.name == name)
    }

    /// Interface sockets in one direction
    pub fn sockets(&self, direction: SocketDirection) -> &[Socket] {
        match direction {
            SocketDirection::Input => &self.inputs,
            SocketDirection::Output => &self.outputs,
        }
    }

    /// Names of the groups instantiated by nodes of this group
    pub fn group_refs(&self) -> impl Iterator<Item = &str> {
        self.nodes.iter().filter_map(|n| n.group_ref.as_deref())
    }

    /// Nodes whose concrete type is outside the allow-list
    pub fn unknown_nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_unknown)
    }

    /// Recompute the fingerprint from nodes and links
    pub fn computed_fingerprint(&self) -> String {
        fingerprint::compute(&self.nodes, &self.links)
    }

    /// Whether the stored fingerprint matches the current topology
    pub fn fingerprint_matches(&self) -> bool {
        self.fingerprint == self.computed_fingerprint()
    }
}

/// Override values and flags for one graph binding
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Override {
    /// Target object name
    #[serde(alias = "object", deserialize_with = "null_as_default")]
    pub object_name: String,
    /// Binding name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modifier_name: Option<String>,
    /// Bound group name
    #[serde(alias = "group", deserialize_with = "null_as_default")]
    pub group_name: String,
    /// Enabled in the interactive preview
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_viewport: Option<bool>,
    /// Enabled in final output
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled_render: Option<bool>,
    /// Input values by key (display name, identifier or positional key)
    #[serde(deserialize_with = "null_as_default")]
    pub inputs: IndexMap<String, PortableValue>,
}

impl Override {
    /// Create an override targeting an object and group
    pub fn new(object_name: impl Into<String>, group_name: impl Into<String>) -> Self {
        Self {
            object_name: object_name.into(),
            group_name: group_name.into(),
            ..Self::default()
        }
    }

    /// Add an input value
    pub fn with_input(mut self, key: impl Into<String>, value: impl Into<PortableValue>) -> Self {
        self.inputs.insert(key.into(), value.into());
        self
    }
}

/// Everything exchanged in one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Bundle {
    /// Exported groups
    pub groups: Vec<Group>,
    /// Exported overrides
    pub overrides: Vec<Override>,
    /// Free-form export metadata
    pub meta: IndexMap<String, String>,
}
