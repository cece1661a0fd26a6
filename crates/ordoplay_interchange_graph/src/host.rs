// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scene host capability.
//!
//! The interchange core never touches a live scene directly. Everything it
//! needs goes through [`SceneHost`]: enumerate objects, groups and bindings,
//! create objects, groups and bindings, read and write binding properties.
//! All calls are synchronous and only affect the entity they name.

use crate::schema::{Group, SocketDirection};
use crate::value::{HostValue, PropertyBag};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identity of a scene object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub Uuid);

/// Identity of a node group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GroupId(pub Uuid);

/// Identity of a binding (a group instance attached to an object)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BindingId(pub Uuid);

impl ObjectId {
    /// Create a new random object ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl GroupId {
    /// Create a new random group ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for GroupId {
    fn default() -> Self {
        Self::new()
    }
}

impl BindingId {
    /// Create a new random binding ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for BindingId {
    fn default() -> Self {
        Self::new()
    }
}

/// A scene object as listed by the host
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectEntry {
    /// Identity
    pub id: ObjectId,
    /// Name
    pub name: String,
    /// Collection the object is linked into
    pub collection: String,
    /// Visible in the active view and in final output
    pub visible: bool,
}

/// A node group as listed by the host
#[derive(Debug, Clone, PartialEq)]
pub struct GroupEntry {
    /// Identity
    pub id: GroupId,
    /// Name
    pub name: String,
    /// Graph kind (e.g. `GeometryNodeTree`)
    pub kind: String,
}

/// A binding as listed by the host
#[derive(Debug, Clone, PartialEq)]
pub struct BindingEntry {
    /// Identity
    pub id: BindingId,
    /// Binding name
    pub name: String,
    /// Whether this binding instantiates a node group at all
    pub is_graph: bool,
    /// Currently bound group
    pub group: Option<GroupId>,
    /// Enabled in the interactive preview
    pub show_preview: bool,
    /// Enabled in final output
    pub show_final: bool,
}

/// An interface socket as the host reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HostSocket {
    /// Display name
    pub name: String,
    /// Stable identifier
    pub identifier: String,
    /// Socket type tag
    pub socket_type: String,
    /// Default value, if the socket type has one
    pub default: Option<HostValue>,
}

/// A socket on a node as the host reports it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct HostNodeSocket {
    /// Socket name
    pub name: String,
    /// Socket type tag
    pub socket_type: String,
    /// Default value, if any
    pub default: Option<HostValue>,
    /// Whether a link is connected
    pub is_linked: bool,
}

/// A node as the host reports it
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HostNode {
    /// Name
    pub name: String,
    /// Declared type
    pub node_type: String,
    /// Concrete type id
    pub type_id: String,
    /// Label
    pub label: String,
    /// Position
    pub location: [f32; 2],
    /// Group instantiated by this node
    pub subgroup: Option<GroupId>,
    /// Every readable property, structural ones included
    pub properties: PropertyBag,
    /// Input sockets
    pub inputs: Vec<HostNodeSocket>,
    /// Output sockets
    pub outputs: Vec<HostNodeSocket>,
}

/// A link as the host reports it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct HostLink {
    /// Source node name
    pub from_node: String,
    /// Source socket name
    pub from_socket: String,
    /// Target node name
    pub to_node: String,
    /// Target socket name
    pub to_socket: String,
}

/// Synchronous access to a scene
pub trait SceneHost {
    /// All objects, in host order
    fn objects(&self) -> Vec<ObjectEntry>;

    /// All node groups of every kind, in host order
    fn groups(&self) -> Vec<GroupEntry>;

    /// Ordered interface sockets of a group
    fn group_sockets(
        &self,
        group: GroupId,
        direction: SocketDirection,
    ) -> Result<Vec<HostSocket>, HostError>;

    /// Nodes of a group
    fn group_nodes(&self, group: GroupId) -> Result<Vec<HostNode>, HostError>;

    /// Links of a group
    fn group_links(&self, group: GroupId) -> Result<Vec<HostLink>, HostError>;

    /// Bindings attached to an object, in host order
    fn bindings(&self, object: ObjectId) -> Result<Vec<BindingEntry>, HostError>;

    /// Read a binding property
    fn read_property(&self, binding: BindingId, key: &str) -> Result<HostValue, HostError>;

    /// Whether a binding exposes a property
    fn has_property(&self, binding: BindingId, key: &str) -> bool;

    /// Create an empty object in the default root container
    fn create_object(&mut self, name: &str) -> Result<ObjectId, HostError>;

    /// Materialize a group of the given kind from a snapshot
    fn create_group(&mut self, kind: &str, group: &Group) -> Result<GroupId, HostError>;

    /// Attach a new graph binding to an object
    fn create_binding(
        &mut self,
        object: ObjectId,
        name: &str,
        group: GroupId,
    ) -> Result<BindingId, HostError>;

    /// Point a binding at a different group
    fn set_binding_group(&mut self, binding: BindingId, group: GroupId) -> Result<(), HostError>;

    /// Set the enable flags of a binding; `None` leaves a flag untouched
    fn set_binding_flags(
        &mut self,
        binding: BindingId,
        show_preview: Option<bool>,
        show_final: Option<bool>,
    ) -> Result<(), HostError>;

    /// Write a binding property
    fn write_property(
        &mut self,
        binding: BindingId,
        key: &str,
        value: HostValue,
    ) -> Result<(), HostError>;

    /// Direct child collections of a collection. Hosts without nested
    /// collections report none.
    fn collection_children(&self, _collection: &str) -> Vec<String> {
        Vec::new()
    }

    /// Name of a group, if it exists
    fn group_name(&self, group: GroupId) -> Option<String> {
        self.groups().into_iter().find(|g| g.id == group).map(|g| g.name)
    }
}

/// Failure reported by a scene host
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum HostError {
    /// Object not found
    #[error("Object not found: {0:?}")]
    ObjectNotFound(ObjectId),

    /// Group not found
    #[error("Group not found: {0:?}")]
    GroupNotFound(GroupId),

    /// Binding not found
    #[error("Binding not found: {0:?}")]
    BindingNotFound(BindingId),

    /// Property does not exist on the binding
    #[error("Unknown property: {0}")]
    UnknownProperty(String),

    /// Value type does not fit the property
    #[error("Type mismatch writing {0}")]
    TypeMismatch(String),

    /// Property cannot be written
    #[error("Read-only property: {0}")]
    ReadOnly(String),

    /// Any other refusal
    #[error("{0}")]
    Rejected(String),
}

impl HostError {
    /// Whether this is a refused property write rather than a missing entity
    pub fn is_write_rejection(&self) -> bool {
        matches!(
            self,
            Self::UnknownProperty(_) | Self::TypeMismatch(_) | Self::ReadOnly(_)
        )
    }
}
