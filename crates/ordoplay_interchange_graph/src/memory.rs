// SPDX-License-Identifier: MIT OR Apache-2.0
//! In-memory scene host.
//!
//! A complete [`SceneHost`] backed by plain data. It is what the command
//! line tool persists as RON and what every test in the workspace runs
//! against. Behavior follows the usual host conventions:
//! - New names that collide get a `.001` style suffix
//! - A binding exposes one property per input socket that has a default,
//!   keyed by the socket identifier, plus a companion flag named by the
//!   identifier and the scene's dynamic source suffix (`_use_attribute`)
//! - Objects live in one collection; collections nest under
//!   [`ROOT_COLLECTION`]
//! - Writes to unknown keys or with incompatible types are rejected

use crate::host::{
    BindingEntry, BindingId, GroupEntry, GroupId, HostError, HostLink, HostNode, HostNodeSocket,
    HostSocket, ObjectEntry, ObjectId, SceneHost,
};
use crate::schema::{Group, SocketDirection};
use crate::value::{HostValue, PropertyBag};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default suffix of the companion flag created next to each binding input
pub const DEFAULT_DYNAMIC_SOURCE_SUFFIX: &str = "_use_attribute";

/// Name of the collection new objects are linked into
pub const ROOT_COLLECTION: &str = "Scene Collection";

/// A node stored in a [`SceneGroup`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SceneNode {
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
    /// Name of the instantiated group
    pub group_ref: Option<String>,
    /// Node properties
    pub properties: PropertyBag,
    /// Input sockets (link state is derived from the group's links)
    pub inputs: Vec<HostNodeSocket>,
    /// Output sockets
    pub outputs: Vec<HostNodeSocket>,
}

impl SceneNode {
    /// Create a node
    pub fn new(
        name: impl Into<String>,
        node_type: impl Into<String>,
        type_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            node_type: node_type.into(),
            type_id: type_id.into(),
            ..Self::default()
        }
    }

    /// Set the label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Set the position
    pub fn with_location(mut self, x: f32, y: f32) -> Self {
        self.location = [x, y];
        self
    }

    /// Instantiate a group by name
    pub fn with_group_ref(mut self, group: impl Into<String>) -> Self {
        self.group_ref = Some(group.into());
        self
    }

    /// Add a property
    pub fn with_property(mut self, key: impl Into<String>, value: HostValue) -> Self {
        self.properties.insert(key.into(), value);
        self
    }

    /// Add an input socket
    pub fn with_input(mut self, socket: HostNodeSocket) -> Self {
        self.inputs.push(socket);
        self
    }

    /// Add an output socket
    pub fn with_output(mut self, socket: HostNodeSocket) -> Self {
        self.outputs.push(socket);
        self
    }
}

/// A node group stored in a [`MemoryScene`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SceneGroup {
    /// Name
    pub name: String,
    /// Graph kind
    pub kind: String,
    /// Ordered input sockets
    pub inputs: Vec<HostSocket>,
    /// Ordered output sockets
    pub outputs: Vec<HostSocket>,
    /// Nodes
    pub nodes: Vec<SceneNode>,
    /// Links
    pub links: Vec<HostLink>,
}

impl SceneGroup {
    /// Create an empty group
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            ..Self::default()
        }
    }

    /// Add an input socket
    pub fn with_input(mut self, socket: HostSocket) -> Self {
        self.inputs.push(socket);
        self
    }

    /// Add an output socket
    pub fn with_output(mut self, socket: HostSocket) -> Self {
        self.outputs.push(socket);
        self
    }

    /// Add a node
    pub fn with_node(mut self, node: SceneNode) -> Self {
        self.nodes.push(node);
        self
    }

    /// Add a link
    pub fn with_link(
        mut self,
        from_node: impl Into<String>,
        from_socket: impl Into<String>,
        to_node: impl Into<String>,
        to_socket: impl Into<String>,
    ) -> Self {
        self.links.push(HostLink {
            from_node: from_node.into(),
            from_socket: from_socket.into(),
            to_node: to_node.into(),
            to_socket: to_socket.into(),
        });
        self
    }

    /// Build a group from an interchange snapshot.
    ///
    /// Node sockets are not part of the snapshot; they are rebuilt from the
    /// unlinked defaults and from the link endpoints.
    pub fn from_snapshot(kind: &str, group: &Group) -> Self {
        let socket = |s: &crate::schema::Socket| HostSocket {
            name: s.name.clone(),
            identifier: s.identifier.clone(),
            socket_type: s.socket_type.clone(),
            default: (!s.default.is_null()).then(|| s.default.to_host()),
        };

        let nodes = group
            .nodes
            .iter()
            .map(|n| {
                let mut inputs: Vec<HostNodeSocket> = n
                    .inputs_defaults
                    .iter()
                    .flatten()
                    .map(|d| HostNodeSocket {
                        name: d.name.clone(),
                        socket_type: d.socket_type.clone(),
                        default: (!d.default.is_null()).then(|| d.default.to_host()),
                        is_linked: false,
                    })
                    .collect();
                let mut outputs: Vec<HostNodeSocket> = Vec::new();
                for link in &group.links {
                    if link.to_node == n.name && !inputs.iter().any(|s| s.name == link.to_socket) {
                        inputs.push(HostNodeSocket {
                            name: link.to_socket.clone(),
                            ..HostNodeSocket::default()
                        });
                    }
                    if link.from_node == n.name && !outputs.iter().any(|s| s.name == link.from_socket) {
                        outputs.push(HostNodeSocket {
                            name: link.from_socket.clone(),
                            ..HostNodeSocket::default()
                        });
                    }
                }
                SceneNode {
                    name: n.name.clone(),
                    node_type: n.node_type.clone(),
                    type_id: n.concrete_type.clone(),
                    label: n.label.clone(),
                    location: n.location,
                    group_ref: n.group_ref.clone(),
                    properties: n
                        .props
                        .iter()
                        .flatten()
                        .map(|(k, v)| (k.clone(), v.to_host()))
                        .collect(),
                    inputs,
                    outputs,
                }
            })
            .collect();

        Self {
            name: group.name.clone(),
            kind: kind.to_string(),
            inputs: group.inputs.iter().map(socket).collect(),
            outputs: group.outputs.iter().map(socket).collect(),
            nodes,
            links: group
                .links
                .iter()
                .map(|l| HostLink {
                    from_node: l.from_node.clone(),
                    from_socket: l.from_socket.clone(),
                    to_node: l.to_node.clone(),
                    to_socket: l.to_socket.clone(),
                })
                .collect(),
        }
    }
}

/// A group instance attached to a [`SceneObject`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneBinding {
    /// Identity
    pub id: BindingId,
    /// Name
    pub name: String,
    /// Whether this binding instantiates a node group
    pub is_graph: bool,
    /// Bound group
    pub group: Option<GroupId>,
    /// Enabled in the interactive preview
    pub show_preview: bool,
    /// Enabled in final output
    pub show_final: bool,
    /// Override properties
    pub properties: PropertyBag,
}

/// An object in a [`MemoryScene`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    /// Identity
    pub id: ObjectId,
    /// Name
    pub name: String,
    /// Owning collection
    pub collection: String,
    /// Visibility
    pub visible: bool,
    /// Attached bindings, in stack order
    pub bindings: Vec<SceneBinding>,
}

/// Scene host backed by plain data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryScene {
    objects: IndexMap<ObjectId, SceneObject>,
    groups: IndexMap<GroupId, SceneGroup>,
    /// Child collections by parent name
    collections: IndexMap<String, Vec<String>>,
    dynamic_source_suffix: String,
}

impl Default for MemoryScene {
    fn default() -> Self {
        Self {
            objects: IndexMap::new(),
            groups: IndexMap::new(),
            collections: IndexMap::new(),
            dynamic_source_suffix: DEFAULT_DYNAMIC_SOURCE_SUFFIX.to_string(),
        }
    }
}

impl MemoryScene {
    /// Create an empty scene
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse from RON
    pub fn from_ron(s: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(s)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }

    /// Add an object, keeping the name unique
    pub fn add_object(&mut self, name: &str) -> ObjectId {
        let name = unique_name(name, self.objects.values().map(|o| o.name.as_str()));
        let id = ObjectId::new();
        self.objects.insert(
            id,
            SceneObject {
                id,
                name,
                collection: ROOT_COLLECTION.to_string(),
                visible: true,
                bindings: Vec::new(),
            },
        );
        id
    }

    /// Name the companion flag suffix used for new binding properties
    pub fn with_dynamic_source_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.set_dynamic_source_suffix(suffix);
        self
    }

    /// Change the companion flag suffix. Existing bindings keep their keys.
    pub fn set_dynamic_source_suffix(&mut self, suffix: impl Into<String>) {
        self.dynamic_source_suffix = suffix.into();
    }

    /// Companion flag suffix
    pub fn dynamic_source_suffix(&self) -> &str {
        &self.dynamic_source_suffix
    }

    /// Add a collection under `parent`, or under the root collection.
    /// Adding an existing child again is a no-op.
    pub fn add_collection(&mut self, name: &str, parent: Option<&str>) {
        let parent = parent.unwrap_or(ROOT_COLLECTION);
        let children = self.collections.entry(parent.to_string()).or_default();
        if !children.iter().any(|c| c == name) {
            children.push(name.to_string());
        }
    }

    /// Move an object into a collection
    pub fn link_object(&mut self, object: ObjectId, collection: &str) -> Result<(), HostError> {
        let obj = self
            .objects
            .get_mut(&object)
            .ok_or(HostError::ObjectNotFound(object))?;
        obj.collection = collection.to_string();
        Ok(())
    }

    /// Add a group, keeping the name unique
    pub fn insert_group(&mut self, mut group: SceneGroup) -> GroupId {
        group.name = unique_name(&group.name, self.groups.values().map(|g| g.name.as_str()));
        let id = GroupId::new();
        self.groups.insert(id, group);
        id
    }

    /// Attach a binding that does not instantiate a group
    pub fn add_plain_binding(&mut self, object: ObjectId, name: &str) -> Option<BindingId> {
        let obj = self.objects.get_mut(&object)?;
        let id = BindingId::new();
        obj.bindings.push(SceneBinding {
            id,
            name: name.to_string(),
            is_graph: false,
            group: None,
            show_preview: true,
            show_final: true,
            properties: PropertyBag::new(),
        });
        Some(id)
    }

    /// Get an object
    pub fn object(&self, id: ObjectId) -> Option<&SceneObject> {
        self.objects.get(&id)
    }

    /// Get a mutable object
    pub fn object_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.objects.get_mut(&id)
    }

    /// Find an object by exact name
    pub fn object_by_name(&self, name: &str) -> Option<&SceneObject> {
        self.objects.values().find(|o| o.name == name)
    }

    /// Get a group
    pub fn group(&self, id: GroupId) -> Option<&SceneGroup> {
        self.groups.get(&id)
    }

    /// Get a mutable group
    pub fn group_mut(&mut self, id: GroupId) -> Option<&mut SceneGroup> {
        self.groups.get_mut(&id)
    }

    /// Find a group id by exact name
    pub fn group_id(&self, name: &str) -> Option<GroupId> {
        self.groups
            .iter()
            .find(|(_, g)| g.name == name)
            .map(|(id, _)| *id)
    }

    /// Get a binding anywhere in the scene
    pub fn binding(&self, id: BindingId) -> Option<&SceneBinding> {
        self.objects
            .values()
            .flat_map(|o| o.bindings.iter())
            .find(|b| b.id == id)
    }

    /// Get a mutable binding anywhere in the scene
    pub fn binding_mut(&mut self, id: BindingId) -> Option<&mut SceneBinding> {
        self.objects
            .values_mut()
            .flat_map(|o| o.bindings.iter_mut())
            .find(|b| b.id == id)
    }

    /// Number of objects
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Number of groups
    pub fn group_count(&self) -> usize {
        self.groups.len()
    }

    fn scene_group(&self, id: GroupId) -> Result<&SceneGroup, HostError> {
        self.groups.get(&id).ok_or(HostError::GroupNotFound(id))
    }

    /// Add properties for every input of `group` the binding does not have
    /// yet. Existing values are kept.
    fn sync_properties(properties: &mut PropertyBag, group: &SceneGroup, suffix: &str) {
        for socket in &group.inputs {
            let Some(default) = &socket.default else {
                continue;
            };
            properties
                .entry(socket.identifier.clone())
                .or_insert_with(|| default.clone());
            properties
                .entry(format!("{}{}", socket.identifier, suffix))
                .or_insert(HostValue::Bool(false));
        }
    }
}

impl SceneHost for MemoryScene {
    fn objects(&self) -> Vec<ObjectEntry> {
        self.objects
            .values()
            .map(|o| ObjectEntry {
                id: o.id,
                name: o.name.clone(),
                collection: o.collection.clone(),
                visible: o.visible,
            })
            .collect()
    }

    fn collection_children(&self, collection: &str) -> Vec<String> {
        self.collections.get(collection).cloned().unwrap_or_default()
    }

    fn groups(&self) -> Vec<GroupEntry> {
        self.groups
            .iter()
            .map(|(id, g)| GroupEntry {
                id: *id,
                name: g.name.clone(),
                kind: g.kind.clone(),
            })
            .collect()
    }

    fn group_sockets(
        &self,
        group: GroupId,
        direction: SocketDirection,
    ) -> Result<Vec<HostSocket>, HostError> {
        let g = self.scene_group(group)?;
        Ok(match direction {
            SocketDirection::Input => g.inputs.clone(),
            SocketDirection::Output => g.outputs.clone(),
        })
    }

    fn group_nodes(&self, group: GroupId) -> Result<Vec<HostNode>, HostError> {
        let g = self.scene_group(group)?;
        Ok(g.nodes
            .iter()
            .map(|n| HostNode {
                name: n.name.clone(),
                node_type: n.node_type.clone(),
                type_id: n.type_id.clone(),
                label: n.label.clone(),
                location: n.location,
                subgroup: n.group_ref.as_deref().and_then(|r| self.group_id(r)),
                properties: n.properties.clone(),
                inputs: n
                    .inputs
                    .iter()
                    .map(|s| HostNodeSocket {
                        is_linked: g
                            .links
                            .iter()
                            .any(|l| l.to_node == n.name && l.to_socket == s.name),
                        ..s.clone()
                    })
                    .collect(),
                outputs: n
                    .outputs
                    .iter()
                    .map(|s| HostNodeSocket {
                        is_linked: g
                            .links
                            .iter()
                            .any(|l| l.from_node == n.name && l.from_socket == s.name),
                        ..s.clone()
                    })
                    .collect(),
            })
            .collect())
    }

    fn group_links(&self, group: GroupId) -> Result<Vec<HostLink>, HostError> {
        Ok(self.scene_group(group)?.links.clone())
    }

    fn bindings(&self, object: ObjectId) -> Result<Vec<BindingEntry>, HostError> {
        let obj = self
            .objects
            .get(&object)
            .ok_or(HostError::ObjectNotFound(object))?;
        Ok(obj
            .bindings
            .iter()
            .map(|b| BindingEntry {
                id: b.id,
                name: b.name.clone(),
                is_graph: b.is_graph,
                group: b.group,
                show_preview: b.show_preview,
                show_final: b.show_final,
            })
            .collect())
    }

    fn read_property(&self, binding: BindingId, key: &str) -> Result<HostValue, HostError> {
        self.binding(binding)
            .ok_or(HostError::BindingNotFound(binding))?
            .properties
            .get(key)
            .cloned()
            .ok_or_else(|| HostError::UnknownProperty(key.to_string()))
    }

    fn has_property(&self, binding: BindingId, key: &str) -> bool {
        self.binding(binding)
            .is_some_and(|b| b.properties.contains_key(key))
    }

    fn create_object(&mut self, name: &str) -> Result<ObjectId, HostError> {
        if name.is_empty() {
            return Err(HostError::Rejected("object name must not be empty".to_string()));
        }
        Ok(self.add_object(name))
    }

    fn create_group(&mut self, kind: &str, group: &Group) -> Result<GroupId, HostError> {
        if group.name.is_empty() {
            return Err(HostError::Rejected("group name must not be empty".to_string()));
        }
        Ok(self.insert_group(SceneGroup::from_snapshot(kind, group)))
    }

    fn create_binding(
        &mut self,
        object: ObjectId,
        name: &str,
        group: GroupId,
    ) -> Result<BindingId, HostError> {
        let mut properties = PropertyBag::new();
        Self::sync_properties(&mut properties, self.scene_group(group)?, &self.dynamic_source_suffix);
        let obj = self
            .objects
            .get_mut(&object)
            .ok_or(HostError::ObjectNotFound(object))?;
        let name = unique_name(name, obj.bindings.iter().map(|b| b.name.as_str()));
        let id = BindingId::new();
        obj.bindings.push(SceneBinding {
            id,
            name,
            is_graph: true,
            group: Some(group),
            show_preview: true,
            show_final: true,
            properties,
        });
        Ok(id)
    }

    fn set_binding_group(&mut self, binding: BindingId, group: GroupId) -> Result<(), HostError> {
        let scene_group = self
            .groups
            .get(&group)
            .ok_or(HostError::GroupNotFound(group))?
            .clone();
        let suffix = self.dynamic_source_suffix.clone();
        let b = self
            .binding_mut(binding)
            .ok_or(HostError::BindingNotFound(binding))?;
        if !b.is_graph {
            return Err(HostError::Rejected(format!("binding '{}' does not take a group", b.name)));
        }
        b.group = Some(group);
        Self::sync_properties(&mut b.properties, &scene_group, &suffix);
        Ok(())
    }

    fn set_binding_flags(
        &mut self,
        binding: BindingId,
        show_preview: Option<bool>,
        show_final: Option<bool>,
    ) -> Result<(), HostError> {
        let b = self
            .binding_mut(binding)
            .ok_or(HostError::BindingNotFound(binding))?;
        if let Some(flag) = show_preview {
            b.show_preview = flag;
        }
        if let Some(flag) = show_final {
            b.show_final = flag;
        }
        Ok(())
    }

    fn write_property(
        &mut self,
        binding: BindingId,
        key: &str,
        value: HostValue,
    ) -> Result<(), HostError> {
        let b = self
            .binding_mut(binding)
            .ok_or(HostError::BindingNotFound(binding))?;
        let slot = b
            .properties
            .get_mut(key)
            .ok_or_else(|| HostError::UnknownProperty(key.to_string()))?;
        if !slot.accepts(&value) {
            return Err(HostError::TypeMismatch(key.to_string()));
        }
        *slot = slot.conform(value);
        Ok(())
    }
}

/// Make `base` unique among `taken` by appending `.001`, `.002`, ...
fn unique_name<'a>(base: &str, taken: impl Iterator<Item = &'a str>) -> String {
    let taken: Vec<&str> = taken.collect();
    if !taken.contains(&base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}.{n:03}"))
        .find(|candidate| !taken.contains(&candidate.as_str()))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_input(name: &str, identifier: &str, value: f64) -> HostSocket {
        HostSocket {
            name: name.into(),
            identifier: identifier.into(),
            socket_type: "NodeSocketFloat".into(),
            default: Some(HostValue::Float(value)),
        }
    }

    #[test]
    fn test_unique_names() {
        let mut scene = MemoryScene::new();
        scene.add_object("Cube");
        let second = scene.add_object("Cube");
        let third = scene.add_object("Cube");
        assert_eq!(scene.object(second).unwrap().name, "Cube.001");
        assert_eq!(scene.object(third).unwrap().name, "Cube.002");
    }

    #[test]
    fn test_binding_properties_follow_group_inputs() {
        let mut scene = MemoryScene::new();
        let obj = scene.add_object("Cube");
        let group = scene.insert_group(
            SceneGroup::new("Twist", "GeometryNodeTree")
                .with_input(HostSocket {
                    name: "Geometry".into(),
                    identifier: "Socket_0".into(),
                    socket_type: "NodeSocketGeometry".into(),
                    default: None,
                })
                .with_input(float_input("Angle", "Socket_1", 0.5)),
        );
        let binding = scene.create_binding(obj, "Twist", group).unwrap();

        assert_eq!(scene.read_property(binding, "Socket_1"), Ok(HostValue::Float(0.5)));
        assert!(scene.has_property(binding, "Socket_1_use_attribute"));
        assert!(!scene.has_property(binding, "Socket_0"));
    }

    #[test]
    fn test_custom_dynamic_source_suffix() {
        let mut scene = MemoryScene::new().with_dynamic_source_suffix("_from_field");
        let obj = scene.add_object("Cube");
        let group = scene.insert_group(
            SceneGroup::new("Twist", "GeometryNodeTree").with_input(float_input("Angle", "Socket_1", 0.5)),
        );
        let binding = scene.create_binding(obj, "Twist", group).unwrap();

        assert!(scene.has_property(binding, "Socket_1_from_field"));
        assert!(!scene.has_property(binding, "Socket_1_use_attribute"));
    }

    #[test]
    fn test_collections() {
        let mut scene = MemoryScene::new();
        scene.add_collection("Props", None);
        scene.add_collection("Chairs", Some("Props"));
        scene.add_collection("Chairs", Some("Props"));
        let chair = scene.add_object("Chair");
        scene.link_object(chair, "Chairs").unwrap();

        assert_eq!(scene.collection_children(ROOT_COLLECTION), vec!["Props".to_string()]);
        assert_eq!(scene.collection_children("Props"), vec!["Chairs".to_string()]);
        assert!(scene.collection_children("Chairs").is_empty());
        let entry = scene.objects().into_iter().find(|o| o.id == chair).unwrap();
        assert_eq!(entry.collection, "Chairs");
        assert!(scene.link_object(ObjectId::new(), "Props").is_err());
    }

    #[test]
    fn test_write_rejections() {
        let mut scene = MemoryScene::new();
        let obj = scene.add_object("Cube");
        let group = scene.insert_group(
            SceneGroup::new("Twist", "GeometryNodeTree").with_input(float_input("Angle", "Socket_1", 0.5)),
        );
        let binding = scene.create_binding(obj, "Twist", group).unwrap();

        assert_eq!(
            scene.write_property(binding, "Socket_9", HostValue::Float(1.0)),
            Err(HostError::UnknownProperty("Socket_9".into()))
        );
        assert_eq!(
            scene.write_property(binding, "Socket_1", HostValue::String("x".into())),
            Err(HostError::TypeMismatch("Socket_1".into()))
        );
        assert!(scene.write_property(binding, "Socket_1", HostValue::Float(2.0)).is_ok());
        assert_eq!(scene.read_property(binding, "Socket_1"), Ok(HostValue::Float(2.0)));
    }

    #[test]
    fn test_ron_roundtrip() {
        let mut scene = MemoryScene::new();
        let obj = scene.add_object("Cube");
        let group = scene.insert_group(
            SceneGroup::new("Twist", "GeometryNodeTree").with_input(float_input("Angle", "Socket_1", 0.5)),
        );
        scene.create_binding(obj, "Twist", group).unwrap();
        scene.add_collection("Props", None);
        scene.link_object(obj, "Props").unwrap();

        let ron_str = scene.to_ron().unwrap();
        let loaded = MemoryScene::from_ron(&ron_str).unwrap();
        assert_eq!(loaded, scene);
    }

    #[test]
    fn test_ron_without_optional_sections() {
        let loaded = MemoryScene::from_ron("(objects: {}, groups: {})").unwrap();
        assert_eq!(loaded.dynamic_source_suffix(), DEFAULT_DYNAMIC_SOURCE_SUFFIX);
        assert_eq!(loaded, MemoryScene::new());
    }
}
