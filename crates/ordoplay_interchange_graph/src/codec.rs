// SPDX-License-Identifier: MIT OR Apache-2.0
//! Document decoding and encoding.
//!
//! Three top-level shapes are accepted and decode identically:
//! - namespaced: `{"geometry_nodes": {"groups": [...], "overrides": [...]}}`
//! - flat: `{"groups": [...], "overrides": [...]}`
//! - bare list: `[...]` when only one kind of record is exchanged
//!
//! Entries with the wrong structure are dropped and counted. Decoding never
//! fails as a whole.

use crate::config::DocumentConfig;
use crate::schema::{Bundle, Group, Override};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// Section key holding group records
pub const GROUPS_KEY: &str = "groups";
/// Section key holding override records
pub const OVERRIDES_KEY: &str = "overrides";
/// Section key holding export metadata
pub const META_KEY: &str = "meta";

/// Which top-level shape a document had
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentShape {
    /// Records under a section inside a namespace object
    Namespaced,
    /// Records under a top-level section
    Flat,
    /// The document itself is the record list
    BareList,
    /// Nothing recognizable
    Unrecognized,
}

/// Result of decoding one kind of record from a document
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    /// Records that decoded cleanly, in document order
    pub items: Vec<T>,
    /// Entries dropped for having the wrong structure
    pub dropped: usize,
    /// Shape the records were found in
    pub shape: DocumentShape,
}

impl<T> Decoded<T> {
    fn unrecognized() -> Self {
        Self {
            items: Vec::new(),
            dropped: 0,
            shape: DocumentShape::Unrecognized,
        }
    }
}

/// Decode group records
pub fn decode_groups(doc: &Value, config: &DocumentConfig) -> Decoded<Group> {
    decode_section(doc, GROUPS_KEY, config)
}

/// Decode override records
pub fn decode_overrides(doc: &Value, config: &DocumentConfig) -> Decoded<Override> {
    decode_section(doc, OVERRIDES_KEY, config)
}

/// Decode a whole bundle and count the dropped entries.
///
/// A bare list is read as group records when every entry is an object with
/// a `nodes` key, and as override records otherwise. Metadata is only read
/// from object documents.
pub fn decode_bundle(doc: &Value, config: &DocumentConfig) -> (Bundle, usize) {
    if let Some(entries) = doc.as_array() {
        if is_group_list(entries) {
            let groups = decode_groups(doc, config);
            let bundle = Bundle {
                groups: groups.items,
                ..Bundle::default()
            };
            return (bundle, groups.dropped);
        }
        let overrides = decode_overrides(doc, config);
        let bundle = Bundle {
            overrides: overrides.items,
            ..Bundle::default()
        };
        return (bundle, overrides.dropped);
    }
    let groups = decode_groups(doc, config);
    let overrides = decode_overrides(doc, config);
    let meta = locate(doc, META_KEY, config)
        .and_then(|(v, _)| v.as_object())
        .map(|m| {
            m.iter()
                .map(|(k, v)| {
                    let text = match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    };
                    (k.clone(), text)
                })
                .collect()
        })
        .unwrap_or_default();
    let dropped = groups.dropped + overrides.dropped;
    (
        Bundle {
            groups: groups.items,
            overrides: overrides.items,
            meta,
        },
        dropped,
    )
}

/// Encode a bundle in the namespaced shape
pub fn encode_bundle(bundle: &Bundle, config: &DocumentConfig) -> Value {
    let mut section = Map::new();
    section.insert(GROUPS_KEY.to_string(), to_value_or_null(&bundle.groups));
    section.insert(OVERRIDES_KEY.to_string(), to_value_or_null(&bundle.overrides));
    section.insert(META_KEY.to_string(), to_value_or_null(&bundle.meta));

    let mut doc = Map::new();
    doc.insert(config.namespace.clone(), Value::Object(section));
    Value::Object(doc)
}

/// Encode group records as a bare list
pub fn encode_groups(groups: &[Group]) -> Value {
    to_value_or_null(groups)
}

/// Encode override records as a bare list
pub fn encode_overrides(overrides: &[Override]) -> Value {
    to_value_or_null(overrides)
}

fn to_value_or_null<T: serde::Serialize + ?Sized>(value: &T) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        tracing::warn!("Failed to encode records: {}", e);
        Value::Null
    })
}

fn decode_section<T: DeserializeOwned>(doc: &Value, key: &str, config: &DocumentConfig) -> Decoded<T> {
    let Some((list, shape)) = locate(doc, key, config) else {
        tracing::debug!("No '{}' list found in document", key);
        return Decoded::unrecognized();
    };
    let Some(entries) = list.as_array() else {
        return Decoded::unrecognized();
    };

    let mut items = Vec::with_capacity(entries.len());
    let mut dropped = 0;
    for (index, entry) in entries.iter().enumerate() {
        if !entry.is_object() {
            tracing::warn!("Dropping {} entry {}: not an object", key, index);
            dropped += 1;
            continue;
        }
        match serde_json::from_value::<T>(entry.clone()) {
            Ok(item) => items.push(item),
            Err(e) => {
                tracing::warn!("Dropping {} entry {}: {}", key, index, e);
                dropped += 1;
            }
        }
    }

    Decoded { items, dropped, shape }
}

/// Find the value stored under `key` at either of the two outer levels.
///
/// The flat section wins over a namespaced one; the configured namespace is
/// tried before any other nested object.
fn locate<'v>(doc: &'v Value, key: &str, config: &DocumentConfig) -> Option<(&'v Value, DocumentShape)> {
    match doc {
        Value::Array(_) => Some((doc, DocumentShape::BareList)),
        Value::Object(top) => {
            if let Some(v) = top.get(key).filter(|v| is_section(v, key)) {
                return Some((v, DocumentShape::Flat));
            }
            let nested = |section: &'v Value| {
                section
                    .as_object()
                    .and_then(|m| m.get(key))
                    .filter(|v| is_section(v, key))
            };
            if let Some(v) = top.get(&config.namespace).and_then(nested) {
                return Some((v, DocumentShape::Namespaced));
            }
            top.iter()
                .filter(|(k, _)| **k != config.namespace)
                .find_map(|(_, section)| nested(section))
                .map(|v| (v, DocumentShape::Namespaced))
        }
        _ => None,
    }
}

fn is_group_list(entries: &[Value]) -> bool {
    !entries.is_empty()
        && entries
            .iter()
            .all(|entry| entry.as_object().is_some_and(|m| m.contains_key("nodes")))
}

fn is_section(value: &Value, key: &str) -> bool {
    if key == META_KEY {
        value.is_object()
    } else {
        value.is_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Link, Node};
    use crate::value::PortableValue;
    use serde_json::json;

    fn override_records() -> Value {
        json!([
            {
                "object_name": "Cube",
                "modifier_name": "GeometryNodes",
                "group_name": "Scatter",
                "enabled_viewport": true,
                "inputs": {"Density": 4.0, "Socket_2": [1, 0, 0]}
            },
            {"object_name": "Plane", "group_name": "Scatter"}
        ])
    }

    #[test]
    fn test_shapes_decode_identically() {
        let config = DocumentConfig::default();
        let records = override_records();
        let namespaced = json!({"geometry_nodes": {"overrides": records.clone()}});
        let flat = json!({"overrides": records.clone()});

        let a = decode_overrides(&namespaced, &config);
        let b = decode_overrides(&flat, &config);
        let c = decode_overrides(&records, &config);

        assert_eq!(a.shape, DocumentShape::Namespaced);
        assert_eq!(b.shape, DocumentShape::Flat);
        assert_eq!(c.shape, DocumentShape::BareList);
        assert_eq!(a.items, b.items);
        assert_eq!(b.items, c.items);
        assert_eq!(a.items.len(), 2);
        assert_eq!(a.items[1].inputs.len(), 0);
        assert_eq!(a.items[1].enabled_render, None);
        assert_eq!(
            a.items[0].inputs["Socket_2"],
            PortableValue::List(vec![1.0.into(), 0.0.into(), 0.0.into()])
        );
    }

    #[test]
    fn test_other_namespace_key_is_accepted() {
        let config = DocumentConfig::default();
        let doc = json!({"exporter": "x", "scene": {"overrides": override_records()}});
        let decoded = decode_overrides(&doc, &config);
        assert_eq!(decoded.shape, DocumentShape::Namespaced);
        assert_eq!(decoded.items.len(), 2);
    }

    #[test]
    fn test_malformed_entries_are_counted() {
        let config = DocumentConfig::default();
        let doc = json!({"overrides": [
            {"object_name": "Cube", "group_name": "Scatter"},
            42,
            {"object_name": ["not", "a", "string"]},
            {"object_name": "Plane", "inputs": "not a map"}
        ]});
        let decoded = decode_overrides(&doc, &config);
        assert_eq!(decoded.items.len(), 1);
        assert_eq!(decoded.dropped, 3);
    }

    #[test]
    fn test_null_fields_and_object_inputs_are_kept() {
        let config = DocumentConfig::default();
        let doc = json!([
            {"object_name": "Cube", "group_name": "Scatter", "inputs": null},
            {"object_name": null, "group_name": "Scatter", "inputs": {"Density": 2}},
            {"object_name": "Plane", "group_name": null, "inputs": {"Target": {"name": "x"}}}
        ]);
        let decoded = decode_overrides(&doc, &config);
        assert_eq!(decoded.items.len(), 3);
        assert_eq!(decoded.dropped, 0);
        assert!(decoded.items[0].inputs.is_empty());
        assert_eq!(decoded.items[1].object_name, "");
        assert_eq!(decoded.items[2].group_name, "");
        assert_eq!(
            decoded.items[2].inputs["Target"],
            PortableValue::Text(r#"{"name":"x"}"#.into())
        );
    }

    #[test]
    fn test_bare_group_list_decodes_as_groups() {
        let config = DocumentConfig::default();
        let doc = json!([
            {"name": "Scatter", "nodes": [{"name": "Group Input", "type": "GROUP_INPUT"}]},
            {"name": "Empty", "nodes": []}
        ]);
        let (bundle, dropped) = decode_bundle(&doc, &config);
        assert_eq!(dropped, 0);
        assert!(bundle.overrides.is_empty());
        assert_eq!(bundle.groups.len(), 2);
        assert_eq!(bundle.groups[0].nodes[0].name, "Group Input");

        let (bundle, _) = decode_bundle(&override_records(), &config);
        assert!(bundle.groups.is_empty());
        assert_eq!(bundle.overrides.len(), 2);
    }

    #[test]
    fn test_unrecognized_document() {
        let config = DocumentConfig::default();
        for doc in [json!(3), json!({"nothing": 1}), json!({"overrides": {"not": "a list"}})] {
            let decoded = decode_overrides(&doc, &config);
            assert_eq!(decoded.shape, DocumentShape::Unrecognized);
            assert!(decoded.items.is_empty());
        }
    }

    #[test]
    fn test_bundle_roundtrip() {
        let config = DocumentConfig::default();
        let mut group = Group {
            name: "Scatter".into(),
            nodes: vec![
                Node::new("Group Input", "GROUP_INPUT", "NodeGroupInput"),
                Node::new("Group Output", "GROUP_OUTPUT", "NodeGroupOutput").with_location(200.0, 0.0),
            ],
            links: vec![Link::new("Group Input", "Geometry", "Group Output", "Geometry")],
            ..Group::default()
        };
        group.fingerprint = group.computed_fingerprint();
        let mut bundle = Bundle {
            groups: vec![group],
            overrides: vec![Override::new("Cube", "Scatter").with_input("Density", 2.0)],
            ..Bundle::default()
        };
        bundle.meta.insert("groups_count".into(), "1".into());

        let doc = encode_bundle(&bundle, &config);
        assert!(doc["geometry_nodes"]["groups"].is_array());
        let (decoded, dropped) = decode_bundle(&doc, &config);
        assert_eq!(dropped, 0);
        assert_eq!(decoded, bundle);
        assert!(decoded.groups[0].fingerprint_matches());
        // Encoding is deterministic
        assert_eq!(
            serde_json::to_string(&doc).unwrap(),
            serde_json::to_string(&encode_bundle(&decoded, &config)).unwrap()
        );
    }
}
