// SPDX-License-Identifier: MIT OR Apache-2.0
//! Host property values and their portable document form.
//!
//! [`HostValue`] is what a scene host reports for a property: a tagged
//! variant that may carry host-only shapes such as datablock references.
//! [`PortableValue`] is what ends up in a document. The [`Sanitizer`] is the
//! only way from the first to the second and it never fails.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Default bound on string length inside documents, in characters.
pub const DEFAULT_MAX_STRING_LEN: usize = 256;

/// Ordered bag of named host properties.
pub type PropertyBag = IndexMap<String, HostValue>;

/// A property value as the host exposes it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub enum HostValue {
    /// No value (e.g. a geometry socket without a default)
    #[default]
    None,
    /// Boolean
    Bool(bool),
    /// Integer
    Int(i64),
    /// Floating point value
    Float(f64),
    /// String or enum identifier
    String(String),
    /// Vector, color or any other indexable sequence
    Sequence(Vec<HostValue>),
    /// Reference to a named host entity (object, collection, material...)
    Reference(String),
    /// Anything else, carried as the host's textual representation
    Opaque(String),
}

impl HostValue {
    /// Check whether a write of `incoming` onto a property currently holding
    /// `self` is type compatible.
    ///
    /// Numbers convert freely between int and float. Sequences must keep
    /// their length. References and opaque values are read-only.
    pub fn accepts(&self, incoming: &HostValue) -> bool {
        match (self, incoming) {
            (Self::Bool(_), Self::Bool(_)) => true,
            (Self::Int(_) | Self::Float(_), Self::Int(_) | Self::Float(_)) => true,
            (Self::String(_), Self::String(_)) => true,
            (Self::Sequence(current), Self::Sequence(new)) => current.len() == new.len(),
            _ => false,
        }
    }

    /// Convert `incoming` to the representation already held by `self`.
    ///
    /// Only meaningful after [`HostValue::accepts`] returned true.
    pub fn conform(&self, incoming: HostValue) -> HostValue {
        match (self, incoming) {
            (Self::Int(_), Self::Float(v)) => Self::Int(v.round() as i64),
            (Self::Float(_), Self::Int(v)) => Self::Float(v as f64),
            (Self::Sequence(current), Self::Sequence(new)) => Self::Sequence(
                current
                    .iter()
                    .zip(new)
                    .map(|(slot, value)| {
                        if slot.accepts(&value) {
                            slot.conform(value)
                        } else {
                            value
                        }
                    })
                    .collect(),
            ),
            (_, value) => value,
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            Self::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Int(v) => Some(*v as f64),
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    fn display(&self) -> String {
        match self {
            Self::None => "None".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Int(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::String(s) | Self::Reference(s) | Self::Opaque(s) => s.clone(),
            Self::Sequence(items) => {
                let parts: Vec<String> = items.iter().map(Self::display).collect();
                format!("({})", parts.join(", "))
            }
        }
    }
}

/// A value as stored in an interchange document.
///
/// Decoding accepts any JSON value; objects, which have no portable form,
/// are kept as their JSON text.
#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(untagged)]
pub enum PortableValue {
    /// Boolean
    Bool(bool),
    /// Any number; documents do not distinguish int from float
    Number(f64),
    /// String
    Text(String),
    /// Ordered list (vectors, colors)
    List(Vec<PortableValue>),
    /// Absent value
    #[default]
    Null,
}

impl PortableValue {
    /// Convert back into a host value for writing.
    pub fn to_host(&self) -> HostValue {
        match self {
            Self::Bool(b) => HostValue::Bool(*b),
            Self::Number(v) => HostValue::Float(*v),
            Self::Text(s) => HostValue::String(s.clone()),
            Self::List(items) => HostValue::Sequence(items.iter().map(Self::to_host).collect()),
            Self::Null => HostValue::None,
        }
    }

    /// Whether this is [`PortableValue::Null`]
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl From<serde_json::Value> for PortableValue {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => n.as_f64().map_or_else(|| Self::Text(n.to_string()), Self::Number),
            Value::String(s) => Self::Text(s),
            Value::Array(items) => Self::List(items.into_iter().map(Self::from).collect()),
            object @ Value::Object(_) => Self::Text(object.to_string()),
        }
    }
}

impl<'de> Deserialize<'de> for PortableValue {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Self::from)
    }
}

impl From<f64> for PortableValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for PortableValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for PortableValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

/// Normalizes host values into portable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sanitizer {
    max_string_len: usize,
}

impl Sanitizer {
    /// Create a sanitizer truncating strings to `max_string_len` characters
    pub fn new(max_string_len: usize) -> Self {
        Self { max_string_len }
    }

    /// Sanitize a host value. Never fails: anything unclassifiable becomes text.
    pub fn sanitize(&self, value: &HostValue) -> PortableValue {
        match value {
            HostValue::None => PortableValue::Null,
            HostValue::Bool(b) => PortableValue::Bool(*b),
            HostValue::Int(v) => PortableValue::Number(*v as f64),
            HostValue::Float(v) => PortableValue::Number(*v),
            HostValue::String(s) | HostValue::Reference(s) | HostValue::Opaque(s) => {
                PortableValue::Text(self.truncate(s))
            }
            HostValue::Sequence(items) => PortableValue::List(
                items
                    .iter()
                    .map(|item| match item.as_number() {
                        Some(n) => PortableValue::Number(n),
                        None => PortableValue::Text(self.truncate(&item.display())),
                    })
                    .collect(),
            ),
        }
    }

    /// Sanitize every entry of a property bag, preserving order
    pub fn sanitize_bag(&self, bag: &PropertyBag) -> IndexMap<String, PortableValue> {
        bag.iter()
            .map(|(key, value)| (key.clone(), self.sanitize(value)))
            .collect()
    }

    fn truncate(&self, s: &str) -> String {
        match s.char_indices().nth(self.max_string_len) {
            Some((cut, _)) => s[..cut].to_string(),
            None => s.to_string(),
        }
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_STRING_LEN)
    }
}
