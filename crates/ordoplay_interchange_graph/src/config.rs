// SPDX-License-Identifier: MIT OR Apache-2.0
//! Interchange configuration.
//!
//! One value object passed explicitly to every component. It covers:
//! - Document layout (namespace key)
//! - Node classification (allow-lists, snapshot filters)
//! - Override key conventions (positional prefixes, dynamic source flag)
//! - Placeholder synthesis

use crate::value::DEFAULT_MAX_STRING_LEN;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Current configuration format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Document layout settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentConfig {
    /// Key of the namespaced section in wrapped documents
    pub namespace: String,
}

impl Default for DocumentConfig {
    fn default() -> Self {
        Self {
            namespace: "geometry_nodes".to_string(),
        }
    }
}

/// Node classification and snapshot settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Concrete type prefixes treated as known
    pub allowed_prefixes: Vec<String>,
    /// Concrete types treated as known
    pub allowed_exact: Vec<String>,
    /// Snapshot properties of unknown nodes only
    pub snapshot_unknown_only: bool,
    /// Property keys never snapshotted
    pub snapshot_exclude: Vec<String>,
    /// If set, only these property keys are snapshotted
    pub snapshot_only: Option<Vec<String>>,
    /// Bound on string length in documents
    pub max_string_len: usize,
    /// How many unknown nodes to list in export metadata
    pub max_unknown_preview: usize,
}

impl ExtractConfig {
    /// Whether a concrete type id is on the allow-list
    pub fn is_known(&self, concrete_type: &str) -> bool {
        self.allowed_exact.iter().any(|e| e == concrete_type)
            || self
                .allowed_prefixes
                .iter()
                .any(|p| concrete_type.starts_with(p.as_str()))
    }

    /// Whether a node property key goes into snapshots
    pub fn snapshots_key(&self, key: &str) -> bool {
        if self.snapshot_exclude.iter().any(|k| k == key) {
            return false;
        }
        match &self.snapshot_only {
            Some(only) => only.iter().any(|k| k == key),
            None => true,
        }
    }
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            allowed_prefixes: ["GeometryNode", "ShaderNode", "FunctionNode"]
                .map(String::from)
                .to_vec(),
            allowed_exact: ["NodeGroupInput", "NodeGroupOutput", "NodeFrame", "NodeReroute"]
                .map(String::from)
                .to_vec(),
            snapshot_unknown_only: true,
            snapshot_exclude: [
                "rna_type", "name", "label", "inputs", "outputs", "select", "parent", "location",
                "type",
            ]
            .map(String::from)
            .to_vec(),
            snapshot_only: None,
            max_string_len: DEFAULT_MAX_STRING_LEN,
            max_unknown_preview: 24,
        }
    }
}

/// Override key conventions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyConfig {
    /// Primary positional key prefix
    pub positional_prefix: String,
    /// Sibling positional key prefix
    pub sibling_prefix: String,
    /// Suffix of the companion flag selecting a dynamic value source
    pub dynamic_source_suffix: String,
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            positional_prefix: "Input_".to_string(),
            sibling_prefix: "Socket_".to_string(),
            dynamic_source_suffix: "_use_attribute".to_string(),
        }
    }
}

/// Placeholder synthesis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaceholderConfig {
    /// Name for placeholder objects when the override names none
    pub object_name: String,
    /// Name of the pass-through socket of placeholder groups
    pub socket_name: String,
    /// Type of the pass-through socket (the graph's primary data type)
    pub socket_type: String,
}

impl Default for PlaceholderConfig {
    fn default() -> Self {
        Self {
            object_name: "Interchange_Target".to_string(),
            socket_name: "Geometry".to_string(),
            socket_type: "NodeSocketGeometry".to_string(),
        }
    }
}

/// Complete interchange configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterchangeConfig {
    /// Format version
    pub version: u32,
    /// Graph kind recognized as interchangeable
    pub graph_kind: String,
    /// Document layout
    pub document: DocumentConfig,
    /// Extraction
    pub extract: ExtractConfig,
    /// Override keys
    pub keys: KeyConfig,
    /// Placeholders
    pub placeholder: PlaceholderConfig,
}

impl Default for InterchangeConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            graph_kind: "GeometryNodeTree".to_string(),
            document: DocumentConfig::default(),
            extract: ExtractConfig::default(),
            keys: KeyConfig::default(),
            placeholder: PlaceholderConfig::default(),
        }
    }
}

impl InterchangeConfig {
    /// Parse from RON
    pub fn from_ron(s: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(s)?;
        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion(config.version));
        }
        Ok(config)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load from a RON file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }
}

/// Error loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File could not be read
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// RON parse failure
    #[error("Invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// RON serialization failure
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),

    /// Written by a newer version
    #[error("Unsupported config version: {0}")]
    UnsupportedVersion(u32),
}
