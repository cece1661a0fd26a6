// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph interchange for `OrdoPlay`.
//!
//! This crate moves procedural node groups between a live scene host and a
//! portable JSON document:
//! - Portable values and the sanitizer
//! - Tiered case-insensitive name resolution
//! - The canonical group/override schema and its fingerprint
//! - Tolerant document decoding and encoding
//! - Group extraction with forward compatibility for unknown node types
//! - Group import back into a host
//!
//! ## Architecture
//!
//! Hosts are reached only through the [`SceneHost`] trait. [`MemoryScene`]
//! is a complete in-memory host used by tools and tests.

pub mod value;
pub mod resolve;
pub mod schema;
pub mod fingerprint;
pub mod codec;
pub mod config;
pub mod host;
pub mod extract;
pub mod import;
pub mod memory;

pub use value::{HostValue, PortableValue, PropertyBag, Sanitizer};
pub use resolve::{find, find_within, MatchTier};
pub use schema::{Bundle, Group, Link, Node, Override, Socket, SocketDefault, SocketDirection};
pub use codec::{Decoded, DocumentShape};
pub use config::{ConfigError, InterchangeConfig};
pub use host::{
    BindingEntry, BindingId, GroupEntry, GroupId, HostError, ObjectEntry, ObjectId, SceneHost,
};
pub use extract::{ExtractError, GraphExtractor};
pub use import::{import_groups, ImportStats};
pub use memory::MemoryScene;
