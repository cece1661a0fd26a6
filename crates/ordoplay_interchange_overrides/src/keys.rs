// SPDX-License-Identifier: MIT OR Apache-2.0
//! Override key conventions.
//!
//! A binding stores one property per group input. Depending on the host
//! version that property is keyed by the socket identifier, by `Input_N` or
//! by `Socket_N`, where `N` is the 1-based declaration ordinal. Documents
//! may name an input by any of these or by its display name.

use ordoplay_interchange_graph::config::KeyConfig;
use ordoplay_interchange_graph::host::HostSocket;

/// A group input as seen by key planning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputSlot {
    /// Display name
    pub name: String,
    /// Stable identifier
    pub identifier: String,
    /// 1-based declaration ordinal
    pub ordinal: usize,
}

impl InputSlot {
    /// Number the sockets of a group interface in declaration order
    pub fn from_sockets(sockets: &[HostSocket]) -> Vec<Self> {
        sockets
            .iter()
            .enumerate()
            .map(|(index, s)| Self {
                name: s.name.clone(),
                identifier: s.identifier.clone(),
                ordinal: index + 1,
            })
            .collect()
    }
}

/// How an override key was matched to an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMatch {
    /// The key is an input's stable identifier
    Identifier,
    /// The key follows a positional pattern
    Positional,
    /// The key is an input's display name, ignoring case
    DisplayName,
}

/// Property keys to try, in order, for one override key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WritePlan {
    /// How the key was matched
    pub matched: KeyMatch,
    /// Property keys to attempt until one write succeeds
    pub candidates: Vec<String>,
}

/// Builds candidate keys from a [`KeyConfig`]
#[derive(Debug, Clone, Copy)]
pub struct KeyPlanner<'a> {
    config: &'a KeyConfig,
}

impl<'a> KeyPlanner<'a> {
    /// Create a planner
    pub fn new(config: &'a KeyConfig) -> Self {
        Self { config }
    }

    /// Primary positional key for an ordinal
    pub fn positional(&self, ordinal: usize) -> String {
        format!("{}{}", self.config.positional_prefix, ordinal)
    }

    /// Sibling positional key for an ordinal
    pub fn sibling(&self, ordinal: usize) -> String {
        format!("{}{}", self.config.sibling_prefix, ordinal)
    }

    /// If `key` follows either positional pattern, return the key with the
    /// other prefix and the same ordinal
    pub fn swap_positional(&self, key: &str) -> Option<String> {
        let parse = |prefix: &str| {
            key.strip_prefix(prefix)
                .filter(|rest| !rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|rest| rest.parse::<usize>().ok())
        };
        if let Some(n) = parse(&self.config.positional_prefix) {
            return Some(self.sibling(n));
        }
        parse(&self.config.sibling_prefix).map(|n| self.positional(n))
    }

    /// Keys to read an input value from: positional first, then identifier,
    /// then display name
    pub fn read_candidates(&self, slot: &InputSlot) -> Vec<String> {
        dedup([
            self.positional(slot.ordinal),
            slot.identifier.clone(),
            slot.name.clone(),
        ])
    }

    /// Keys to write an input value to: identifier first, then both
    /// positional forms
    pub fn write_candidates(&self, slot: &InputSlot) -> Vec<String> {
        let identifier = if slot.identifier.is_empty() {
            self.positional(slot.ordinal)
        } else {
            slot.identifier.clone()
        };
        dedup([identifier, self.positional(slot.ordinal), self.sibling(slot.ordinal)])
    }

    /// Plan the writes for one override key.
    ///
    /// An exact identifier match takes precedence over the positional
    /// pattern, which takes precedence over a display name match. Returns
    /// `None` if the key names nothing.
    pub fn plan(&self, key: &str, slots: &[InputSlot]) -> Option<WritePlan> {
        if let Some(slot) = slots.iter().find(|s| !s.identifier.is_empty() && s.identifier == key) {
            return Some(WritePlan {
                matched: KeyMatch::Identifier,
                candidates: self.write_candidates(slot),
            });
        }
        if let Some(swapped) = self.swap_positional(key) {
            return Some(WritePlan {
                matched: KeyMatch::Positional,
                candidates: dedup([key.to_string(), swapped]),
            });
        }
        let lowered = key.to_lowercase();
        slots
            .iter()
            .find(|s| s.name.to_lowercase() == lowered)
            .map(|slot| WritePlan {
                matched: KeyMatch::DisplayName,
                candidates: self.write_candidates(slot),
            })
    }

    /// Companion flag that selects a dynamic value source for `key`
    pub fn dynamic_source_flag(&self, key: &str) -> String {
        format!("{}{}", key, self.config.dynamic_source_suffix)
    }
}

fn dedup<const N: usize>(keys: [String; N]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(N);
    for key in keys {
        if !key.is_empty() && !out.contains(&key) {
            out.push(key);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots() -> Vec<InputSlot> {
        vec![
            InputSlot { name: "Geometry".into(), identifier: "Socket_0".into(), ordinal: 1 },
            InputSlot { name: "Roughness".into(), identifier: "Socket_2".into(), ordinal: 2 },
        ]
    }

    #[test]
    fn test_swap_positional() {
        let config = KeyConfig::default();
        let planner = KeyPlanner::new(&config);
        assert_eq!(planner.swap_positional("Input_3").as_deref(), Some("Socket_3"));
        assert_eq!(planner.swap_positional("Socket_12").as_deref(), Some("Input_12"));
        assert_eq!(planner.swap_positional("Input_"), None);
        assert_eq!(planner.swap_positional("Input_x"), None);
        assert_eq!(planner.swap_positional("Density"), None);
    }

    #[test]
    fn test_equivalent_keys_share_a_target() {
        let config = KeyConfig::default();
        let planner = KeyPlanner::new(&config);
        let slots = slots();

        let by_id = planner.plan("Socket_2", &slots).unwrap();
        assert_eq!(by_id.matched, KeyMatch::Identifier);
        assert_eq!(by_id.candidates, ["Socket_2", "Input_2"]);

        let by_name = planner.plan("roughness", &slots).unwrap();
        assert_eq!(by_name.matched, KeyMatch::DisplayName);
        assert_eq!(by_name.candidates, by_id.candidates);

        let by_position = planner.plan("Input_2", &slots).unwrap();
        assert_eq!(by_position.matched, KeyMatch::Positional);
        assert_eq!(by_position.candidates, ["Input_2", "Socket_2"]);
    }

    #[test]
    fn test_identifier_beats_positional_pattern() {
        let config = KeyConfig::default();
        let planner = KeyPlanner::new(&config);
        let slots = vec![InputSlot { name: "Scale".into(), identifier: "Input_5".into(), ordinal: 1 }];

        let plan = planner.plan("Input_5", &slots).unwrap();
        assert_eq!(plan.matched, KeyMatch::Identifier);
        assert_eq!(plan.candidates, ["Input_5", "Input_1", "Socket_1"]);
    }

    #[test]
    fn test_unknown_key() {
        let config = KeyConfig::default();
        let planner = KeyPlanner::new(&config);
        assert_eq!(planner.plan("Nope", &slots()), None);
    }

    #[test]
    fn test_read_candidates() {
        let config = KeyConfig::default();
        let planner = KeyPlanner::new(&config);
        assert_eq!(planner.read_candidates(&slots()[1]), ["Input_2", "Socket_2", "Roughness"]);
    }
}
