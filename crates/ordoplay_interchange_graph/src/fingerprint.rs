// SPDX-License-Identifier: MIT OR Apache-2.0
//! Topology fingerprint of a group.
//!
//! Hashes the sorted `(concrete type, node type, node name)` triples and the
//! sorted link quadruples. Positions and labels never participate, neither
//! does the order in which the host lists nodes or links.

use crate::schema::{Link, Node};
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Serialize)]
struct Canonical<'a> {
    nodes: Vec<(&'a str, &'a str, &'a str)>,
    links: Vec<(&'a str, &'a str, &'a str, &'a str)>,
}

/// Compute the hex fingerprint of a node and link set
pub fn compute(nodes: &[Node], links: &[Link]) -> String {
    let mut canonical = Canonical {
        nodes: nodes
            .iter()
            .map(|n| (n.concrete_type.as_str(), n.node_type.as_str(), n.name.as_str()))
            .collect(),
        links: links
            .iter()
            .map(|l| {
                (
                    l.from_node.as_str(),
                    l.from_socket.as_str(),
                    l.to_node.as_str(),
                    l.to_socket.as_str(),
                )
            })
            .collect(),
    };
    canonical.nodes.sort_unstable();
    canonical.links.sort_unstable();

    let mut hasher = Sha256::new();
    // Serializing tuples of strings into a Vec cannot fail.
    if let Ok(bytes) = serde_json::to_vec(&canonical) {
        hasher.update(bytes);
    }
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (Vec<Node>, Vec<Link>) {
        let nodes = vec![
            Node::new("Group Input", "GROUP_INPUT", "NodeGroupInput"),
            Node::new("Set Position", "SET_POSITION", "GeometryNodeSetPosition").with_location(10.0, 0.0),
            Node::new("Group Output", "GROUP_OUTPUT", "NodeGroupOutput"),
        ];
        let links = vec![
            Link::new("Group Input", "Geometry", "Set Position", "Geometry"),
            Link::new("Set Position", "Geometry", "Group Output", "Geometry"),
        ];
        (nodes, links)
    }

    #[test]
    fn test_cosmetic_changes_keep_fingerprint() {
        let (nodes, links) = sample();
        let before = compute(&nodes, &links);

        let mut moved = nodes.clone();
        moved[1].location = [500.0, -20.0];
        moved[1].label = "Jitter".to_string();
        moved.reverse();
        let mut reordered = links.clone();
        reordered.reverse();

        assert_eq!(before, compute(&moved, &reordered));
    }

    #[test]
    fn test_topology_changes_alter_fingerprint() {
        let (nodes, links) = sample();
        let before = compute(&nodes, &links);

        let mut renamed = nodes.clone();
        renamed[1].name = "Set Position.001".to_string();
        assert_ne!(before, compute(&renamed, &links));

        let mut retyped = nodes.clone();
        retyped[1].concrete_type = "GeometryNodeTransform".to_string();
        assert_ne!(before, compute(&retyped, &links));

        assert_ne!(before, compute(&nodes, &links[..1]));
    }

    #[test]
    fn test_empty_group_has_stable_fingerprint() {
        assert_eq!(compute(&[], &[]), compute(&[], &[]));
        assert_eq!(compute(&[], &[]).len(), 64);
    }
}
