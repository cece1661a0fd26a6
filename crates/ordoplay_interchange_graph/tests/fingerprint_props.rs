// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property tests for group fingerprints and document shapes.

use ordoplay_interchange_graph::codec::{decode_bundle, decode_groups, encode_groups, DocumentShape};
use ordoplay_interchange_graph::{import_groups, GraphExtractor, Group, InterchangeConfig, Link, MemoryScene, Node, Socket};
use proptest::prelude::*;
use serde_json::json;

const NODE_KINDS: [(&str, &str); 4] = [
    ("SET_POSITION", "GeometryNodeSetPosition"),
    ("MATH", "ShaderNodeMath"),
    ("GROUP_OUTPUT", "NodeGroupOutput"),
    ("CUSTOM", "PluginNodeWarp"),
];

fn build_group(
    name: &str,
    kinds: &[usize],
    raw_links: &[(usize, usize, usize)],
    input_count: usize,
) -> Group {
    let nodes: Vec<Node> = kinds
        .iter()
        .enumerate()
        .map(|(i, k)| {
            let (node_type, concrete) = NODE_KINDS[k % NODE_KINDS.len()];
            Node::new(format!("Node {i}"), node_type, concrete).with_location(i as f32 * 100.0, 0.0)
        })
        .collect();

    let mut links: Vec<Link> = Vec::new();
    if !nodes.is_empty() {
        for &(from, to, socket) in raw_links {
            let link = Link::new(
                &nodes[from % nodes.len()].name,
                format!("Out {socket}"),
                &nodes[to % nodes.len()].name,
                format!("In {socket}"),
            );
            if !links.contains(&link) {
                links.push(link);
            }
        }
    }

    let mut group = Group {
        name: name.to_string(),
        inputs: (0..input_count)
            .map(|i| {
                Socket::new(format!("Value {i}"), format!("Socket_{i}"), "NodeSocketFloat")
                    .at(i)
                    .with_default(1.0)
            })
            .collect(),
        nodes,
        links,
        ..Group::default()
    };
    group.fingerprint = group.computed_fingerprint();
    group
}

prop_compose! {
    fn arb_group()(
        kinds in proptest::collection::vec(0..NODE_KINDS.len(), 0..8),
        raw_links in proptest::collection::vec((0..8usize, 0..8usize, 0..3usize), 0..10),
        input_count in 0..3usize,
    ) -> Group {
        build_group("Generated", &kinds, &raw_links, input_count)
    }
}

proptest! {
    #[test]
    fn prop_cosmetic_edits_keep_fingerprint(
        group in arb_group(),
        shift in 0..16usize,
        dx in -500i32..500,
    ) {
        let before = group.computed_fingerprint();
        let mut edited = group.clone();
        for node in &mut edited.nodes {
            node.location[0] += dx as f32;
            node.label = format!("{} (moved)", node.name);
        }
        if !edited.nodes.is_empty() {
            let n = shift % edited.nodes.len();
            edited.nodes.rotate_left(n);
        }
        edited.links.reverse();
        prop_assert_eq!(before, edited.computed_fingerprint());
    }

    #[test]
    fn prop_renaming_a_node_changes_fingerprint(group in arb_group(), pick in 0..8usize) {
        prop_assume!(!group.nodes.is_empty());
        let mut edited = group.clone();
        let i = pick % edited.nodes.len();
        edited.nodes[i].name = "Renamed".to_string();
        prop_assert_ne!(group.computed_fingerprint(), edited.computed_fingerprint());
    }

    #[test]
    fn prop_retyping_a_node_changes_fingerprint(group in arb_group(), pick in 0..8usize) {
        prop_assume!(!group.nodes.is_empty());
        let mut edited = group.clone();
        let i = pick % edited.nodes.len();
        edited.nodes[i].concrete_type = "GeometryNodeRetyped".to_string();
        prop_assert_ne!(group.computed_fingerprint(), edited.computed_fingerprint());
    }

    #[test]
    fn prop_link_changes_change_fingerprint(group in arb_group(), pick in 0..10usize) {
        let mut added = group.clone();
        added.links.push(Link::new("Node 0", "Extra", "Node 0", "Extra"));
        prop_assert_ne!(group.computed_fingerprint(), added.computed_fingerprint());

        if !group.links.is_empty() {
            let mut removed = group.clone();
            removed.links.remove(pick % group.links.len());
            prop_assert_ne!(group.computed_fingerprint(), removed.computed_fingerprint());
        }
    }

    #[test]
    fn prop_document_roundtrip_keeps_fingerprint(group in arb_group()) {
        let config = InterchangeConfig::default();
        let decoded = decode_groups(&encode_groups(std::slice::from_ref(&group)), &config.document);
        prop_assert_eq!(decoded.dropped, 0);
        prop_assert_eq!(&decoded.items, &vec![group.clone()]);

        let mut scene = MemoryScene::new();
        let stats = import_groups(&mut scene, &decoded.items, &config);
        prop_assert_eq!(stats.created, 1);

        let id = scene.group_id(&group.name).unwrap();
        let extracted = GraphExtractor::new(&scene, &config).extract(id).unwrap();
        prop_assert_eq!(&extracted.fingerprint, &group.fingerprint);
        prop_assert!(extracted.fingerprint_matches());
        prop_assert_eq!(&extracted.inputs, &group.inputs);
        prop_assert_eq!(extracted.links.len(), group.links.len());
    }

    #[test]
    fn prop_document_shapes_are_equivalent(
        groups in proptest::collection::vec(arb_group(), 1..4),
    ) {
        let config = InterchangeConfig::default();
        let bare = encode_groups(&groups);
        let flat = json!({"groups": bare.clone()});
        let namespaced = json!({"geometry_nodes": {"groups": bare.clone()}});

        let from_bare = decode_groups(&bare, &config.document);
        let from_flat = decode_groups(&flat, &config.document);
        let from_namespaced = decode_groups(&namespaced, &config.document);

        prop_assert_eq!(from_bare.shape, DocumentShape::BareList);
        prop_assert_eq!(from_flat.shape, DocumentShape::Flat);
        prop_assert_eq!(from_namespaced.shape, DocumentShape::Namespaced);
        prop_assert_eq!(&from_bare.items, &groups);
        prop_assert_eq!(&from_flat.items, &groups);
        prop_assert_eq!(&from_namespaced.items, &groups);

        for doc in [bare, flat, namespaced] {
            let (bundle, dropped) = decode_bundle(&doc, &config.document);
            prop_assert_eq!(dropped, 0);
            prop_assert_eq!(&bundle.groups, &groups);
            prop_assert!(bundle.overrides.is_empty());
        }
    }
}
