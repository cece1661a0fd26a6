// SPDX-License-Identifier: MIT OR Apache-2.0
//! End to end interchange between two in-memory scenes.

use ordoplay_interchange_graph::codec::{decode_bundle, encode_bundle};
use ordoplay_interchange_graph::host::HostSocket;
use ordoplay_interchange_graph::memory::{MemoryScene, SceneGroup, SceneNode};
use ordoplay_interchange_graph::{import_groups, HostValue, InterchangeConfig, PortableValue, SceneHost};
use ordoplay_interchange_overrides::{export_bundle, ExportOptions, OverrideApplier, OverrideCollector};
use serde_json::json;

fn socket(name: &str, identifier: &str, socket_type: &str, default: Option<HostValue>) -> HostSocket {
    HostSocket {
        name: name.into(),
        identifier: identifier.into(),
        socket_type: socket_type.into(),
        default,
    }
}

fn source_scene() -> MemoryScene {
    let mut scene = MemoryScene::new();
    scene.insert_group(
        SceneGroup::new("Jitter", "GeometryNodeTree")
            .with_node(SceneNode::new("Group Input", "GROUP_INPUT", "NodeGroupInput"))
            .with_node(
                SceneNode::new("Noise", "CUSTOM", "ThirdPartyNoiseNode")
                    .with_property("octaves", HostValue::Int(4))
                    .with_property("mode", HostValue::String("PERLIN".into())),
            )
            .with_node(SceneNode::new("Group Output", "GROUP_OUTPUT", "NodeGroupOutput"))
            .with_link("Group Input", "Geometry", "Noise", "Geometry")
            .with_link("Noise", "Geometry", "Group Output", "Geometry"),
    );
    let twist = scene.insert_group(
        SceneGroup::new("Twist", "GeometryNodeTree")
            .with_input(socket("Geometry", "Socket_0", "NodeSocketGeometry", None))
            .with_input(socket("Angle", "Socket_1", "NodeSocketFloat", Some(HostValue::Float(0.5))))
            .with_input(socket("Steps", "Socket_2", "NodeSocketInt", Some(HostValue::Int(2))))
            .with_input(socket(
                "Axis",
                "Socket_3",
                "NodeSocketVector",
                Some(HostValue::Sequence(vec![HostValue::Float(0.0); 3])),
            ))
            .with_output(socket("Geometry", "Socket_4", "NodeSocketGeometry", None))
            .with_node(SceneNode::new("Group Input", "GROUP_INPUT", "NodeGroupInput").with_location(-300.0, 0.0))
            .with_node(SceneNode::new("Jitter", "GROUP", "GeometryNodeGroup").with_group_ref("Jitter"))
            .with_node(SceneNode::new("Group Output", "GROUP_OUTPUT", "NodeGroupOutput").with_location(300.0, 0.0))
            .with_link("Group Input", "Geometry", "Jitter", "Geometry")
            .with_link("Jitter", "Geometry", "Group Output", "Geometry"),
    );

    let cube = scene.add_object("Cube");
    let binding = scene.create_binding(cube, "Twister", twist).unwrap();
    scene.write_property(binding, "Socket_1", HostValue::Float(1.5)).unwrap();
    scene.write_property(binding, "Socket_2", HostValue::Int(7)).unwrap();
    scene
        .write_property(
            binding,
            "Socket_3",
            HostValue::Sequence(vec![HostValue::Float(0.0), HostValue::Float(0.0), HostValue::Float(1.0)]),
        )
        .unwrap();
    scene.set_binding_flags(binding, None, Some(false)).unwrap();
    scene
}

#[test]
fn bundle_round_trip_reproduces_groups_and_overrides() {
    let config = InterchangeConfig::default();
    let source = source_scene();

    let bundle = export_bundle(&source, &config, &ExportOptions::default());
    let text = serde_json::to_string_pretty(&encode_bundle(&bundle, &config.document)).unwrap();
    let doc: serde_json::Value = serde_json::from_str(&text).unwrap();
    let (decoded, dropped) = decode_bundle(&doc, &config.document);
    assert_eq!(dropped, 0);
    assert_eq!(decoded, bundle);

    let mut target = MemoryScene::new();
    let imported = import_groups(&mut target, &decoded.groups, &config);
    assert_eq!(imported.created, 2);

    let stats = OverrideApplier::new(&mut target, &config).apply_batch(&decoded.overrides);
    assert_eq!(stats.placeholders, 1);
    assert_eq!(stats.created_bindings, 1);
    assert_eq!(stats.inputs_failed, 0);

    let again = export_bundle(&target, &config, &ExportOptions::default());
    for (a, b) in bundle.groups.iter().zip(&again.groups) {
        assert_eq!(a.name, b.name);
        assert_eq!(a.fingerprint, b.fingerprint);
        assert!(b.fingerprint_matches());
    }
    assert_eq!(again.overrides, bundle.overrides);

    let noise = again.groups[1].node("Noise").unwrap();
    assert!(noise.is_unknown);
    assert!(noise.props.as_ref().is_some_and(|p| !p.is_empty()));
}

#[test]
fn reapplying_a_document_changes_nothing() {
    let config = InterchangeConfig::default();
    let mut scene = source_scene();
    let doc = json!({
        "geometry_nodes": {
            "overrides": [{
                "object": "Sphere",
                "modifier_name": "Extra",
                "group": "twist",
                "enabled_viewport": false,
                "inputs": {"Socket_1": 0.25, "Steps": 3, "axis": [1.0, 0.0, 0.0]}
            }]
        }
    });

    let first = OverrideApplier::new(&mut scene, &config).apply_document(&doc);
    let snapshot = scene.clone();
    let second = OverrideApplier::new(&mut scene, &config).apply_document(&doc);

    assert_eq!(first.created_bindings + second.created_bindings, 1);
    assert_eq!(first.placeholders + second.placeholders, 1);
    assert_eq!(first.inputs_set, 3);
    assert_eq!(second.inputs_set, 3);
    assert_eq!(scene, snapshot);

    let sphere = scene.object_by_name("Sphere").unwrap().id;
    let collected = OverrideCollector::new(&scene, &config).collect(sphere);
    assert_eq!(collected.len(), 1);
    let extra = &collected[0];
    assert_eq!(extra.modifier_name.as_deref(), Some("Extra"));
    assert_eq!(extra.enabled_viewport, Some(false));
    assert_eq!(extra.inputs["Angle"], PortableValue::Number(0.25));
    assert_eq!(extra.inputs["Steps"], PortableValue::Number(3.0));
    assert_eq!(
        extra.inputs["Axis"],
        PortableValue::List(vec![1.0.into(), 0.0.into(), 0.0.into()])
    );
}

#[test]
fn placeholders_follow_the_policy() {
    let config = InterchangeConfig::default();
    let doc = json!([{"object_name": "Ghost", "group_name": "Twist", "inputs": {"Angle": 2.0}}]);

    let mut strict = source_scene();
    let stats = OverrideApplier::new(&mut strict, &config)
        .create_placeholders(false)
        .apply_document(&doc);
    assert_eq!(stats.missing_objects, 1);
    assert_eq!(stats.inputs_set, 0);
    assert!(strict.object_by_name("Ghost").is_none());

    let mut lenient = source_scene();
    let stats = OverrideApplier::new(&mut lenient, &config).apply_document(&doc);
    assert!(stats.placeholders >= 1);
    assert_eq!(stats.created_bindings, 1);
    assert_eq!(stats.inputs_set, 1);

    let ghost = lenient.object_by_name("Ghost").unwrap();
    let binding = ghost.bindings[0].id;
    assert_eq!(lenient.read_property(binding, "Socket_1"), Ok(HostValue::Float(2.0)));
}
