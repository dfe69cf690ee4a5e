use std::cell::Cell;
use std::rc::Rc;

use frameline_animation_core::{
    parse_stored_node_json, Color4, Diagnostic, Node, PropertyBag, StoredNode, Thickness, Value,
    ValueKind, Vector2,
};

fn load(name: &str) -> StoredNode {
    let json = frameline_test_fixtures::nodes::json(name).expect("load node fixture");
    parse_stored_node_json(&json).expect("parse stored node")
}

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

#[test]
fn every_fixture_loads_into_a_node() {
    for key in frameline_test_fixtures::nodes::keys() {
        let stored = load(&key);
        let node = stored
            .clone()
            .into_node(PropertyBag::new())
            .unwrap_or_else(|e| panic!("{key}: {e}"));
        assert_eq!(node.animators().len(), stored.animators.len(), "{key}");
    }
}

#[test]
fn bouncing_loop_plays_through_the_jump() {
    let mut bag = PropertyBag::new();
    bag.define("Position", Vector2::default().into());
    bag.define("Opacity", Value::Float(0.0));
    bag.define("Shadow", Value::Float(0.0));
    let mut node = load("bouncing-loop").into_node(bag).unwrap();
    node.run_animation("loop_start", None).unwrap();

    node.advance_animation(0.5);
    let pos = Vector2::try_from(node.object().get("Position").unwrap()).unwrap();
    approx(pos.y, 100.0, 1e-3);
    assert_eq!(node.object().get("Opacity"), Some(&Value::Float(10.0)));

    // 0.5 + 0.7 s = frame 36, which loops to frame 6.
    node.advance_animation(0.7);
    assert!(node.is_running());
    assert_eq!(node.animation_frame(), 6);
    let opacity = node.object().get("Opacity").and_then(Value::as_float).unwrap();
    approx(opacity, 6.0, 1e-3);
}

#[test]
fn trigger_fans_out_to_each_named_animation_once() {
    let mut bag = PropertyBag::new();
    bag.define("Height", Value::Float(-1.0));
    bag.define("Angle", Value::Float(-1.0));
    let mut node = load("multi-trigger").into_node(bag).unwrap();
    assert_eq!(node.trigger(), "");

    node.run_animation("idle", None).unwrap();
    assert_eq!(node.object().writes(), 0);

    node.advance_animation(5.0 / 30.0);
    assert_eq!(node.trigger(), "jump@Anim1, stop@Anim2");

    let anim1 = node.animations().find(Some("Anim1")).unwrap();
    assert!(anim1.is_running());
    assert_eq!(anim1.running_marker_id(), Some("jump"));
    assert_eq!(anim1.frame(), 0);
    let anim2 = node.animations().find(Some("Anim2")).unwrap();
    assert!(anim2.is_running());
    assert_eq!(anim2.running_marker_id(), Some("stop"));
    assert_eq!(anim2.frame(), 10);
    assert_eq!(node.running_animation_count(), 3);

    // One immediate apply per started animation.
    assert_eq!(node.object().writes(), 2);
    let height = node.object().get("Height").and_then(Value::as_float).unwrap();
    approx(height, 0.0, 1e-6);
    assert_eq!(node.object().get("Angle"), Some(&Value::Float(90.0)));

    // The trigger key sits on frame 5 only; later ticks do not refire it.
    node.advance_animation(1.0 / 30.0);
    assert_eq!(node.animations().find(Some("Anim1")).unwrap().frame(), 1);
}

#[test]
fn malformed_trigger_tokens_are_skipped() {
    let mut bag = PropertyBag::new();
    bag.define("Height", Value::Float(0.0));
    bag.define("Angle", Value::Float(0.0));
    let mut stored = load("multi-trigger");
    stored.trigger = "jump@Anim1,,x@y@z, missing@Anim2".to_string();
    let mut node = stored.into_node(bag).unwrap();
    let seen = Rc::new(std::cell::RefCell::new(Vec::new()));
    let sink = seen.clone();
    node.set_diagnostics_sink(move |d| sink.borrow_mut().push(d.clone()));

    node.on_trigger("Trigger", 0.0);
    assert!(node.animations().find(Some("Anim1")).unwrap().is_running());
    assert!(!node.animations().find(Some("Anim2")).unwrap().is_running());
    assert_eq!(
        seen.borrow().as_slice(),
        &[
            Diagnostic::MalformedTrigger { token: "".into() },
            Diagnostic::MalformedTrigger {
                token: "x@y@z".into()
            },
            Diagnostic::MarkerNotFound {
                animation: Some("Anim2".into()),
                marker: "missing".into()
            },
        ]
    );
}

#[test]
fn stop_fixture_ends_on_final_values() {
    let mut bag = PropertyBag::new();
    bag.define("Color", Color4::BLACK.into());
    bag.define("Margin", Thickness::uniform(0.0).into());
    let mut node: Node<PropertyBag> = load("stop-at-end").into_node(bag).unwrap();
    node.run_animation("start", None).unwrap();
    let stops = Rc::new(Cell::new(0u32));
    let counter = stops.clone();
    node.set_on_animation_stopped(move || counter.set(counter.get() + 1));

    for _ in 0..40 {
        node.advance_animation(1.0 / 30.0);
    }
    assert!(!node.is_running());
    assert_eq!(stops.get(), 1);
    assert_eq!(node.animation_frame(), 20);
    assert_eq!(
        node.object().get("Color"),
        Some(&Value::ColorRgba([1.0, 1.0, 1.0, 1.0]))
    );
    assert_eq!(
        node.object().get("Margin"),
        Some(&Value::Thickness([4.0, 4.0, 2.0, 2.0]))
    );
    // "Removed" has no property on this object and stays inert.
    assert!(node
        .animators()
        .find("Removed", None)
        .unwrap()
        .binding_state()
        .is_zombie());
}

#[test]
fn stored_form_survives_a_json_round_trip() {
    let stored = load("bouncing-loop");
    let node = stored.clone().into_node(PropertyBag::new()).unwrap();
    let text = serde_json::to_string(&node.to_stored()).unwrap();
    let again = parse_stored_node_json(&text).unwrap();
    assert_eq!(again.id.as_deref(), Some("Ball"));
    assert_eq!(again.animations, stored.animations);
    assert_eq!(again.animators.len(), 3);
    for (a, b) in again.animators.iter().zip(&stored.animators) {
        assert_eq!(a.target_property, b.target_property);
        assert_eq!(a.keys, b.keys);
        assert_eq!(a.kind, b.resolved_kind());
    }
    assert_eq!(again.animators[0].kind, Some(ValueKind::Vec2));
}
