#![cfg(feature = "serde")]

use fiberweave_core::{
    reconcile_child_fibers, ChildSpec, DiagnosticLevel, DiagnosticsConfig, Error, FiberTree,
    MatchDecision, PriorityLevel, PropValue, Props, RecordingSink, SpecShape,
};
use fiberweave_test_support::fixtures::chain;
use serde_json::json;

#[test]
fn tagged_objects_become_specs() {
    let spec = ChildSpec::from_json(&json!([
        {"$$typeof": "element", "type": "row", "key": "a", "props": {"x": 1, "label": "hi"}},
        {"$$typeof": "coroutine", "handler": "layout", "key": 7},
        {"$$typeof": "yield", "continuation": "resume", "props": {"step": 2.5}},
        null,
        false,
        "text",
        3
    ]))
    .unwrap();

    let ChildSpec::List(items) = spec else {
        panic!("expected a list, got {spec:?}");
    };
    assert_eq!(items.len(), 7);

    let ChildSpec::Element(element) = &items[0] else {
        panic!("expected an element");
    };
    assert_eq!(element.element_type.as_str(), "row");
    assert_eq!(element.key.as_ref().map(|k| k.as_str()), Some("a"));
    assert_eq!(element.props.get("x"), Some(&PropValue::Int(1)));
    assert_eq!(element.props.get("label"), Some(&PropValue::Str("hi".into())));

    let ChildSpec::Coroutine(coroutine) = &items[1] else {
        panic!("expected a coroutine");
    };
    assert_eq!(coroutine.key.as_ref().map(|k| k.as_str()), Some("7"));

    let ChildSpec::Yield(yield_spec) = &items[2] else {
        panic!("expected a yield");
    };
    assert_eq!(yield_spec.props.get("step"), Some(&PropValue::Float(2.5)));

    assert_eq!(items[3], ChildSpec::Empty);
    assert_eq!(items[4], ChildSpec::Bool(false));
    assert_eq!(items[5], ChildSpec::Text("text".into()));
    assert_eq!(items[6], ChildSpec::Number(3.0));
}

#[test]
fn nested_children_prop_is_parsed() {
    let spec = ChildSpec::from_json_str(
        r#"{"$$typeof": "element", "type": "table",
            "props": {"children": [{"$$typeof": "element", "type": "row", "key": "a"}]}}"#,
    )
    .unwrap();
    let ChildSpec::Element(table) = spec else {
        panic!("expected an element");
    };
    let Some(ChildSpec::List(rows)) = table.props.children() else {
        panic!("expected children");
    };
    assert_eq!(rows.len(), 1);
}

#[test]
fn unknown_tags_stay_unrecognized() {
    let mut tree = FiberTree::new();
    let root = tree.create_root("root", Props::new(), PriorityLevel::Low);
    let spec = ChildSpec::from_json(&json!([
        {"$$typeof": "portal", "type": "row"},
        {"type": "row"},
        {"$$typeof": "element", "type": "row", "key": "a"}
    ]))
    .unwrap();

    let mut sink = RecordingSink::new();
    let head = reconcile_child_fibers(&mut tree, &mut sink, root, None, &spec, PriorityLevel::Low);
    assert_eq!(chain(&tree, head).len(), 1);

    let shapes: Vec<_> = sink.unrecognized().map(|u| u.shape).collect();
    assert_eq!(shapes, [SpecShape::Opaque, SpecShape::Opaque]);
    assert!(sink
        .unrecognized()
        .all(|u| u.detail.contains("\"type\":\"row\"")));
}

#[test]
fn malformed_specs_are_rejected() {
    for text in [
        r#"{"$$typeof": "element"}"#,
        r#"{"$$typeof": "element", "type": 3}"#,
        r#"{"$$typeof": "element", "type": "row", "key": [1]}"#,
        r#"{"$$typeof": "element", "type": "row", "props": 4}"#,
        r#"{"$$typeof": "element", "type": "row", "props": {"style": {"color": "red"}}}"#,
        r#"{"$$typeof": "yield"}"#,
        "[1,",
    ] {
        assert!(
            matches!(ChildSpec::from_json_str(text), Err(Error::InvalidSpec(_))),
            "accepted {text}"
        );
    }
}

#[test]
fn decisions_serialize_in_snake_case() {
    let mut tree = FiberTree::new();
    let prior = tree.create_root("row", Props::new(), PriorityLevel::Low);
    let clone = serde_json::to_value(MatchDecision::Clone { prior }).unwrap();
    assert!(clone.get("clone").is_some());
    assert_eq!(
        serde_json::to_value(MatchDecision::Create).unwrap(),
        json!("create")
    );
}

#[test]
fn diagnostics_config_from_json() {
    let config =
        DiagnosticsConfig::from_json_str(r#"{"unrecognized_level": "debug"}"#).unwrap();
    assert_eq!(config.unrecognized_level, DiagnosticLevel::Debug);
    assert!(!config.trace_placements);

    let config = DiagnosticsConfig::from_json_str("{}").unwrap();
    assert_eq!(config, DiagnosticsConfig::default());

    assert!(matches!(
        DiagnosticsConfig::from_json_str(r#"{"unrecognized_level": "loud"}"#),
        Err(Error::Config(_))
    ));
}
