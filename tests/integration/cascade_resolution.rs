//! Cascading resolution through hand-built settings trees

use filesettings::settings::{ChangeKind, SettingsEvent};
use filesettings::{
    IndentStyle, NewlineType, Property, PropertyValue, SettingsError, SettingsNode, SourceFile,
};
use std::cell::RefCell;
use std::rc::Rc;

fn python_file() -> Rc<SourceFile> {
    SourceFile::with_language("/tmp/filesettings-cascade/app.py", Some("python3"))
}

fn node_with(file: &Rc<SourceFile>, origin: &str, values: &[(Property, PropertyValue)]) -> SettingsNode {
    let mut node = SettingsNode::with_origin(file, origin);
    for (property, value) in values {
        node.set(*property, value.clone()).unwrap();
    }
    node
}

fn collect_names(node: &SettingsNode) -> Rc<RefCell<Vec<String>>> {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    node.subscribe(move |event| {
        if let Some(change) = event.property_change() {
            sink.borrow_mut().push(change.notification_name());
        }
    });
    seen
}

#[test]
fn test_fresh_root_reports_defaults() {
    let file = python_file();
    let root = SettingsNode::new(&file);
    let resolved = root.resolve();

    assert_eq!(resolved.indent_width, -1);
    assert_eq!(resolved.indent_style, IndentStyle::Spaces);
    assert_eq!(resolved.right_margin_position, 80);
    assert!(!resolved.show_right_margin);
    assert_eq!(resolved.tab_width, 8);
    assert!(resolved.trim_trailing_whitespace);
    assert!(resolved.insert_trailing_newline);
    assert_eq!(resolved.newline_type, NewlineType::Lf);
    assert_eq!(resolved.encoding, None);
    assert_eq!(resolved.effective_indent_width(), 8);
}

#[test]
fn test_three_level_cascade() {
    let file = python_file();
    let mut inner = node_with(&file, "inner", &[(Property::Encoding, "utf-8".into())]);
    inner.add_child(node_with(
        &file,
        "innermost",
        &[(Property::NewlineType, NewlineType::CrLf.into())],
    ));

    let mut root = SettingsNode::new(&file);
    root.add_child(node_with(&file, "low", &[(Property::TabWidth, 2u32.into())]));
    root.add_child(inner);

    assert_eq!(root.get(Property::TabWidth), PropertyValue::UInt(2));
    assert_eq!(root.get(Property::Encoding), PropertyValue::from("utf-8"));
    assert_eq!(
        root.get(Property::NewlineType),
        PropertyValue::NewlineType(NewlineType::CrLf)
    );
    assert_eq!(root.explain(Property::NewlineType), Some("innermost"));
    assert_eq!(root.explain(Property::TabWidth), Some("low"));
    assert_eq!(root.explain(Property::IndentWidth), None);
}

#[test]
fn test_root_value_loses_to_child() {
    let file = python_file();
    let mut root = SettingsNode::new(&file);
    root.set(Property::RightMarginPosition, 100u32).unwrap();
    root.add_child(node_with(
        &file,
        "provider",
        &[(Property::RightMarginPosition, 72u32.into())],
    ));

    assert_eq!(root.get(Property::RightMarginPosition), PropertyValue::UInt(72));
    assert!(root.is_set_locally(Property::RightMarginPosition));
}

#[test]
fn test_child_changes_reach_root_listeners() {
    let file = python_file();
    let mut root = SettingsNode::new(&file);
    root.add_child(SettingsNode::with_origin(&file, "live"));
    let seen = collect_names(&root);

    let mut child = root.child_by_origin_mut("live").unwrap();
    child.set(Property::TabWidth, 4u32).unwrap();
    child.set(Property::TabWidth, 4u32).unwrap();
    child.set(Property::TabWidth, 2u32).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec!["tab-width", "tab-width-set", "tab-width"]
    );
    assert_eq!(root.get(Property::TabWidth), PropertyValue::UInt(2));
}

#[test]
fn test_handle_writes_keep_order_and_forwarding() {
    let file = python_file();
    let mut root = SettingsNode::new(&file);
    root.add_child(node_with(&file, "low", &[(Property::TabWidth, 2u32.into())]));
    root.add_child(SettingsNode::with_origin(&file, "high"));
    let seen = collect_names(&root);

    root.child_mut(0)
        .unwrap()
        .set(Property::TabWidth, 3u32)
        .unwrap();

    let origins: Vec<&str> = root.children().iter().map(|c| c.origin()).collect();
    assert_eq!(origins, vec!["high", "low"]);
    assert_eq!(root.get(Property::TabWidth), PropertyValue::UInt(3));
    assert_eq!(root.explain(Property::TabWidth), Some("high"));
    assert_eq!(*seen.borrow(), vec!["tab-width", "tab-width-set"]);
}

#[test]
fn test_grandchild_write_reaches_root() {
    let file = python_file();
    let mut middle = SettingsNode::with_origin(&file, "middle");
    middle.add_child(SettingsNode::with_origin(&file, "leaf"));
    let mut root = SettingsNode::new(&file);
    root.add_child(middle);
    let seen = collect_names(&root);

    let mut middle = root.child_by_origin_mut("middle").unwrap();
    let mut leaf = middle.child_by_origin_mut("leaf").unwrap();
    leaf.set(Property::NewlineType, NewlineType::CrLf).unwrap();
    leaf.set_is_set(Property::NewlineType, false).unwrap();

    assert_eq!(
        *seen.borrow(),
        vec!["newline-type", "newline-type-set", "newline-type-set"]
    );
    assert!(!root.is_set(Property::NewlineType));
}

#[test]
fn test_private_events_stay_on_child() {
    let file = python_file();
    let mut root = SettingsNode::new(&file);
    root.add_child(SettingsNode::with_origin(&file, "live"));

    let root_events = Rc::new(RefCell::new(0usize));
    let sink = Rc::clone(&root_events);
    root.subscribe(move |_| *sink.borrow_mut() += 1);

    let child = root.child_mut(0).unwrap();
    let child_events = Rc::new(RefCell::new(Vec::new()));
    let child_sink = Rc::clone(&child_events);
    child.subscribe(move |event| {
        if let SettingsEvent::Private(key) = event {
            child_sink.borrow_mut().push(key.clone());
        }
    });
    child.notify_private("schema-reloaded");

    assert_eq!(*child_events.borrow(), vec!["schema-reloaded".to_string()]);
    assert_eq!(*root_events.borrow(), 0);
}

#[test]
fn test_retraction_emits_presence_and_yields_to_child() {
    let file = python_file();
    let mut root = SettingsNode::new(&file);
    root.add_child(node_with(&file, "provider", &[(Property::IndentWidth, 4i32.into())]));
    let mut outer = SettingsNode::new(&file);
    outer.set(Property::IndentWidth, 2i32).unwrap();
    outer.add_child(root);

    let kinds = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&kinds);
    outer.subscribe(move |event| {
        if let Some(change) = event.property_change() {
            sink.borrow_mut().push(change.kind);
        }
    });

    outer.set_is_set(Property::IndentWidth, false).unwrap();
    outer.set_is_set(Property::IndentWidth, false).unwrap();

    assert_eq!(*kinds.borrow(), vec![ChangeKind::Presence]);
    assert_eq!(outer.get(Property::IndentWidth), PropertyValue::Int(4));
    assert!(outer.is_set(Property::IndentWidth));
    assert!(!outer.is_set_locally(Property::IndentWidth));
}

#[test]
fn test_closed_file_unbinds_whole_tree() {
    let file = python_file();
    let mut root = SettingsNode::new(&file);
    root.add_child(node_with(&file, "provider", &[(Property::TabWidth, 3u32.into())]));
    assert_eq!(root.get(Property::TabWidth), PropertyValue::UInt(3));

    file.invalidate();

    assert!(!root.is_bound());
    assert_eq!(root.get(Property::TabWidth), PropertyValue::UInt(8));
    assert!(!root.is_set(Property::TabWidth));
    assert_eq!(root.explain(Property::TabWidth), None);
    assert_eq!(root.set(Property::TabWidth, 4u32), Err(SettingsError::UnboundFile));
    assert!(matches!(root.file(), Err(SettingsError::UnboundFile)));
}

#[test]
fn test_named_access_round_trips_through_table() {
    let file = python_file();
    let mut root = SettingsNode::new(&file);
    root.set_named("show_right_margin", true).unwrap();

    assert_eq!(root.get_named("show-right-margin"), Ok(PropertyValue::Bool(true)));
    assert_eq!(root.is_set_named("show-right-margin"), Ok(true));
    assert!(matches!(
        root.get_named("font-size"),
        Err(SettingsError::InvalidProperty(_))
    ));
    assert!(matches!(
        root.set_named("tab-width", "wide"),
        Err(SettingsError::TypeMismatch { .. })
    ));
}
