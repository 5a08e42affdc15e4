//! Tree, text, HTML and summary rendering.

mod common;

use common::diff;
use deltaview_core::delta::summary::render_summary;
use deltaview_core::render::{
    escape_html, layout, render_document, render_html, to_text, Movement, NodeKey, NodeValue,
    ViewLine,
};
use deltaview_core::{build_tree, DeltaNode, JsonPath, NodeStatus};
use serde_json::{json, Value};

fn tree_of(left: &Value, right: &Value) -> DeltaNode {
    build_tree(left, &diff(left, right)).unwrap()
}

fn node<'a>(tree: &'a DeltaNode, p: &str) -> &'a DeltaNode {
    tree.find(&JsonPath::parse(p).unwrap()).unwrap()
}

#[test]
fn test_reference_statuses() {
    let tree = tree_of(&json!({"a": 1, "b": 2}), &json!({"a": 1, "b": 3, "c": 4}));
    assert_eq!(node(&tree, "").status, NodeStatus::Modified);
    assert_eq!(node(&tree, "/a").status, NodeStatus::Unchanged);
    assert_eq!(node(&tree, "/b").status, NodeStatus::Modified);
    assert_eq!(node(&tree, "/c").status, NodeStatus::Added);
}

#[test]
fn test_unchanged_subtrees_remain_queryable() {
    let tree = tree_of(
        &json!({"meta": {"host": "ws01", "tags": ["a", "b"]}, "n": 1}),
        &json!({"meta": {"host": "ws01", "tags": ["a", "b"]}, "n": 2}),
    );
    let tags = node(&tree, "/meta/tags/1");
    assert_eq!(tags.status, NodeStatus::Unchanged);
    assert_eq!(tags.value, NodeValue::Scalar(json!("b")));
}

#[test]
fn test_ancestors_of_deep_change_are_modified() {
    let tree = tree_of(&json!({"r": {"s": [0, {"u": 1}]}}), &json!({"r": {"s": [0, {"u": 2}]}}));
    for p in ["", "/r", "/r/s", "/r/s/1"] {
        assert_eq!(node(&tree, p).status, NodeStatus::Modified, "at {p:?}");
    }
    assert_eq!(node(&tree, "/r/s/0").status, NodeStatus::Unchanged);
}

#[test]
fn test_removed_container_children_are_removed() {
    let tree = tree_of(&json!({"gone": {"x": [1]}, "kept": 0}), &json!({"kept": 0}));
    let gone = &tree.children().unwrap()[0];
    assert_eq!(gone.key, NodeKey::Field { name: "gone".to_string() });
    assert_eq!(gone.status, NodeStatus::Removed);
    let x = &gone.children().unwrap()[0];
    assert_eq!(x.status, NodeStatus::Removed);
    assert_eq!(x.children().unwrap()[0].status, NodeStatus::Removed);
    assert!(tree.find(&JsonPath::parse("/gone").unwrap()).is_none());
}

#[test]
fn test_move_pair_in_tree() {
    let tree = tree_of(&json!({"x": [1, 2, 3]}), &json!({"x": [3, 1, 2]}));
    let first = node(&tree, "/x/0");
    assert_eq!(first.status, NodeStatus::Added);
    assert_eq!(first.moved, Some(Movement::From(2)));
}

#[test]
fn test_deeply_nested_documents() {
    let mut left = json!(0);
    let mut right = json!(1);
    for _ in 0..200 {
        left = json!({ "n": left });
        right = json!({ "n": right });
    }
    let tree = tree_of(&left, &right);
    assert_eq!(tree.status, NodeStatus::Modified);
    assert_eq!(tree.count_nodes(), 201);
}

#[test]
fn test_text_view_toggle_filters_only() {
    let tree = tree_of(
        &json!({"a": 1, "b": [1, 2, 3], "c": "same"}),
        &json!({"a": 1, "b": [1, 3], "c": "same"}),
    );
    let full = layout(&tree, true, 80);
    let folded = layout(&tree, false, 80);
    assert_eq!(full.hidden_count(), 0);
    assert!(folded.hidden_count() > 0);

    let changed = |view: &deltaview_core::render::RenderedView| -> Vec<String> {
        view.lines
            .iter()
            .filter_map(|l| match l {
                ViewLine::Node { status, label, .. } if *status != NodeStatus::Unchanged => {
                    Some(label.clone())
                }
                _ => None,
            })
            .collect()
    };
    assert_eq!(changed(&full), changed(&folded));
    assert!(to_text(&folded).contains("-     [was 1]: 2"));
}

#[test]
fn test_long_scalars_truncated_in_text() {
    let long = "v".repeat(100);
    let tree = tree_of(&json!({"k": 1}), &json!({"k": long}));
    let text = to_text(&layout(&tree, true, 10));
    assert!(text.contains("1 → \"vvvvvvvv…"));
}

#[test]
fn test_html_is_inert_for_embedded_markup() {
    let payload = "<img src=x onerror=alert(1)><script>alert(2)</script>";
    let tree = tree_of(&json!({"note": "plain"}), &json!({"note": payload}));
    let html = render_html(&tree, false, "viewer-1", 200);
    assert!(!html.contains("<script"));
    assert!(!html.contains("<img"));
    assert!(html.contains(&escape_html(&Value::from(payload).to_string())));

    let doc = render_document(&html, "Delta");
    assert!(!doc.contains("<script"));
    assert!(doc.contains(".dv-toggle:not(:checked) ~ .dv-tree .dv-unchanged:not(.dv-root){display:none}"));
}

#[test]
fn test_html_contains_every_node() {
    let tree = tree_of(&json!([1, 2]), &json!([1, 2, 3]));
    let html = render_html(&tree, true, "dv", 80);
    assert_eq!(html.matches("<li ").count(), tree.count_nodes());
}

#[test]
fn test_summary_for_reference_example() {
    let summary = render_summary(&diff(&json!({"x": [1, 2, 3]}), &json!({"x": [1, 3]})));
    assert!(summary.contains("**Operations**: 1"));
    assert!(summary.contains("### Removed\n\n- `/x/1`: `2`"));
}
