//! Plain-text rendering of the annotated tree.
//!
//! [`layout`] flattens the tree into lines for one toggle state; [`to_text`]
//! prints them. Unchanged siblings are collapsed into a single
//! `… (N unchanged)` line when unchanged nodes are hidden.

use crate::errors::ExError;
use crate::render::tree::{DeltaNode, Movement, NodeKey, NodeStatus, NodeValue};
use serde_json::Value;

/// One line of the flattened view
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewLine {
    Node {
        depth: usize,
        status: NodeStatus,
        label: String,
        summary: String,
        moved: Option<Movement>,
    },
    /// A run of unchanged siblings folded away
    Hidden { depth: usize, count: usize },
}

/// The tree as currently displayed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub show_unchanged: bool,
    pub lines: Vec<ViewLine>,
}

impl RenderedView {
    /// Number of node lines (hidden runs excluded)
    pub fn visible_count(&self) -> usize {
        self.lines
            .iter()
            .filter(|l| matches!(l, ViewLine::Node { .. }))
            .count()
    }

    /// Number of nodes folded into `… (N unchanged)` lines
    pub fn hidden_count(&self) -> usize {
        self.lines
            .iter()
            .map(|l| match l {
                ViewLine::Hidden { count, .. } => *count,
                ViewLine::Node { .. } => 0,
            })
            .sum()
    }
}

/// Flatten `tree` for display.
///
/// The root is always shown. Scalars are printed as compact JSON cut to
/// `max_value_width` characters.
pub fn layout(tree: &DeltaNode, show_unchanged: bool, max_value_width: usize) -> RenderedView {
    let mut lines = Vec::new();
    push_node(tree, 0, show_unchanged, max_value_width, &mut lines);
    RenderedView {
        show_unchanged,
        lines,
    }
}

fn push_node(
    node: &DeltaNode,
    depth: usize,
    show_unchanged: bool,
    width: usize,
    lines: &mut Vec<ViewLine>,
) {
    lines.push(ViewLine::Node {
        depth,
        status: node.status,
        label: label(&node.key),
        summary: summary(&node.value, width),
        moved: node.moved,
    });

    let Some(children) = node.children() else {
        return;
    };
    let mut hidden = 0;
    for child in children {
        if !show_unchanged && child.status == NodeStatus::Unchanged {
            hidden += 1;
            continue;
        }
        if hidden > 0 {
            lines.push(ViewLine::Hidden {
                depth: depth + 1,
                count: hidden,
            });
            hidden = 0;
        }
        push_node(child, depth + 1, show_unchanged, width, lines);
    }
    if hidden > 0 {
        lines.push(ViewLine::Hidden {
            depth: depth + 1,
            count: hidden,
        });
    }
}

/// Print a laid-out view, one line per entry.
pub fn to_text(view: &RenderedView) -> String {
    let mut out = String::new();
    for line in &view.lines {
        match line {
            ViewLine::Node {
                depth,
                status,
                label,
                summary,
                moved,
            } => {
                out.push(marker(*status));
                out.push(' ');
                out.push_str(&"  ".repeat(*depth));
                out.push_str(label);
                if !summary.is_empty() {
                    out.push_str(": ");
                    out.push_str(summary);
                }
                if let Some(note) = moved.map(move_note) {
                    out.push_str(&note);
                }
            }
            ViewLine::Hidden { depth, count } => {
                out.push_str("  ");
                out.push_str(&"  ".repeat(*depth));
                out.push_str(&format!("… ({count} unchanged)"));
            }
        }
        out.push('\n');
    }
    out
}

/// Visible error state for a failed view.
pub fn render_error_text(err: &ExError) -> String {
    let mut out = format!("error: {}\n  code: {}\n", err.kind().title(), err.code());
    if let Some(side) = err.side() {
        out.push_str(&format!("  side: {side}\n"));
    }
    if let (Some(line), Some(column)) = (err.line(), err.column()) {
        out.push_str(&format!("  position: line {line}, column {column}\n"));
    }
    if let Some(path) = err.path() {
        out.push_str(&format!("  path: {}\n", if path.is_empty() { "(root)" } else { path }));
    }
    if !err.message().is_empty() {
        out.push_str(&format!("  {}\n", err.message()));
    }
    out
}

pub(crate) fn marker(status: NodeStatus) -> char {
    match status {
        NodeStatus::Added => '+',
        NodeStatus::Removed => '-',
        NodeStatus::Modified => '~',
        NodeStatus::Unchanged => ' ',
    }
}

pub(crate) fn label(key: &NodeKey) -> String {
    match key {
        NodeKey::Root => "(root)".to_string(),
        NodeKey::Field { name } => {
            if name.is_empty() || name.chars().any(char::is_control) {
                Value::String(name.clone()).to_string()
            } else {
                name.clone()
            }
        }
        // Tombstones keep their old index, which a live sibling may now hold.
        NodeKey::Item { left, right } => match (left, right) {
            (_, Some(index)) => format!("[{index}]"),
            (Some(index), None) => format!("[was {index}]"),
            (None, None) => "[?]".to_string(),
        },
    }
}

pub(crate) fn summary(value: &NodeValue, width: usize) -> String {
    match value {
        NodeValue::Object(children) => match children.len() {
            0 => "{}".to_string(),
            1 => "{1 field}".to_string(),
            n => format!("{{{n} fields}}"),
        },
        NodeValue::Array(children) => match children.len() {
            0 => "[]".to_string(),
            1 => "[1 item]".to_string(),
            n => format!("[{n} items]"),
        },
        NodeValue::Scalar(v) => truncate(&v.to_string(), width),
        NodeValue::Replaced { old, new } => format!(
            "{} → {}",
            truncate(&old.to_string(), width),
            truncate(&new.to_string(), width)
        ),
    }
}

pub(crate) fn move_note(moved: Movement) -> String {
    match moved {
        Movement::From(i) => format!(" (moved from [{i}])"),
        Movement::To(j) => format!(" (moved to [{j}])"),
    }
}

/// Cut `text` to at most `width` characters, marking the cut with `…`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delta::engine::{compute_delta, DiffOptions};
    use crate::errors::ExErrorKind;
    use crate::render::tree::build_tree;
    use crate::snapshot::Side;
    use serde_json::json;

    fn tree_of(left: Value, right: Value) -> DeltaNode {
        let delta = compute_delta(&left, &right, &DiffOptions::default()).unwrap();
        build_tree(&left, &delta).unwrap()
    }

    #[test]
    fn test_full_view_text() {
        let tree = tree_of(json!({"a": 1, "b": 2}), json!({"a": 1, "b": 3, "c": 4}));
        let text = to_text(&layout(&tree, true, 80));
        assert_eq!(
            text,
            "~ (root): {3 fields}\n    a: 1\n~   b: 2 → 3\n+   c: 4\n"
        );
    }

    #[test]
    fn test_hidden_runs_are_counted() {
        let tree = tree_of(
            json!({"a": 1, "b": 2, "c": 3, "d": 4}),
            json!({"a": 1, "b": 2, "c": 3, "d": 5}),
        );
        let view = layout(&tree, false, 80);
        assert_eq!(view.hidden_count(), 3);
        assert_eq!(view.visible_count(), 2);
        assert_eq!(
            to_text(&view),
            "~ (root): {4 fields}\n    … (3 unchanged)\n~   d: 4 → 5\n"
        );
    }

    #[test]
    fn test_move_notes() {
        let tree = tree_of(json!([1, 2, 3]), json!([3, 1, 2]));
        let text = to_text(&layout(&tree, false, 80));
        assert!(text.contains("+   [0]: 3 (moved from [2])"));
        assert!(text.contains("-   [was 2]: 3 (moved to [0])"));
    }

    #[test]
    fn test_tombstone_labels_do_not_collide_with_live_items() {
        let tree = tree_of(json!([1, 2, 3]), json!([3, 1, 2]));
        let view = layout(&tree, true, 80);
        let labels: Vec<&str> = view
            .lines
            .iter()
            .filter_map(|l| match l {
                ViewLine::Node { depth: 1, label, .. } => Some(label.as_str()),
                _ => None,
            })
            .collect();
        let mut unique = labels.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(labels.len(), 4);
        assert_eq!(unique.len(), labels.len());
        assert!(labels.contains(&"[was 2]"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
        assert_eq!(truncate("ééééé", 3), "éé…");
    }

    #[test]
    fn test_odd_field_names_are_quoted() {
        assert_eq!(
            label(&NodeKey::Field {
                name: "a\nb".to_string()
            }),
            "\"a\\nb\""
        );
        assert_eq!(label(&NodeKey::Field { name: String::new() }), "\"\"");
    }

    #[test]
    fn test_error_text() {
        let err = ExError::new(ExErrorKind::Parse)
            .with_side(Side::Left)
            .with_position(1, 2)
            .with_message("key must be a string");
        let text = render_error_text(&err);
        assert!(text.starts_with("error: "));
        assert!(text.contains("code: ERR_PARSE"));
        assert!(text.contains("side: left"));
        assert!(text.contains("line 1, column 2"));
    }
}
