//! HTML rendering of the annotated tree.
//!
//! Every node is emitted with a `dv-<status>` class. The "show unchanged"
//! control is a checkbox placed before the tree, and [`STYLESHEET`] hides
//! `dv-unchanged` nodes while it is unchecked, so toggling in the browser
//! needs neither script nor a round-trip. All snapshot content is escaped
//! and no `<script>` element is ever produced.

use crate::errors::ExError;
use crate::render::text::{label, marker, move_note, summary};
use crate::render::tree::{DeltaNode, NodeKey};

/// Styles the fragments rely on
pub const STYLESHEET: &str = "\
.dv-tree,.dv-tree ul{list-style:none;margin:0;padding-left:1.5em;font-family:monospace}
.dv-added{color:#116329}
.dv-removed{color:#82071e;text-decoration:line-through}
.dv-modified{color:#9a6700}
.dv-unchanged{color:#57606a}
.dv-toggle:not(:checked) ~ .dv-tree .dv-unchanged:not(.dv-root){display:none}
.dv-error{border:1px solid #82071e;padding:0.5em 1em}
";

/// Escape text for use in element content and quoted attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Render the tree as an HTML fragment inside `<div id="{container_id}">`.
///
/// `show_unchanged` sets the initial checkbox state.
pub fn render_html(
    tree: &DeltaNode,
    show_unchanged: bool,
    container_id: &str,
    max_value_width: usize,
) -> String {
    let id = escape_html(container_id);
    let mut out = String::new();
    out.push_str(&format!("<div class=\"dv-container\" id=\"{id}\">\n"));
    out.push_str(&format!(
        "<input type=\"checkbox\" class=\"dv-toggle\" id=\"{id}-toggle\"{}>\n",
        if show_unchanged { " checked" } else { "" }
    ));
    out.push_str(&format!(
        "<label for=\"{id}-toggle\">Show unchanged</label>\n"
    ));
    out.push_str("<ul class=\"dv-tree\">\n");
    push_node(tree, max_value_width, &mut out);
    out.push_str("</ul>\n</div>\n");
    out
}

fn push_node(node: &DeltaNode, width: usize, out: &mut String) {
    // The root line stays visible, as in the text view.
    let root = if node.key == NodeKey::Root { " dv-root" } else { "" };
    out.push_str(&format!(
        "<li class=\"dv-node dv-{}{root}\"><span class=\"dv-marker\">{}</span> <span class=\"dv-label\">{}</span>",
        node.status.as_str(),
        escape_html(&marker(node.status).to_string()),
        escape_html(&label(&node.key))
    ));
    let value = summary(&node.value, width);
    if !value.is_empty() {
        out.push_str(&format!(
            ": <span class=\"dv-value\">{}</span>",
            escape_html(&value)
        ));
    }
    if let Some(moved) = node.moved {
        out.push_str(&format!(
            "<span class=\"dv-move\">{}</span>",
            escape_html(&move_note(moved))
        ));
    }
    if let Some(children) = node.children().filter(|c| !c.is_empty()) {
        out.push_str("\n<ul>\n");
        for child in children {
            push_node(child, width, out);
        }
        out.push_str("</ul>\n");
    }
    out.push_str("</li>\n");
}

/// Visible error panel in place of the tree.
pub fn render_error_html(err: &ExError, container_id: &str) -> String {
    let mut out = format!(
        "<div class=\"dv-container dv-error\" id=\"{}\" role=\"alert\">\n",
        escape_html(container_id)
    );
    out.push_str(&format!(
        "<p class=\"dv-error-title\">{}</p>\n<dl>\n<dt>Code</dt><dd>{}</dd>\n",
        escape_html(err.kind().title()),
        escape_html(err.code())
    ));
    if let Some(side) = err.side() {
        out.push_str(&format!("<dt>Side</dt><dd>{side}</dd>\n"));
    }
    if let (Some(line), Some(column)) = (err.line(), err.column()) {
        out.push_str(&format!(
            "<dt>Position</dt><dd>line {line}, column {column}</dd>\n"
        ));
    }
    if let Some(path) = err.path() {
        out.push_str(&format!("<dt>Path</dt><dd>{}</dd>\n", escape_html(path)));
    }
    out.push_str("</dl>\n");
    if !err.message().is_empty() {
        out.push_str(&format!(
            "<p class=\"dv-error-message\">{}</p>\n",
            escape_html(err.message())
        ));
    }
    out.push_str("</div>\n");
    out
}

/// Wrap a fragment into a standalone page carrying [`STYLESHEET`].
pub fn render_document(fragment: &str, title: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n<style>\n{}</style>\n</head>\n<body>\n{}</body>\n</html>\n",
        escape_html(title),
        STYLESHEET,
        fragment
    )
}
