//! Human-readable summary renderer for deltas.

use crate::delta::model::{Delta, DeltaClassification, DeltaOp};
use serde_json::Value;

const VALUE_PREVIEW_WIDTH: usize = 60;

/// Render a Markdown summary of a [`Delta`].
///
/// Informational only; the structured delta is the source of truth.
pub fn render_summary(delta: &Delta) -> String {
    let mut out = String::new();

    out.push_str("## Delta\n\n");

    let class_label = match delta.classification {
        DeltaClassification::Identical => "Identical",
        DeltaClassification::Changed => "Changed",
    };
    out.push_str(&format!(
        "**Classification**: {class_label}  \n**Operations**: {}\n",
        delta.len()
    ));
    if let Ok(digest) = delta.digest() {
        out.push_str(&format!("**Digest**: `{}`\n", short(&digest)));
    }
    out.push('\n');

    if delta.classification == DeltaClassification::Identical {
        out.push_str("_No changes detected._\n");
        return out;
    }

    let stats = &delta.stats;
    out.push_str(&format!(
        "| Added | Removed | Modified | Moved |\n|---|---|---|---|\n| {} | {} | {} | {} |\n\n",
        stats.added, stats.removed, stats.modified, stats.moved
    ));

    let mut added = Vec::new();
    let mut removed = Vec::new();
    let mut modified = Vec::new();
    let mut moved = Vec::new();
    for op in &delta.ops {
        match op {
            DeltaOp::Add {
                path,
                value,
                moved_from: None,
            } => added.push(format!("- `{}`: `{}`\n", display_path(&path.to_pointer()), preview(value))),
            DeltaOp::Remove {
                path,
                old_value,
                moved_to: None,
            } => removed.push(format!(
                "- `{}`: `{}`\n",
                display_path(&path.to_pointer()),
                preview(old_value)
            )),
            DeltaOp::Remove {
                path,
                moved_to: Some(to),
                ..
            } => {
                let target = path.parent().child_index(*to);
                moved.push(format!(
                    "- `{}` → `{}`\n",
                    display_path(&path.to_pointer()),
                    display_path(&target.to_pointer())
                ));
            }
            // The remove half already listed the move.
            DeltaOp::Add { .. } => {}
            DeltaOp::Replace {
                path,
                old_value,
                new_value,
            } => modified.push(format!(
                "- `{}`: `{}` → `{}`\n",
                display_path(&path.to_pointer()),
                preview(old_value),
                preview(new_value)
            )),
        }
    }

    for (title, lines) in [
        ("Added", added),
        ("Removed", removed),
        ("Modified", modified),
        ("Moved", moved),
    ] {
        if lines.is_empty() {
            continue;
        }
        out.push_str(&format!("### {title}\n\n"));
        for line in lines {
            out.push_str(&line);
        }
        out.push('\n');
    }

    out
}

/// First 12 characters of a hex digest.
fn short(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}

fn display_path(pointer: &str) -> &str {
    if pointer.is_empty() {
        "(root)"
    } else {
        pointer
    }
}

fn preview(value: &Value) -> String {
    let text = value.to_string();
    if text.chars().count() <= VALUE_PREVIEW_WIDTH {
        return text;
    }
    let mut cut: String = text.chars().take(VALUE_PREVIEW_WIDTH - 1).collect();
    cut.push('…');
    cut
}
