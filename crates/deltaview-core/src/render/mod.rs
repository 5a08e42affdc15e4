//! Delta presentation: annotated tree, text and HTML output, render sessions.

pub mod html;
pub mod session;
pub mod text;
pub mod tree;

pub use html::{escape_html, render_document, render_error_html, render_html, STYLESHEET};
pub use session::{RenderSession, ToggleState};
pub use text::{layout, render_error_text, to_text, RenderedView, ViewLine};
pub use tree::{build_tree, DeltaNode, Movement, NodeKey, NodeStatus, NodeValue};
