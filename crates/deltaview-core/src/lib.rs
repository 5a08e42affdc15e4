//! DeltaView Core - structural deltas between JSON snapshots
//!
//! This crate compares two versions of a record and presents the result:
//! - Snapshot parsing with side-aware parse errors
//! - Deterministic delta computation (add / remove / replace, array moves)
//! - Patch application and reversal with old-value verification
//! - An annotated render tree with text, HTML and Markdown summary output
//! - Per-view render sessions owning the "show unchanged" toggle
//!
//! # Example
//!
//! ```
//! use deltaview_core::{open_session, ViewerConfig};
//!
//! let mut session = open_session(
//!     r#"{"a": 1, "b": 2}"#,
//!     r#"{"a": 1, "b": 3, "c": 4}"#,
//!     &ViewerConfig::default(),
//! )
//! .unwrap();
//! assert!(session.render_text().contains("b: 2 → 3"));
//! session.toggle();
//! assert!(session.render_text().contains("(1 unchanged)"));
//! ```

pub use deltaview_core_types as core_types;

pub mod config;
pub mod delta;
pub mod errors;
pub mod logging_facility;
pub mod render;
pub mod snapshot;
pub mod viewer;

// Re-export commonly used types
pub use config::ViewerConfig;
pub use delta::{
    apply_delta, compute_delta, compute_delta_from_str, revert_delta, ArrayStrategy, Delta,
    DeltaOp, DiffOptions, JsonPath,
};
pub use errors::{DeltaViewError, ExError, ExErrorKind, Result};
pub use render::{build_tree, DeltaNode, NodeStatus, RenderSession, ToggleState};
pub use snapshot::{Side, Snapshot};
pub use viewer::{
    open_session, open_session_from_bytes, open_session_from_bytes_with_context,
    open_session_with_context,
};
