//! Structural delta between two JSON snapshots.
//!
//! ## Entry point
//!
//! ```
//! use deltaview_core::delta::{apply_delta, compute_delta, DiffOptions};
//! use serde_json::json;
//!
//! let left = json!({"a": 1, "b": 2});
//! let right = json!({"a": 1, "b": 3, "c": 4});
//! let delta = compute_delta(&left, &right, &DiffOptions::default()).unwrap();
//! assert_eq!(delta.len(), 2);
//! assert_eq!(apply_delta(&left, &delta).unwrap(), right);
//! ```
//!
//! ## Guarantees
//!
//! - **Round-trip**: applying the ops to the left snapshot reproduces the right one.
//! - **Determinism**: identical inputs produce byte-identical serialized deltas.
//! - **No-diff**: deep-equal snapshots produce an empty delta.

pub mod align;
pub mod engine;
pub mod model;
pub mod patch;
pub mod path;
pub mod summary;

pub use align::ArrayStrategy;
pub use engine::{compute_delta, compute_delta_from_str, DiffOptions};
pub use model::{Delta, DeltaClassification, DeltaOp, DeltaStats};
pub use patch::{apply_delta, revert_delta};
pub use path::JsonPath;
pub use summary::render_summary;
