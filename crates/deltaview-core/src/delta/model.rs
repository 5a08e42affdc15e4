//! Delta output types.
//!
//! All types implement `Debug, Clone, Serialize, Deserialize, PartialEq`.
//! Ops are an ordered list: applying them one after another to the left
//! snapshot yields the right snapshot.

use crate::delta::path::JsonPath;
use crate::errors::{DeltaViewError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest as _, Sha256};

/// Current schema version of the serialized delta
pub const DELTA_SCHEMA_VERSION: u32 = 1;

/// A single path-scoped change.
///
/// Array indices in `remove` paths refer to the array as it stands when the
/// op is applied; the engine emits removals before additions so these are
/// the left-side indices.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DeltaOp {
    /// Value present only on the right
    Add {
        path: JsonPath,
        value: Value,
        /// Left index of the same element when this is the target of a move
        #[serde(default, skip_serializing_if = "Option::is_none")]
        moved_from: Option<usize>,
    },
    /// Value present only on the left
    Remove {
        path: JsonPath,
        old_value: Value,
        /// Right index of the same element when this is the source of a move
        #[serde(default, skip_serializing_if = "Option::is_none")]
        moved_to: Option<usize>,
    },
    /// Value present on both sides with different contents
    Replace {
        path: JsonPath,
        old_value: Value,
        new_value: Value,
    },
}

impl DeltaOp {
    pub fn path(&self) -> &JsonPath {
        match self {
            DeltaOp::Add { path, .. }
            | DeltaOp::Remove { path, .. }
            | DeltaOp::Replace { path, .. } => path,
        }
    }

    /// True for either half of a relocated array element
    pub fn is_move(&self) -> bool {
        matches!(
            self,
            DeltaOp::Add {
                moved_from: Some(_),
                ..
            } | DeltaOp::Remove {
                moved_to: Some(_),
                ..
            }
        )
    }

    /// The op that undoes this one
    pub fn inverse(&self) -> DeltaOp {
        match self {
            DeltaOp::Add {
                path,
                value,
                moved_from,
            } => DeltaOp::Remove {
                path: path.clone(),
                old_value: value.clone(),
                moved_to: *moved_from,
            },
            DeltaOp::Remove {
                path,
                old_value,
                moved_to,
            } => DeltaOp::Add {
                path: path.clone(),
                value: old_value.clone(),
                moved_from: *moved_to,
            },
            DeltaOp::Replace {
                path,
                old_value,
                new_value,
            } => DeltaOp::Replace {
                path: path.clone(),
                old_value: new_value.clone(),
                new_value: old_value.clone(),
            },
        }
    }
}

/// High-level classification of the delta
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum DeltaClassification {
    /// Snapshots are deep-equal
    Identical,
    /// At least one op
    Changed,
}

/// Op counts by category. A move counts once, not as an add plus a remove.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeltaStats {
    pub added: usize,
    pub removed: usize,
    pub modified: usize,
    pub moved: usize,
}

/// The structural delta between two snapshots
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Delta {
    /// Schema version of this structure (always 1)
    pub delta_schema_version: u32,
    pub classification: DeltaClassification,
    pub stats: DeltaStats,
    pub ops: Vec<DeltaOp>,
}

impl Delta {
    /// Build a delta from an ordered op list, deriving stats and classification
    pub fn from_ops(ops: Vec<DeltaOp>) -> Self {
        let mut stats = DeltaStats::default();
        for op in &ops {
            match op {
                DeltaOp::Add {
                    moved_from: None, ..
                } => stats.added += 1,
                DeltaOp::Add { .. } => {}
                DeltaOp::Remove { moved_to: None, .. } => stats.removed += 1,
                DeltaOp::Remove { .. } => stats.moved += 1,
                DeltaOp::Replace { .. } => stats.modified += 1,
            }
        }
        let classification = if ops.is_empty() {
            DeltaClassification::Identical
        } else {
            DeltaClassification::Changed
        };
        Self {
            delta_schema_version: DELTA_SCHEMA_VERSION,
            classification,
            stats,
            ops,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// The delta mapping the right snapshot back to the left one
    pub fn invert(&self) -> Delta {
        Delta::from_ops(self.ops.iter().rev().map(DeltaOp::inverse).collect())
    }

    /// Compact JSON form; identical deltas produce identical bytes.
    ///
    /// # Errors
    ///
    /// `Serialization` if encoding fails.
    pub fn to_canonical_json(&self) -> Result<String> {
        let json = serde_json::to_string(self).map_err(DeltaViewError::from)?;
        Ok(json)
    }

    /// SHA-256 hex digest of the canonical JSON, for audit references
    ///
    /// # Errors
    ///
    /// `Serialization` if encoding fails.
    pub fn digest(&self) -> Result<String> {
        let canonical = self.to_canonical_json()?;
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        Ok(hex::encode(hasher.finalize()))
    }
}
