//! Delta computation engine.
//!
//! The core entry point is [`compute_delta`], which walks two JSON values in
//! parallel and emits an ordered list of [`DeltaOp`]s.

use crate::delta::align::{align, ArrayStrategy};
use crate::delta::model::{Delta, DeltaOp};
use crate::delta::path::JsonPath;
use crate::errors::{DeltaViewError, ExError, ExErrorKind, Result};
use crate::snapshot::{Side, Snapshot};
use crate::{log_op_end, log_op_error, log_op_start};
use serde_json::{Map, Value};
use std::time::Instant;

/// Default ceiling on LCS table cells before falling back to positional alignment
pub const DEFAULT_LCS_CELL_LIMIT: usize = 4_000_000;

/// Options controlling delta computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffOptions {
    pub array_strategy: ArrayStrategy,
    /// Arrays whose trimmed LCS table would exceed this many cells are
    /// aligned by position instead
    pub lcs_cell_limit: usize,
}

impl Default for DiffOptions {
    fn default() -> Self {
        Self {
            array_strategy: ArrayStrategy::Lcs,
            lcs_cell_limit: DEFAULT_LCS_CELL_LIMIT,
        }
    }
}

/// Compute the delta between two JSON values.
///
/// Ops come out in a fixed order: removed object keys in left order, then
/// added or modified keys in right order; per array, removals by descending
/// index, additions by ascending index, then nested edits.
///
/// # Errors
///
/// - `DeterminismViolation` - the delta fails its serialization round-trip
///   check (should never occur in correct builds)
pub fn compute_delta(left: &Value, right: &Value, options: &DiffOptions) -> Result<Delta> {
    let started = Instant::now();
    log_op_start!("compute_delta", strategy = %options.array_strategy);

    let mut ops = Vec::new();
    diff_values(left, right, &JsonPath::root(), options, &mut ops);
    let delta = Delta::from_ops(ops);

    if let Err(err) = check_determinism(&delta) {
        log_op_error!(
            "compute_delta",
            err.clone(),
            duration_ms = started.elapsed().as_millis() as u64
        );
        return Err(err);
    }

    log_op_end!(
        "compute_delta",
        duration_ms = started.elapsed().as_millis() as u64,
        op_count = delta.len()
    );
    Ok(delta)
}

/// Parse both snapshot texts and compute their delta.
///
/// # Errors
///
/// - `Parse` - either text is not valid JSON; the side is recorded on the error
/// - `DeterminismViolation` - see [`compute_delta`]
pub fn compute_delta_from_str(
    left_text: &str,
    right_text: &str,
    options: &DiffOptions,
) -> Result<Delta> {
    let left = Snapshot::parse(Side::Left, left_text)
        .map_err(|e| e.with_op("compute_delta_from_str"))?;
    let right = Snapshot::parse(Side::Right, right_text)
        .map_err(|e| e.with_op("compute_delta_from_str"))?;
    compute_delta(left.value(), right.value(), options)
}

fn diff_values(
    left: &Value,
    right: &Value,
    path: &JsonPath,
    options: &DiffOptions,
    ops: &mut Vec<DeltaOp>,
) {
    if left == right {
        return;
    }
    match (left, right) {
        (Value::Object(a), Value::Object(b)) => diff_objects(a, b, path, options, ops),
        (Value::Array(a), Value::Array(b)) => diff_arrays(a, b, path, options, ops),
        _ => ops.push(DeltaOp::Replace {
            path: path.clone(),
            old_value: left.clone(),
            new_value: right.clone(),
        }),
    }
}

fn diff_objects(
    left: &Map<String, Value>,
    right: &Map<String, Value>,
    path: &JsonPath,
    options: &DiffOptions,
    ops: &mut Vec<DeltaOp>,
) {
    for (key, old_value) in left {
        if !right.contains_key(key) {
            ops.push(DeltaOp::Remove {
                path: path.child_key(key),
                old_value: old_value.clone(),
                moved_to: None,
            });
        }
    }

    for (key, new_value) in right {
        match left.get(key) {
            Some(old_value) => diff_values(old_value, new_value, &path.child_key(key), options, ops),
            None => ops.push(DeltaOp::Add {
                path: path.child_key(key),
                value: new_value.clone(),
                moved_from: None,
            }),
        }
    }
}

fn diff_arrays(
    left: &[Value],
    right: &[Value],
    path: &JsonPath,
    options: &DiffOptions,
    ops: &mut Vec<DeltaOp>,
) {
    let alignment = align(
        left,
        right,
        options.array_strategy,
        options.lcs_cell_limit,
    );

    // Removals, highest left index first so earlier indices stay valid.
    let mut removals: Vec<(usize, Option<usize>)> = alignment
        .removed
        .iter()
        .map(|&i| (i, None))
        .chain(alignment.moved.iter().map(|&(i, j)| (i, Some(j))))
        .collect();
    removals.sort_unstable_by(|a, b| b.0.cmp(&a.0));
    for (i, moved_to) in removals {
        ops.push(DeltaOp::Remove {
            path: path.child_index(i),
            old_value: left[i].clone(),
            moved_to,
        });
    }

    // Additions at their final index, lowest first.
    let mut additions: Vec<(usize, Option<usize>)> = alignment
        .added
        .iter()
        .map(|&j| (j, None))
        .chain(alignment.moved.iter().map(|&(i, j)| (j, Some(i))))
        .collect();
    additions.sort_unstable_by_key(|&(j, _)| j);
    for (j, moved_from) in additions {
        ops.push(DeltaOp::Add {
            path: path.child_index(j),
            value: right[j].clone(),
            moved_from,
        });
    }

    // Survivors now sit at their right-side index.
    for &(i, j) in &alignment.substituted {
        diff_values(&left[i], &right[j], &path.child_index(j), options, ops);
    }
}

fn check_determinism(delta: &Delta) -> Result<()> {
    let serialized = serde_json::to_string(delta).map_err(|e| {
        ExError::new(ExErrorKind::DeterminismViolation)
            .with_op("compute_delta")
            .with_message("failed to serialize delta")
            .with_source(DeltaViewError::from(e).into())
    })?;
    let reparsed: Delta = serde_json::from_str(&serialized).map_err(|e| {
        ExError::new(ExErrorKind::DeterminismViolation)
            .with_op("compute_delta")
            .with_message("failed to re-parse delta")
            .with_source(DeltaViewError::from(e).into())
    })?;
    if &reparsed != delta {
        return Err(ExError::new(ExErrorKind::DeterminismViolation)
            .with_op("compute_delta")
            .with_message("delta is not deterministic: round-trip produced different struct"));
    }
    Ok(())
}
