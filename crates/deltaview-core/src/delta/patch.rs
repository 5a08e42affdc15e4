//! Sequential application of delta ops.
//!
//! `remove` and `replace` check the current value against the one recorded
//! in the op, so a delta applied to the wrong document fails instead of
//! silently producing a different result.

use crate::delta::model::{Delta, DeltaOp};
use crate::delta::path::{parse_index, JsonPath};
use crate::errors::{DeltaViewError, ExError, Result};
use serde_json::Value;

/// Apply `delta` to `left`, returning the reconstructed right snapshot.
///
/// # Errors
///
/// `PatchConflict` naming the first op path that does not fit the document.
pub fn apply_delta(left: &Value, delta: &Delta) -> Result<Value> {
    let mut doc = left.clone();
    for op in &delta.ops {
        apply_op(&mut doc, op).map_err(|e| ExError::from(e).with_op("apply_delta"))?;
    }
    Ok(doc)
}

/// Undo `delta` on `right`, returning the left snapshot.
///
/// # Errors
///
/// `PatchConflict` if `right` is not the document the delta produced.
pub fn revert_delta(right: &Value, delta: &Delta) -> Result<Value> {
    let inverse = delta.invert();
    let mut doc = right.clone();
    for op in &inverse.ops {
        apply_op(&mut doc, op).map_err(|e| ExError::from(e).with_op("revert_delta"))?;
    }
    Ok(doc)
}

fn apply_op(doc: &mut Value, op: &DeltaOp) -> std::result::Result<(), DeltaViewError> {
    match op {
        DeltaOp::Add { path, value, .. } => {
            let Some((parent_tokens, last)) = path.split_last() else {
                *doc = value.clone();
                return Ok(());
            };
            match resolve_mut(doc, parent_tokens, path)? {
                Value::Object(map) => {
                    if map.contains_key(last) {
                        return Err(DeltaViewError::PathAlreadyExists {
                            path: path.to_pointer(),
                        });
                    }
                    map.insert(last.to_string(), value.clone());
                }
                Value::Array(items) => {
                    let index = if last == "-" {
                        items.len()
                    } else {
                        parse_index(last)
                            .filter(|&i| i <= items.len())
                            .ok_or_else(|| invalid_index(path, last))?
                    };
                    items.insert(index, value.clone());
                }
                _ => {
                    return Err(DeltaViewError::NotAContainer {
                        path: path.to_pointer(),
                    })
                }
            }
        }
        DeltaOp::Remove {
            path, old_value, ..
        } => {
            let Some((parent_tokens, last)) = path.split_last() else {
                return Err(DeltaViewError::InvalidPointer {
                    pointer: path.to_pointer(),
                    reason: "the document root cannot be removed".to_string(),
                });
            };
            match resolve_mut(doc, parent_tokens, path)? {
                Value::Object(map) => {
                    let current = map.get(last).ok_or_else(|| DeltaViewError::PathNotFound {
                        path: path.to_pointer(),
                    })?;
                    ensure_matches(current, old_value, path)?;
                    map.shift_remove(last);
                }
                Value::Array(items) => {
                    let index = parse_index(last)
                        .filter(|&i| i < items.len())
                        .ok_or_else(|| invalid_index(path, last))?;
                    ensure_matches(&items[index], old_value, path)?;
                    items.remove(index);
                }
                _ => {
                    return Err(DeltaViewError::NotAContainer {
                        path: path.to_pointer(),
                    })
                }
            }
        }
        DeltaOp::Replace {
            path,
            old_value,
            new_value,
        } => {
            let target = resolve_mut(doc, path.tokens(), path)?;
            ensure_matches(target, old_value, path)?;
            *target = new_value.clone();
        }
    }
    Ok(())
}

fn resolve_mut<'a>(
    doc: &'a mut Value,
    tokens: &[String],
    path: &JsonPath,
) -> std::result::Result<&'a mut Value, DeltaViewError> {
    let mut current = doc;
    for token in tokens {
        current = match current {
            Value::Object(map) => map
                .get_mut(token)
                .ok_or_else(|| DeltaViewError::PathNotFound {
                    path: path.to_pointer(),
                })?,
            Value::Array(items) => {
                let len = items.len();
                parse_index(token)
                    .filter(|&i| i < len)
                    .and_then(|i| items.get_mut(i))
                    .ok_or_else(|| invalid_index(path, token))?
            }
            _ => {
                return Err(DeltaViewError::NotAContainer {
                    path: path.to_pointer(),
                })
            }
        };
    }
    Ok(current)
}

fn ensure_matches(
    current: &Value,
    expected: &Value,
    path: &JsonPath,
) -> std::result::Result<(), DeltaViewError> {
    if current == expected {
        Ok(())
    } else {
        Err(DeltaViewError::ValueMismatch {
            path: path.to_pointer(),
        })
    }
}

fn invalid_index(path: &JsonPath, token: &str) -> DeltaViewError {
    DeltaViewError::InvalidIndex {
        path: path.to_pointer(),
        token: token.to_string(),
    }
}
