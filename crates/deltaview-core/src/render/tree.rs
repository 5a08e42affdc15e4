//! Annotated render tree.
//!
//! The tree starts as a copy of the left snapshot with every node
//! `Unchanged`, then the delta is replayed over it:
//!
//! - `add` inserts an `Added` node at the position the op names
//! - `remove` turns the node into a `Removed` tombstone, left in place
//! - `replace` turns the node into a `Modified` node holding old and new
//!
//! Every container on the way to a change becomes `Modified`. Op paths are
//! resolved against live (non-removed) children only, which is exactly the
//! document `apply_delta` would be working on at that point.

use crate::delta::model::{Delta, DeltaOp};
use crate::delta::path::{parse_index, JsonPath};
use crate::errors::{DeltaViewError, ExError, Result};
use crate::{log_op_end, log_op_error, log_op_start};
use serde_json::{Map, Value};
use std::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeStatus {
    Unchanged,
    Added,
    Removed,
    Modified,
}

impl NodeStatus {
    /// CSS class suffix and log label
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeStatus::Unchanged => "unchanged",
            NodeStatus::Added => "added",
            NodeStatus::Removed => "removed",
            NodeStatus::Modified => "modified",
        }
    }
}

/// Where a node sits in its parent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKey {
    Root,
    Field {
        name: String,
    },
    /// Array element. `left` is absent for added items, `right` for removed ones.
    Item {
        left: Option<usize>,
        right: Option<usize>,
    },
}

impl NodeKey {
    fn item_for(status: NodeStatus, index: usize) -> Self {
        match status {
            NodeStatus::Added => NodeKey::Item {
                left: None,
                right: Some(index),
            },
            NodeStatus::Removed => NodeKey::Item {
                left: Some(index),
                right: None,
            },
            NodeStatus::Unchanged | NodeStatus::Modified => NodeKey::Item {
                left: Some(index),
                right: Some(index),
            },
        }
    }

    fn is_field(&self, token: &str) -> bool {
        matches!(self, NodeKey::Field { name } if name == token)
    }
}

/// Array element relocation; the index is on the other side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Added here, was at this left index
    From(usize),
    /// Removed here, now at this right index
    To(usize),
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeValue {
    Object(Vec<DeltaNode>),
    Array(Vec<DeltaNode>),
    Scalar(Value),
    Replaced { old: Value, new: Value },
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeltaNode {
    pub key: NodeKey,
    pub status: NodeStatus,
    pub moved: Option<Movement>,
    pub value: NodeValue,
}

impl DeltaNode {
    /// Build a subtree where every node carries `status`.
    pub fn from_value(key: NodeKey, value: &Value, status: NodeStatus) -> Self {
        let value = match value {
            Value::Object(map) => NodeValue::Object(
                map.iter()
                    .map(|(name, v)| {
                        Self::from_value(NodeKey::Field { name: name.clone() }, v, status)
                    })
                    .collect(),
            ),
            Value::Array(items) => NodeValue::Array(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| Self::from_value(NodeKey::item_for(status, i), v, status))
                    .collect(),
            ),
            other => NodeValue::Scalar(other.clone()),
        };
        Self {
            key,
            status,
            moved: None,
            value,
        }
    }

    /// Children in display order, tombstones included; `None` for leaves.
    pub fn children(&self) -> Option<&[DeltaNode]> {
        match &self.value {
            NodeValue::Object(children) | NodeValue::Array(children) => Some(children),
            NodeValue::Scalar(_) | NodeValue::Replaced { .. } => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<DeltaNode>> {
        match &mut self.value {
            NodeValue::Object(children) | NodeValue::Array(children) => Some(children),
            NodeValue::Scalar(_) | NodeValue::Replaced { .. } => None,
        }
    }

    pub fn is_live(&self) -> bool {
        self.status != NodeStatus::Removed
    }

    /// Total node count, tombstones included
    pub fn count_nodes(&self) -> usize {
        1 + self
            .children()
            .map(|c| c.iter().map(DeltaNode::count_nodes).sum())
            .unwrap_or(0)
    }

    /// The value this subtree holds on the right side.
    ///
    /// For a tombstone this is the removed value itself.
    pub fn current_value(&self) -> Value {
        match &self.value {
            NodeValue::Object(children) => {
                let mut map = Map::new();
                for child in children.iter().filter(|c| c.is_live()) {
                    if let NodeKey::Field { name } = &child.key {
                        map.insert(name.clone(), child.current_value());
                    }
                }
                Value::Object(map)
            }
            NodeValue::Array(children) => Value::Array(
                children
                    .iter()
                    .filter(|c| c.is_live())
                    .map(DeltaNode::current_value)
                    .collect(),
            ),
            NodeValue::Scalar(v) => v.clone(),
            NodeValue::Replaced { new, .. } => new.clone(),
        }
    }

    /// Look up a node by its right-side path.
    pub fn find(&self, path: &JsonPath) -> Option<&DeltaNode> {
        let mut current = self;
        for token in path.tokens() {
            let pos = live_position(&current.value, token)?;
            current = current.children()?.get(pos)?;
        }
        Some(current)
    }

    fn mark_modified(&mut self) {
        if self.status == NodeStatus::Unchanged {
            self.status = NodeStatus::Modified;
        }
    }
}

/// Replay `delta` over `left` and return the annotated tree.
///
/// # Errors
///
/// `Render` if an op does not fit the tree; no partial tree is returned.
pub fn build_tree(left: &Value, delta: &Delta) -> Result<DeltaNode> {
    let started = Instant::now();
    log_op_start!("build_tree", op_count = delta.len());

    let mut root = DeltaNode::from_value(NodeKey::Root, left, NodeStatus::Unchanged);
    for op in &delta.ops {
        if let Err(err) = replay(&mut root, op) {
            let err = ExError::from(err).with_op("build_tree");
            log_op_error!(
                "build_tree",
                err.clone(),
                duration_ms = started.elapsed().as_millis() as u64
            );
            return Err(err);
        }
    }
    assign_right_indices(&mut root);

    log_op_end!(
        "build_tree",
        duration_ms = started.elapsed().as_millis() as u64,
        node_count = root.count_nodes()
    );
    Ok(root)
}

fn replay(root: &mut DeltaNode, op: &DeltaOp) -> std::result::Result<(), DeltaViewError> {
    match op {
        DeltaOp::Add {
            path,
            value,
            moved_from,
        } => {
            let Some((parent_tokens, last)) = path.split_last() else {
                *root = DeltaNode::from_value(NodeKey::Root, value, NodeStatus::Added);
                return Ok(());
            };
            let parent = navigate_mut(root, parent_tokens, path)?;
            parent.mark_modified();
            match &mut parent.value {
                NodeValue::Object(children) => {
                    if children.iter().any(|c| c.is_live() && c.key.is_field(last)) {
                        return Err(replay_error(path, "key already exists"));
                    }
                    children.push(DeltaNode::from_value(
                        NodeKey::Field {
                            name: last.to_string(),
                        },
                        value,
                        NodeStatus::Added,
                    ));
                }
                NodeValue::Array(children) => {
                    let live: Vec<usize> = children
                        .iter()
                        .enumerate()
                        .filter(|(_, c)| c.is_live())
                        .map(|(i, _)| i)
                        .collect();
                    let index = if last == "-" {
                        live.len()
                    } else {
                        parse_index(last)
                            .filter(|&i| i <= live.len())
                            .ok_or_else(|| replay_error(path, "array index out of range"))?
                    };
                    let physical = live.get(index).copied().unwrap_or(children.len());
                    let mut node = DeltaNode::from_value(
                        NodeKey::Item {
                            left: None,
                            right: None,
                        },
                        value,
                        NodeStatus::Added,
                    );
                    node.moved = moved_from.map(Movement::From);
                    children.insert(physical, node);
                }
                NodeValue::Scalar(_) | NodeValue::Replaced { .. } => {
                    return Err(replay_error(path, "parent is not a container"))
                }
            }
        }
        DeltaOp::Remove {
            path,
            old_value,
            moved_to,
        } => {
            let Some((parent_tokens, last)) = path.split_last() else {
                return Err(replay_error(path, "the document root cannot be removed"));
            };
            let parent = navigate_mut(root, parent_tokens, path)?;
            parent.mark_modified();
            let pos = live_position(&parent.value, last)
                .ok_or_else(|| replay_error(path, "path not found"))?;
            let children = parent
                .children_mut()
                .ok_or_else(|| replay_error(path, "parent is not a container"))?;
            if children[pos].current_value() != *old_value {
                return Err(replay_error(path, "value does not match the delta"));
            }
            if children[pos].status == NodeStatus::Added {
                children.remove(pos);
            } else {
                let mut tombstone =
                    DeltaNode::from_value(children[pos].key.clone(), old_value, NodeStatus::Removed);
                tombstone.moved = moved_to.map(Movement::To);
                children[pos] = tombstone;
            }
        }
        DeltaOp::Replace {
            path,
            old_value,
            new_value,
        } => {
            let target = navigate_mut(root, path.tokens(), path)?;
            if target.current_value() != *old_value {
                return Err(replay_error(path, "value does not match the delta"));
            }
            if target.status == NodeStatus::Added {
                let moved = target.moved;
                *target = DeltaNode::from_value(target.key.clone(), new_value, NodeStatus::Added);
                target.moved = moved;
            } else {
                target.status = NodeStatus::Modified;
                target.value = NodeValue::Replaced {
                    old: old_value.clone(),
                    new: new_value.clone(),
                };
            }
        }
    }
    Ok(())
}

/// Walk live children along `tokens`, marking each container passed through.
fn navigate_mut<'a>(
    root: &'a mut DeltaNode,
    tokens: &[String],
    path: &JsonPath,
) -> std::result::Result<&'a mut DeltaNode, DeltaViewError> {
    let mut current = root;
    for token in tokens {
        current.mark_modified();
        let pos = live_position(&current.value, token)
            .ok_or_else(|| replay_error(path, "path not found"))?;
        current = current
            .children_mut()
            .and_then(|c| c.get_mut(pos))
            .ok_or_else(|| replay_error(path, "path not found"))?;
    }
    Ok(current)
}

/// Physical index of the live child `token` names.
fn live_position(value: &NodeValue, token: &str) -> Option<usize> {
    match value {
        NodeValue::Object(children) => children
            .iter()
            .position(|c| c.is_live() && c.key.is_field(token)),
        NodeValue::Array(children) => {
            let n = parse_index(token)?;
            children
                .iter()
                .enumerate()
                .filter(|(_, c)| c.is_live())
                .nth(n)
                .map(|(i, _)| i)
        }
        NodeValue::Scalar(_) | NodeValue::Replaced { .. } => None,
    }
}

fn assign_right_indices(node: &mut DeltaNode) {
    let is_array = matches!(node.value, NodeValue::Array(_));
    let Some(children) = node.children_mut() else {
        return;
    };
    let mut next = 0;
    for child in children.iter_mut() {
        let live = child.is_live();
        if is_array {
            if let NodeKey::Item { right, .. } = &mut child.key {
                if live {
                    *right = Some(next);
                    next += 1;
                } else {
                    *right = None;
                }
            }
        }
        if live {
            assign_right_indices(child);
        }
    }
}

fn replay_error(path: &JsonPath, reason: &str) -> DeltaViewError {
    DeltaViewError::TreeReplay {
        path: path.to_pointer(),
        reason: reason.to_string(),
    }
}
