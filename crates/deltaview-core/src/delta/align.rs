//! Array element correspondence.
//!
//! Produces, for two arrays, which elements survive unchanged (`kept`), which
//! survive with modified contents (`substituted`), which were relocated
//! (`moved`), and which exist on one side only. Survivors are strictly
//! increasing on both sides, which is what makes the emitted op order
//! (removals descending, additions ascending, then nested edits) replayable.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// How array elements are matched between the two sides
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayStrategy {
    /// Longest common subsequence over deep-equal elements, with move detection
    Lcs,
    /// Element `i` on the left corresponds to element `i` on the right
    Positional,
}

impl std::fmt::Display for ArrayStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArrayStrategy::Lcs => f.write_str("lcs"),
            ArrayStrategy::Positional => f.write_str("positional"),
        }
    }
}

/// Index pairs are `(left, right)`; single indices are ascending.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct Alignment {
    pub kept: Vec<(usize, usize)>,
    pub substituted: Vec<(usize, usize)>,
    pub moved: Vec<(usize, usize)>,
    pub removed: Vec<usize>,
    pub added: Vec<usize>,
}

pub(crate) fn align(
    left: &[Value],
    right: &[Value],
    strategy: ArrayStrategy,
    lcs_cell_limit: usize,
) -> Alignment {
    let prefix = left
        .iter()
        .zip(right)
        .take_while(|(a, b)| a == b)
        .count();
    let suffix = left[prefix..]
        .iter()
        .rev()
        .zip(right[prefix..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();
    let left_mid = &left[prefix..left.len() - suffix];
    let right_mid = &right[prefix..right.len() - suffix];

    let cells = (left_mid.len() + 1).saturating_mul(right_mid.len() + 1);
    let use_lcs = strategy == ArrayStrategy::Lcs && cells <= lcs_cell_limit;
    if !use_lcs {
        if strategy == ArrayStrategy::Lcs {
            tracing::debug!(
                cells,
                lcs_cell_limit,
                "array too large for lcs, aligning by position"
            );
        }
        return positional(left, right);
    }

    let mut kept: Vec<(usize, usize)> = (0..prefix).map(|i| (i, i)).collect();
    kept.extend(
        lcs_pairs(left_mid, right_mid)
            .into_iter()
            .map(|(i, j)| (i + prefix, j + prefix)),
    );
    let left_tail = left.len() - suffix;
    let right_tail = right.len() - suffix;
    kept.extend((0..suffix).map(|k| (left_tail + k, right_tail + k)));

    pair_unmatched(left, right, kept)
}

fn positional(left: &[Value], right: &[Value]) -> Alignment {
    let common = left.len().min(right.len());
    let mut alignment = Alignment::default();
    for i in 0..common {
        if left[i] == right[i] {
            alignment.kept.push((i, i));
        } else {
            alignment.substituted.push((i, i));
        }
    }
    alignment.removed = (common..left.len()).collect();
    alignment.added = (common..right.len()).collect();
    alignment
}

/// Classic dynamic-programming LCS; ties prefer advancing on the left.
fn lcs_pairs(left: &[Value], right: &[Value]) -> Vec<(usize, usize)> {
    let (n, m) = (left.len(), right.len());
    let width = m + 1;
    // table[i * width + j] = LCS length of left[i..] and right[j..]
    let mut table = vec![0u32; (n + 1) * width];
    for i in (0..n).rev() {
        for j in (0..m).rev() {
            table[i * width + j] = if left[i] == right[j] {
                table[(i + 1) * width + j + 1] + 1
            } else {
                table[(i + 1) * width + j].max(table[i * width + j + 1])
            };
        }
    }

    let mut pairs = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < n && j < m {
        if left[i] == right[j] {
            pairs.push((i, j));
            i += 1;
            j += 1;
        } else if table[(i + 1) * width + j] >= table[i * width + j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    pairs
}

/// Classify everything the LCS left unmatched.
///
/// Equal values on opposite sides become moves. What remains pairs up
/// positionally within the gap between two consecutive kept anchors.
fn pair_unmatched(left: &[Value], right: &[Value], kept: Vec<(usize, usize)>) -> Alignment {
    let mut left_free = vec![true; left.len()];
    let mut right_free = vec![true; right.len()];
    for &(i, j) in &kept {
        left_free[i] = false;
        right_free[j] = false;
    }

    let mut moved = Vec::new();
    for j in 0..right.len() {
        if !right_free[j] {
            continue;
        }
        let source = (0..left.len()).find(|&i| left_free[i] && left[i] == right[j]);
        if let Some(i) = source {
            left_free[i] = false;
            right_free[j] = false;
            moved.push((i, j));
        }
    }

    // gap id = number of anchors before the index on that side
    let mut left_gaps: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for i in (0..left.len()).filter(|&i| left_free[i]) {
        let gap = kept.partition_point(|&(ki, _)| ki < i);
        left_gaps.entry(gap).or_default().push(i);
    }
    let mut right_gaps: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
    for j in (0..right.len()).filter(|&j| right_free[j]) {
        let gap = kept.partition_point(|&(_, kj)| kj < j);
        right_gaps.entry(gap).or_default().push(j);
    }

    let mut substituted = Vec::new();
    let mut removed = Vec::new();
    let mut added = Vec::new();
    for (gap, lefts) in &left_gaps {
        let rights = right_gaps.remove(gap).unwrap_or_default();
        let paired = lefts.len().min(rights.len());
        substituted.extend(lefts.iter().copied().zip(rights.iter().copied()));
        removed.extend_from_slice(&lefts[paired..]);
        added.extend_from_slice(&rights[paired..]);
    }
    for rights in right_gaps.into_values() {
        added.extend(rights);
    }
    removed.sort_unstable();
    added.sort_unstable();

    Alignment {
        kept,
        substituted,
        moved,
        removed,
        added,
    }
}
