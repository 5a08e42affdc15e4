use deltaview_core::{compute_delta, Delta, DiffOptions};
use proptest::prelude::*;
use serde_json::{Map, Value};

/// Compute a delta with default options
#[allow(dead_code)]
pub fn diff(left: &Value, right: &Value) -> Delta {
    compute_delta(left, right, &DiffOptions::default()).unwrap()
}

/// Short op label for assertions: `"replace /b"`, `"add /c"`, ...
#[allow(dead_code)]
pub fn op_labels(delta: &Delta) -> Vec<String> {
    delta
        .ops
        .iter()
        .map(|op| {
            let kind = match op {
                deltaview_core::DeltaOp::Add { .. } => "add",
                deltaview_core::DeltaOp::Remove { .. } => "remove",
                deltaview_core::DeltaOp::Replace { .. } => "replace",
            };
            format!("{} {}", kind, op.path())
        })
        .collect()
}

/// Arbitrary JSON documents, kept small so array alignment stays interesting
/// (few distinct scalars means plenty of equal elements and moves).
///
/// Some leaves are wide-range numbers and Unicode text so the number and
/// string encodings are exercised too.
#[allow(dead_code)]
pub fn arb_json() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        3 => Just(Value::Null),
        3 => any::<bool>().prop_map(Value::Bool),
        6 => (-3i64..4).prop_map(Value::from),
        6 => prop::sample::select(vec!["a", "b", "~", "/", "<i>", "ü", "日本"]).prop_map(Value::from),
        2 => any::<f64>()
            .prop_filter("JSON numbers are finite", |f| f.is_finite())
            .prop_map(Value::from),
        1 => ((i64::MAX as u64 + 1)..=u64::MAX).prop_map(Value::from),
        1 => "\\PC{0,6}".prop_map(Value::from),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..6).prop_map(Value::Array),
            prop::collection::vec(
                (prop::sample::select(vec!["a", "b", "c", "x/y", "m~n", "", "名前", "Größe"]), inner),
                0..5
            )
            .prop_map(|entries| {
                let mut map = Map::new();
                for (k, v) in entries {
                    map.insert(k.to_string(), v);
                }
                Value::Object(map)
            }),
        ]
    })
}

/// A document and a mutated relative of it, so deltas are mostly small edits.
#[allow(dead_code)]
pub fn arb_pair() -> impl Strategy<Value = (Value, Value)> {
    prop_oneof![
        (arb_json(), arb_json()),
        arb_json().prop_map(|v| (v.clone(), v)),
        (prop::collection::vec(arb_json(), 0..8), any::<prop::sample::Index>(), arb_json())
            .prop_map(|(items, idx, replacement)| {
                let left = Value::Array(items.clone());
                let mut edited = items;
                if !edited.is_empty() {
                    let i = idx.index(edited.len());
                    let moved = edited.remove(i);
                    edited.insert(0, moved);
                    edited.push(replacement);
                }
                (left, Value::Array(edited))
            }),
    ]
}
