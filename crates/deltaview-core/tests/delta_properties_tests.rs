//! Property tests over arbitrary JSON documents.

mod common;

use common::{arb_json, arb_pair};
use deltaview_core::render::text::layout;
use deltaview_core::{
    apply_delta, build_tree, compute_delta, revert_delta, ArrayStrategy, DiffOptions,
    RenderSession, ToggleState,
};
use deltaview_core::core_types::RequestContext;
use proptest::prelude::*;

fn options(strategy: ArrayStrategy) -> DiffOptions {
    DiffOptions {
        array_strategy: strategy,
        ..DiffOptions::default()
    }
}

fn any_strategy() -> impl Strategy<Value = ArrayStrategy> {
    prop_oneof![Just(ArrayStrategy::Lcs), Just(ArrayStrategy::Positional)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_apply_round_trips((left, right) in arb_pair(), strategy in any_strategy()) {
        let delta = compute_delta(&left, &right, &options(strategy)).unwrap();
        prop_assert_eq!(apply_delta(&left, &delta).unwrap(), right);
    }

    #[test]
    fn prop_revert_round_trips((left, right) in arb_pair()) {
        let delta = compute_delta(&left, &right, &DiffOptions::default()).unwrap();
        prop_assert_eq!(revert_delta(&right, &delta).unwrap(), left);
    }

    #[test]
    fn prop_tiny_cell_limit_round_trips((left, right) in arb_pair()) {
        let opts = DiffOptions { lcs_cell_limit: 2, ..DiffOptions::default() };
        let delta = compute_delta(&left, &right, &opts).unwrap();
        prop_assert_eq!(apply_delta(&left, &delta).unwrap(), right);
    }

    #[test]
    fn prop_deterministic((left, right) in arb_pair()) {
        let a = compute_delta(&left, &right, &DiffOptions::default()).unwrap();
        let b = compute_delta(&left, &right, &DiffOptions::default()).unwrap();
        prop_assert_eq!(a.to_canonical_json().unwrap(), b.to_canonical_json().unwrap());
    }

    #[test]
    fn prop_self_diff_is_empty(doc in arb_json()) {
        let delta = compute_delta(&doc, &doc, &DiffOptions::default()).unwrap();
        prop_assert!(delta.is_empty());
    }

    #[test]
    fn prop_tree_reflects_right((left, right) in arb_pair()) {
        let delta = compute_delta(&left, &right, &DiffOptions::default()).unwrap();
        let tree = build_tree(&left, &delta).unwrap();
        prop_assert_eq!(tree.current_value(), right);
    }

    #[test]
    fn prop_hidden_view_shows_every_change((left, right) in arb_pair()) {
        let delta = compute_delta(&left, &right, &DiffOptions::default()).unwrap();
        let tree = build_tree(&left, &delta).unwrap();
        let full = layout(&tree, true, 80);
        let folded = layout(&tree, false, 80);
        prop_assert_eq!(full.hidden_count(), 0);
        prop_assert!(folded.visible_count() <= full.visible_count());
        if delta.is_empty() {
            prop_assert_eq!(folded.visible_count(), 1);
        }
    }

    #[test]
    fn prop_toggle_twice_is_identity((left, right) in arb_pair(), start_on in any::<bool>()) {
        let delta = compute_delta(&left, &right, &DiffOptions::default()).unwrap();
        let tree = build_tree(&left, &delta).unwrap();
        let mut session = RenderSession::new(
            RequestContext::new(),
            delta,
            tree,
            ToggleState::from_bool(start_on),
            80,
        );
        let before = session.view().clone();
        session.toggle();
        session.toggle();
        prop_assert_eq!(session.view(), &before);
        prop_assert_eq!(session.redraws(), 3);
    }
}
