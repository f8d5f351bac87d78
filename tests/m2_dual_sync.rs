/// M2: Dual-index synchronization — both structures answer alike
///
/// Covers point agreement, range agreement, rebuild idempotence and the
/// rebuild-as-delete contract. Property tests use proptest.

use duodex::{DualIndexEngine, IndexKind, Key, Value};
use proptest::prelude::*;
use std::collections::BTreeMap;

fn engine_with(order: usize, entries: &[(Key, Value)]) -> DualIndexEngine {
    let mut engine = DualIndexEngine::with_order(order).unwrap();
    engine.load(entries.iter().cloned());
    engine
}

fn titles() -> impl Strategy<Value = Vec<(Key, Value)>> {
    prop::collection::vec((-200i64..200, "[a-z]{1,8}"), 0..150)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_point_lookups_agree(order in 2usize..10, entries in titles()) {
        let engine = engine_with(order, &entries);

        // Last write wins in both structures
        let model: BTreeMap<Key, Value> = entries.iter().cloned().collect();
        prop_assert_eq!(engine.len(), model.len());
        prop_assert_eq!(engine.ordered().len(), model.len());

        for (key, value) in &model {
            prop_assert_eq!(engine.ordered().search(key), Some(value));
            prop_assert_eq!(engine.hash().search(key), Some(value));
        }
        prop_assert!(engine.ordered().check_invariants().is_ok());
    }

    #[test]
    fn prop_ranges_agree_and_ascend(
        order in 2usize..10,
        entries in titles(),
        a in -250i64..250,
        width in 0i64..120,
    ) {
        let mut engine = engine_with(order, &entries);
        let outcome = engine.range_search(a, a + width);

        prop_assert_eq!(&outcome.ordered, &outcome.hash);
        prop_assert!(outcome.ordered.windows(2).all(|w| w[0].0 < w[1].0));
        prop_assert!(outcome.ordered.iter().all(|(k, _)| *k >= a && *k <= a + width));

        let model: BTreeMap<Key, Value> = entries.iter().cloned().collect();
        let expected: Vec<(Key, Value)> = model
            .range(a..=a + width)
            .map(|(k, v)| (*k, v.clone()))
            .collect();
        prop_assert_eq!(outcome.ordered, expected);
    }

    #[test]
    fn prop_capacity_bound(order in 2usize..12, keys in prop::collection::vec(any::<i64>(), 0..300)) {
        let mut engine = DualIndexEngine::with_order(order).unwrap();
        for key in keys {
            engine.insert(key, String::new());
            prop_assert!(engine.ordered().max_node_keys() <= order);
        }
    }
}

#[test]
fn test_rebuild_is_idempotent() {
    let snapshot: Vec<(Key, Value)> = (1..=60).map(|k| (k * 3, format!("title {k}"))).collect();
    let mut engine = DualIndexEngine::with_order(3).unwrap();

    engine.rebuild_from(snapshot.clone());
    let first_range = engine.range_search(0, 200);
    let first_points: Vec<_> = (0..200).map(|k| engine.search(k).value).collect();

    engine.rebuild_from(snapshot);
    let second_range = engine.range_search(0, 200);
    let second_points: Vec<_> = (0..200).map(|k| engine.search(k).value).collect();

    assert_eq!(first_range.ordered, second_range.ordered);
    assert_eq!(first_range.hash, second_range.hash);
    assert_eq!(first_points, second_points);
    assert_eq!(engine.ordered().entries(), engine.hash().entries());
}

#[test]
fn test_rebuild_as_delete() {
    let mut engine = DualIndexEngine::with_order(3).unwrap();
    engine.rebuild_from(vec![(10, "A".to_string()), (20, "B".to_string())]);
    // External delete of 10: reload from the remaining truth
    engine.rebuild_from(vec![(20, "B".to_string())]);

    let gone = engine.search(10);
    assert!(gone.value.is_none());
    assert!(engine.ordered().search(&10).is_none());
    assert!(engine.hash().search(&10).is_none());

    let kept = engine.search(20);
    assert_eq!(kept.value.as_deref(), Some("B"));
}

#[test]
fn test_update_keeps_indexes_in_step() {
    let mut engine = DualIndexEngine::with_order(3).unwrap();
    for k in 1..=30 {
        engine.insert(k, format!("v1-{k}"));
    }
    for k in (1..=30).step_by(3) {
        engine.insert(k, format!("v2-{k}"));
    }

    assert_eq!(engine.len(), 30);
    assert_eq!(engine.ordered().entries(), engine.hash().entries());
    assert_eq!(engine.ordered().search(&4).map(String::as_str), Some("v2-4"));
    assert_eq!(engine.ordered().search(&5).map(String::as_str), Some("v1-5"));
}

#[test]
fn test_selected_result_matches_preference() {
    let mut engine = DualIndexEngine::with_order(3).unwrap();
    engine.load((1..=10).map(|k| (k, format!("g{k}"))));

    let range = engine.range_search(2, 4);
    assert_eq!(range.served_by, IndexKind::Ordered);
    assert_eq!(range.chosen(), range.ordered.as_slice());

    // 1 range query: equality share stays at or below 0.9 for the next 9
    for _ in 0..9 {
        assert_eq!(engine.search(3).served_by, IndexKind::Ordered);
    }
    let point = engine.search(3);
    assert_eq!(point.served_by, IndexKind::Hash);
    assert_eq!(point.value.as_deref(), Some("g3"));
}
