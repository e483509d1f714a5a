//! Property tests against a `BTreeMap` model of the keyspace.

use std::collections::BTreeMap;

use proptest::prelude::*;

use crate::*;

type Model = BTreeMap<Vec<u8>, Vec<u8>>;

// Small alphabet so prefixes and offsets actually collide with stored keys.
fn key() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(0u8..4, 1..5)
}

fn value() -> impl Strategy<Value = Vec<u8>> {
    proptest::collection::vec(any::<u8>(), 0..8)
}

#[derive(Debug, Clone)]
enum Op {
    Set(Vec<u8>, Vec<u8>),
    Del(Vec<Vec<u8>>),
    MSet(Vec<(Vec<u8>, Vec<u8>)>),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (key(), value()).prop_map(|(k, v)| Op::Set(k, v)),
        proptest::collection::vec(key(), 0..4).prop_map(Op::Del),
        proptest::collection::vec((key(), value()), 0..6).prop_map(Op::MSet),
    ]
}

fn build(ops: &[Op]) -> (KvFacade, Model) {
    let kv = create_facade();
    let mut model = Model::new();
    for op in ops {
        match op {
            Op::Set(k, v) => {
                kv.set(k, v, Ttl::NoExpiry).unwrap();
                model.insert(k.clone(), v.clone());
            }
            Op::Del(keys) => {
                kv.del(keys).unwrap();
                for k in keys {
                    model.remove(k);
                }
            }
            Op::MSet(pairs) => {
                kv.mset(pairs.iter().map(|(k, v)| (k, v))).unwrap();
                for (k, v) in pairs {
                    model.insert(k.clone(), v.clone());
                }
            }
        }
    }
    (kv, model)
}

fn entries(kv: &KvFacade, options: &ScanOptions) -> Vec<(Vec<u8>, Vec<u8>)> {
    kv.scan_entries(options)
        .unwrap()
        .into_iter()
        .map(|e| (e.key, e.value))
        .collect()
}

fn model_entries<'a>(iter: impl Iterator<Item = (&'a Vec<u8>, &'a Vec<u8>)>) -> Vec<(Vec<u8>, Vec<u8>)> {
    iter.map(|(k, v)| (k.clone(), v.clone())).collect()
}

proptest! {
    #[test]
    fn get_matches_model(ops in proptest::collection::vec(op(), 0..30), lookup in key()) {
        let (kv, model) = build(&ops);

        match model.get(&lookup) {
            Some(v) => prop_assert_eq!(&kv.get(&lookup).unwrap(), v),
            None => prop_assert!(kv.get(&lookup).unwrap_err().is_not_found()),
        }
    }

    #[test]
    fn mget_matches_model(
        ops in proptest::collection::vec(op(), 0..30),
        lookups in proptest::collection::vec(key(), 0..8),
    ) {
        let (kv, model) = build(&ops);

        let expected: Vec<Vec<u8>> = lookups
            .iter()
            .map(|k| model.get(k).cloned().unwrap_or_default())
            .collect();
        prop_assert_eq!(kv.mget(&lookups), expected);
    }

    #[test]
    fn full_scan_is_sorted_model(ops in proptest::collection::vec(op(), 0..30)) {
        let (kv, model) = build(&ops);

        let scanned = entries(&kv, &ScanOptions::new());
        prop_assert!(scanned.windows(2).all(|w| w[0].0 < w[1].0));
        prop_assert_eq!(scanned, model_entries(model.iter()));
    }

    #[test]
    fn prefix_scan_visits_exactly_prefixed_keys(
        ops in proptest::collection::vec(op(), 0..30),
        prefix in proptest::collection::vec(0u8..4, 1..3),
    ) {
        let (kv, model) = build(&ops);

        let expected = model_entries(model.iter().filter(|(k, _)| k.starts_with(&prefix)));
        prop_assert_eq!(entries(&kv, &ScanOptions::new().prefix(&prefix)), expected);
    }

    #[test]
    fn offset_scan_starts_after_or_at_offset(
        ops in proptest::collection::vec(op(), 0..30),
        offset in key(),
        include in any::<bool>(),
    ) {
        let (kv, model) = build(&ops);

        let expected = model_entries(
            model
                .iter()
                .filter(|(k, _)| if include { **k >= offset } else { **k > offset }),
        );
        let options = ScanOptions::new().offset(&offset).include_offset(include);
        prop_assert_eq!(entries(&kv, &options), expected);
    }

    #[test]
    fn offset_and_prefix_compose(
        ops in proptest::collection::vec(op(), 0..30),
        offset in key(),
        prefix in proptest::collection::vec(0u8..4, 1..3),
    ) {
        let (kv, model) = build(&ops);

        let expected = model_entries(
            model
                .iter()
                .filter(|(k, _)| **k > offset && k.starts_with(&prefix)),
        );
        let options = ScanOptions::new().offset(&offset).prefix(&prefix);
        prop_assert_eq!(entries(&kv, &options), expected);
    }

    #[test]
    fn handler_stop_visits_exact_count(
        ops in proptest::collection::vec(op(), 0..30),
        stop_after in 1usize..10,
    ) {
        let (kv, model) = build(&ops);

        let mut calls = 0;
        let outcome = kv
            .scan(&ScanOptions::new(), |_, _| {
                calls += 1;
                calls < stop_after
            })
            .unwrap();

        prop_assert_eq!(calls, stop_after.min(model.len()));
        prop_assert_eq!(outcome.visited, calls);
        prop_assert_eq!(kv.metrics().active_transactions, 0);
    }
}
