//! mset / mget / del tests.

use crate::*;

#[test]
fn mset_then_get_each() {
    let kv = create_facade();

    kv.mset([("a", "1"), ("b", "2"), ("c", "3")]).unwrap();

    assert_eq!(kv.get("a").unwrap(), b"1");
    assert_eq!(kv.get("b").unwrap(), b"2");
    assert_eq!(kv.get("c").unwrap(), b"3");
}

#[test]
fn mset_empty_batch_is_ok() {
    let kv = create_facade();

    kv.mset(Vec::<(&str, &str)>::new()).unwrap();
    assert_eq!(kv.metrics().live_keys, 0);
}

#[test]
fn mset_duplicate_key_keeps_last_value() {
    let kv = create_facade();

    kv.mset([("k", "first"), ("k", "second")]).unwrap();
    assert_eq!(kv.get("k").unwrap(), b"second");
}

#[test]
fn mset_is_all_or_nothing() {
    let kv = create_facade();

    let err = kv.mset([("a", "1"), ("", "bad"), ("c", "3")]).unwrap_err();
    assert!(err.is_storage());

    assert!(kv.get("a").unwrap_err().is_not_found());
    assert!(kv.get("c").unwrap_err().is_not_found());
    assert_eq!(kv.metrics().aborted, 1);
}

#[test]
fn mset_owned_binary_pairs() {
    let kv = create_facade();
    let pairs: Vec<(Vec<u8>, Vec<u8>)> = (0u8..4).map(|i| (vec![b'k', i], vec![i; 3])).collect();

    kv.mset(pairs).unwrap();
    assert_eq!(kv.get([b'k', 2]).unwrap(), vec![2, 2, 2]);
}

#[test]
fn mget_preserves_order_and_length() {
    let kv = create_facade();
    seed(&kv, &[("a", "1"), ("c", "3")]);

    let values = kv.mget(&["c", "a", "c"]);
    assert_eq!(values, vec![b"3".to_vec(), b"1".to_vec(), b"3".to_vec()]);
}

#[test]
fn mget_missing_keys_yield_empty_placeholders() {
    let kv = create_facade();
    seed(&kv, &[("a", "1"), ("c", "3")]);

    let values = kv.mget(&["a", "b", "c"]);
    assert_eq!(values, vec![b"1".to_vec(), Vec::new(), b"3".to_vec()]);
}

#[test]
fn mget_empty_input() {
    let kv = create_facade();

    let values = kv.mget::<&str>(&[]);
    assert!(values.is_empty());
}

#[test]
fn mget_does_not_distinguish_missing_from_empty() {
    let kv = create_facade();
    kv.set("empty", "", Ttl::NoExpiry).unwrap();

    assert_eq!(kv.mget(&["empty", "missing"]), vec![Vec::new(), Vec::new()]);
}

#[test]
fn del_multiple_keys() {
    let kv = create_facade();
    seed(&kv, &[("a", "1"), ("b", "2"), ("c", "3")]);

    kv.del(&["a", "c"]).unwrap();

    assert!(kv.get("a").unwrap_err().is_not_found());
    assert_eq!(kv.get("b").unwrap(), b"2");
    assert!(kv.get("c").unwrap_err().is_not_found());
}

#[test]
fn del_missing_key_is_ok() {
    let kv = create_facade();
    seed(&kv, &[("a", "1")]);

    kv.del(&["nope"]).unwrap();
    assert_eq!(kv.get("a").unwrap(), b"1");
}

#[test]
fn del_empty_key_fails_whole_batch() {
    let kv = create_facade();
    seed(&kv, &[("a", "1")]);

    assert!(kv.del(&["a", ""]).unwrap_err().is_storage());
    assert_eq!(kv.get("a").unwrap(), b"1");
}

#[test]
fn del_empty_input_is_ok() {
    let kv = create_facade();

    kv.del::<&str>(&[]).unwrap();
}
