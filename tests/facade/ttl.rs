//! Expiry tests driven by a manual clock.

use std::time::Duration;

use crate::*;

#[test]
fn key_visible_before_ttl() {
    let (kv, clock) = create_facade_with_clock();

    kv.set("session", "token", Ttl::from_millis(1_000)).unwrap();
    clock.advance(Duration::from_millis(999));

    assert_eq!(kv.get("session").unwrap(), b"token");
}

#[test]
fn key_gone_after_ttl() {
    let (kv, clock) = create_facade_with_clock();

    kv.set("session", "token", Ttl::from_millis(1_000)).unwrap();
    clock.advance(Duration::from_millis(1_000));

    assert!(kv.get("session").unwrap_err().is_not_found());
}

#[test]
fn sub_millisecond_ttl_is_visible_until_next_millisecond() {
    let (kv, clock) = create_facade_with_clock();

    kv.set("blink", "v", Ttl::from(Duration::from_micros(500))).unwrap();
    assert_eq!(kv.get("blink").unwrap(), b"v");

    clock.advance(Duration::from_millis(1));
    assert!(kv.get("blink").unwrap_err().is_not_found());
}

#[test]
fn non_positive_ttl_never_expires() {
    let (kv, clock) = create_facade_with_clock();

    kv.set("zero", "v", Ttl::from_millis(0)).unwrap();
    kv.set("negative", "v", Ttl::from_millis(-5)).unwrap();
    clock.advance(Duration::from_secs(365 * 24 * 3600));

    assert_eq!(kv.get("zero").unwrap(), b"v");
    assert_eq!(kv.get("negative").unwrap(), b"v");
}

#[test]
fn overwrite_without_ttl_clears_expiry() {
    let (kv, clock) = create_facade_with_clock();

    kv.set("k", "old", Ttl::from_millis(10)).unwrap();
    kv.set("k", "new", Ttl::NoExpiry).unwrap();
    clock.advance(Duration::from_secs(1));

    assert_eq!(kv.get("k").unwrap(), b"new");
}

#[test]
fn mset_clears_previous_expiry() {
    let (kv, clock) = create_facade_with_clock();

    kv.set("k", "old", Ttl::from_millis(10)).unwrap();
    kv.mset([("k", "new")]).unwrap();
    clock.advance(Duration::from_secs(1));

    assert_eq!(kv.get("k").unwrap(), b"new");
}

#[test]
fn expired_keys_are_empty_in_mget() {
    let (kv, clock) = create_facade_with_clock();

    kv.set("short", "1", Ttl::from_millis(5)).unwrap();
    kv.set("long", "2", Ttl::NoExpiry).unwrap();
    clock.advance(Duration::from_millis(5));

    assert_eq!(kv.mget(&["short", "long"]), vec![Vec::new(), b"2".to_vec()]);
}

#[test]
fn expired_keys_are_skipped_by_scan() {
    let (kv, clock) = create_facade_with_clock();

    seed(&kv, &[("a", "1"), ("c", "3")]);
    kv.set("b", "2", Ttl::from(Duration::from_millis(50))).unwrap();
    assert_eq!(scan_keys(&kv, &ScanOptions::new()), vec!["a", "b", "c"]);

    clock.advance(Duration::from_millis(50));
    assert_eq!(scan_keys(&kv, &ScanOptions::new()), vec!["a", "c"]);
}

#[test]
fn expired_offset_key_is_not_visited() {
    let (kv, clock) = create_facade_with_clock();

    seed(&kv, &[("a", "1"), ("c", "3")]);
    kv.set("b", "2", Ttl::from_millis(1)).unwrap();
    clock.advance(Duration::from_millis(1));

    let keys = scan_keys(&kv, &ScanOptions::new().offset("b").include_offset(true));
    assert_eq!(keys, vec!["c"]);
}

#[test]
fn purge_reclaims_expired_and_deleted() {
    let (kv, clock) = create_facade_with_clock();

    seed(&kv, &[("keep", "1"), ("gone", "2")]);
    kv.set("temp", "3", Ttl::from_millis(10)).unwrap();
    kv.del(&["gone"]).unwrap();
    clock.advance(Duration::from_millis(10));

    assert_eq!(kv.purge_expired(), 2);
    assert_eq!(kv.purge_expired(), 0);
    assert_eq!(kv.get("keep").unwrap(), b"1");
    assert_eq!(kv.metrics().live_keys, 1);
}
