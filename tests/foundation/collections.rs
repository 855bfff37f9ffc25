//! Integration tests for persistent collections

use enumforge_foundation::{LtMap, LtVec};

#[test]
fn map_keeps_insertion_order() {
    let map: LtMap<i64> = [("z", 1), ("a", 2), ("m", 3)].into_iter().collect();
    let keys: Vec<&str> = map.keys().map(|k| &**k).collect();
    assert_eq!(keys, vec!["z", "a", "m"]);
}

#[test]
fn map_reinsert_keeps_position() {
    let map: LtMap<i64> = [("a", 1), ("b", 2)].into_iter().collect();
    let updated = map.insert("a", 10);
    assert_eq!(updated.position("a"), Some(0));
    assert_eq!(updated.get("a"), Some(&10));
    assert_eq!(updated.len(), 2);
}

#[test]
fn map_insert_is_persistent() {
    let map: LtMap<i64> = LtMap::new();
    let one = map.insert("a", 1);
    assert!(map.is_empty());
    assert!(one.contains_key("a"));
}

#[test]
fn map_equality_ignores_order() {
    let a: LtMap<i64> = [("x", 1), ("y", 2)].into_iter().collect();
    let b: LtMap<i64> = [("y", 2), ("x", 1)].into_iter().collect();
    assert_eq!(a, b);
}

#[test]
fn vec_push_back_is_persistent() {
    let v: LtVec<i64> = LtVec::new();
    let one = v.push_back(1);
    let two = one.push_back(2);
    assert!(v.is_empty());
    assert_eq!(one.len(), 1);
    assert_eq!(two.get(1), Some(&2));
    assert_eq!(two.iter().copied().collect::<Vec<_>>(), vec![1, 2]);
}
