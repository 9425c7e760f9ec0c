//! Tests for KeyIndex
//!
//! These tests verify:
//! - Insert-if-absent semantics (first offset wins)
//! - Lookups and membership
//! - Snapshot copies of keys and offsets

use std::collections::HashSet;

use fdict::index::KeyIndex;

// =============================================================================
// Insert / Lookup Tests
// =============================================================================

#[test]
fn test_new_index_is_empty() {
    let index = KeyIndex::new();

    assert!(index.is_empty());
    assert_eq!(index.len(), 0);
    assert!(index.keys().is_empty());
    assert!(index.offsets().is_empty());
}

#[test]
fn test_insert_and_get() {
    let mut index = KeyIndex::new();

    assert!(index.insert("alpha", 0));
    assert!(index.insert("beta", 17));

    assert_eq!(index.get("alpha"), Some(0));
    assert_eq!(index.get("beta"), Some(17));
    assert!(index.contains("alpha"));
    assert_eq!(index.len(), 2);
}

#[test]
fn test_get_missing_key() {
    let mut index = KeyIndex::new();
    index.insert("present", 5);

    assert_eq!(index.get("absent"), None);
    assert!(!index.contains("absent"));
}

#[test]
fn test_duplicate_insert_keeps_first_offset() {
    let mut index = KeyIndex::new();

    assert!(index.insert("key", 10));
    assert!(!index.insert("key", 99));

    assert_eq!(index.get("key"), Some(10));
    assert_eq!(index.len(), 1);
}

#[test]
fn test_empty_string_is_a_valid_key() {
    let mut index = KeyIndex::new();

    assert!(index.insert("", 3));
    assert_eq!(index.get(""), Some(3));
}

// =============================================================================
// Snapshot Tests
// =============================================================================

#[test]
fn test_keys_snapshot() {
    let mut index = KeyIndex::new();
    index.insert("a", 0);
    index.insert("b", 8);

    let expected: HashSet<String> = ["a", "b"].iter().map(|s| s.to_string()).collect();
    assert_eq!(index.keys(), expected);
}

#[test]
fn test_offsets_are_ascending() {
    let mut index = KeyIndex::new();
    index.insert("z", 40);
    index.insert("m", 0);
    index.insert("a", 25);

    assert_eq!(index.offsets(), vec![0, 25, 40]);
}

#[test]
fn test_snapshots_are_detached_copies() {
    let mut index = KeyIndex::new();
    index.insert("a", 0);

    let keys = index.keys();
    let offsets = index.offsets();
    index.insert("b", 12);

    assert_eq!(keys.len(), 1);
    assert_eq!(offsets, vec![0]);
    assert_eq!(index.len(), 2);
}
