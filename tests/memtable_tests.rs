//! Tests for the in-memory table
//!
//! These tests verify:
//! - Entry lookup semantics (values and tombstones)
//! - Size accounting stays exact under overwrites and deletes, so the
//!   flush threshold fires when the table actually holds that many bytes
//! - Clearing resets both entries and the size counter

use hopperkv::memtable::{MemTable, TableEntry};

// =============================================================================
// Lookup Tests
// =============================================================================

#[test]
fn test_put_then_get() {
    let table = MemTable::new();
    table.put(b"key".to_vec(), b"value".to_vec());

    assert_eq!(table.get(b"key"), Some(TableEntry::Value(b"value".to_vec())));
    assert_eq!(table.get(b"missing"), None);
}

#[test]
fn test_delete_leaves_tombstone() {
    let table = MemTable::new();
    table.put(b"key".to_vec(), b"value".to_vec());
    table.delete(b"key".to_vec());

    assert_eq!(table.get(b"key"), Some(TableEntry::Tombstone));
    assert_eq!(table.entry_count(), 1);
}

// =============================================================================
// Size Accounting Tests
// =============================================================================

#[test]
fn test_size_counts_keys_and_values() {
    let table = MemTable::new();

    assert_eq!(table.put(b"ab".to_vec(), b"1234".to_vec()), 6);
    assert_eq!(table.put(b"cd".to_vec(), b"5".to_vec()), 9);
    assert_eq!(table.size(), 9);
}

#[test]
fn test_size_stable_under_repeated_overwrites() {
    let table = MemTable::new();

    for _ in 0..100 {
        table.put(b"hot-key".to_vec(), b"payload".to_vec());
    }

    // One key, one value: overwriting must not accumulate key bytes
    assert_eq!(table.size(), b"hot-key".len() + b"payload".len());
    assert_eq!(table.entry_count(), 1);
}

#[test]
fn test_size_follows_value_growth_and_shrink() {
    let table = MemTable::new();

    table.put(b"k".to_vec(), b"short".to_vec());
    assert_eq!(table.size(), 6);

    table.put(b"k".to_vec(), b"a much longer value".to_vec());
    assert_eq!(table.size(), 20);

    table.put(b"k".to_vec(), b"s".to_vec());
    assert_eq!(table.size(), 2);
}

#[test]
fn test_size_after_delete_and_reinsert() {
    let table = MemTable::new();

    table.put(b"key".to_vec(), b"value".to_vec());
    assert_eq!(table.delete(b"key".to_vec()), 3);

    table.put(b"key".to_vec(), b"value".to_vec());
    assert_eq!(table.size(), 8);

    // Deleting a key that was never written still charges the tombstone
    table.delete(b"other".to_vec());
    assert_eq!(table.size(), 13);
}

#[test]
fn test_clear_resets_size() {
    let table = MemTable::new();
    table.put(b"a".to_vec(), b"1".to_vec());
    table.put(b"b".to_vec(), b"2".to_vec());

    table.clear();

    assert!(table.is_empty());
    assert_eq!(table.size(), 0);
}
