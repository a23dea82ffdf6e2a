//! Tests for the store facade
//!
//! These tests verify:
//! - Batch commits and point reads
//! - Last-write-wins within and across batches
//! - Tombstone semantics for deletes
//! - Crash recovery from the WAL and persistence across reopen
//! - Full ordered scans
//! - Memtable flush on size limit

use hopperkv::{Config, Store};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn open_store(dir: &TempDir) -> Store {
    Store::open_path(dir.path()).unwrap()
}

fn commit_pairs(store: &Store, pairs: &[(&[u8], &[u8])]) {
    let mut batch = store.batch();
    for (k, v) in pairs {
        batch.set(k.to_vec(), v.to_vec());
    }
    store.commit(batch).unwrap();
}

// =============================================================================
// Basic Operations
// =============================================================================

#[test]
fn test_commit_and_get() {
    let temp = TempDir::new().unwrap();
    let store = open_store(&temp);

    commit_pairs(&store, &[(b"a", b"1"), (b"b", b"2")]);

    assert_eq!(store.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(store.get(b"b").unwrap(), Some(b"2".to_vec()));
    assert_eq!(store.get(b"c").unwrap(), None);
}

#[test]
fn test_empty_batch_commit_is_noop() {
    let temp = TempDir::new().unwrap();
    let store = open_store(&temp);

    let batch = store.batch();
    store.commit(batch).unwrap();

    assert_eq!(store.memtable_entry_count(), 0);
}

#[test]
fn test_last_write_wins_within_batch() {
    let temp = TempDir::new().unwrap();
    let store = open_store(&temp);

    commit_pairs(&store, &[(b"a", b"1"), (b"b", b"2"), (b"a", b"3")]);

    assert_eq!(store.get(b"a").unwrap(), Some(b"3".to_vec()));
}

#[test]
fn test_last_write_wins_across_batches() {
    let temp = TempDir::new().unwrap();
    let store = open_store(&temp);

    commit_pairs(&store, &[(b"a", b"old")]);
    commit_pairs(&store, &[(b"a", b"new")]);

    assert_eq!(store.get(b"a").unwrap(), Some(b"new".to_vec()));
}

#[test]
fn test_delete_hides_key() {
    let temp = TempDir::new().unwrap();
    let store = open_store(&temp);

    commit_pairs(&store, &[(b"a", b"1")]);
    store.delete(b"a").unwrap();

    assert_eq!(store.get(b"a").unwrap(), None);
}

#[test]
fn test_delete_of_missing_key_succeeds() {
    let temp = TempDir::new().unwrap();
    let store = open_store(&temp);

    store.delete(b"never-existed").unwrap();
    assert_eq!(store.get(b"never-existed").unwrap(), None);
}

#[test]
fn test_snapshot_reads() {
    let temp = TempDir::new().unwrap();
    let store = open_store(&temp);

    commit_pairs(&store, &[(b"a", b"1")]);

    let snapshot = store.snapshot();
    assert_eq!(snapshot.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(snapshot.get(b"zzz").unwrap(), None);
}

// =============================================================================
// Durability and Recovery
// =============================================================================

#[test]
fn test_close_persists_across_reopen() {
    let temp = TempDir::new().unwrap();

    let store = open_store(&temp);
    commit_pairs(&store, &[(b"a", b"1"), (b"b", b"2")]);
    store.close().unwrap();
    drop(store);

    let reopened = open_store(&temp);
    assert_eq!(reopened.get(b"a").unwrap(), Some(b"1".to_vec()));
    assert_eq!(reopened.get(b"b").unwrap(), Some(b"2".to_vec()));
}

#[test]
fn test_wal_recovery_after_unclean_shutdown() {
    let temp = TempDir::new().unwrap();

    // Commit then drop without close: data lives only in WAL + memtable
    let store = open_store(&temp);
    commit_pairs(&store, &[(b"a", b"1")]);
    drop(store);

    let reopened = open_store(&temp);
    assert_eq!(reopened.get(b"a").unwrap(), Some(b"1".to_vec()));
    // Recovery persisted the replayed entries to a table file
    assert!(reopened.table_count() >= 1);
}

#[test]
fn test_delete_survives_reopen() {
    let temp = TempDir::new().unwrap();

    let store = open_store(&temp);
    commit_pairs(&store, &[(b"a", b"1")]);
    store.close().unwrap();
    store.delete(b"a").unwrap();
    store.close().unwrap();
    drop(store);

    let reopened = open_store(&temp);
    assert_eq!(reopened.get(b"a").unwrap(), None);
}

// =============================================================================
// Scans
// =============================================================================

#[test]
fn test_scan_in_key_order() {
    let temp = TempDir::new().unwrap();
    let store = open_store(&temp);

    commit_pairs(&store, &[(b"c", b"3"), (b"a", b"1"), (b"b", b"2")]);

    let entries: Vec<_> = store.scan().unwrap().collect();
    assert_eq!(
        entries,
        vec![
            (b"a".to_vec(), b"1".to_vec()),
            (b"b".to_vec(), b"2".to_vec()),
            (b"c".to_vec(), b"3".to_vec()),
        ]
    );
}

#[test]
fn test_scan_merges_tables_and_memtable() {
    let temp = TempDir::new().unwrap();
    let store = open_store(&temp);

    // First batch lands in a table file via close-flush
    commit_pairs(&store, &[(b"a", b"old"), (b"b", b"2")]);
    store.close().unwrap();

    // Newer writes stay in the memtable and must shadow the table
    commit_pairs(&store, &[(b"a", b"new")]);
    store.delete(b"b").unwrap();

    let entries: Vec<_> = store.scan().unwrap().collect();
    assert_eq!(entries, vec![(b"a".to_vec(), b"new".to_vec())]);
}

#[test]
fn test_scan_empty_store() {
    let temp = TempDir::new().unwrap();
    let store = open_store(&temp);

    assert_eq!(store.scan().unwrap().count(), 0);
}

// =============================================================================
// Flush Triggers
// =============================================================================

#[test]
fn test_memtable_flushes_at_size_limit() {
    let temp = TempDir::new().unwrap();
    let config = Config::builder()
        .data_dir(temp.path())
        .memtable_size_limit(64)
        .build();
    let store = Store::open(config).unwrap();

    for i in 0..16u32 {
        let mut batch = store.batch();
        batch.set(
            format!("key{:04}", i).into_bytes(),
            b"some-value-bytes".to_vec(),
        );
        store.commit(batch).unwrap();
    }

    assert!(store.table_count() >= 1);
    assert_eq!(store.scan().unwrap().count(), 16);
}
