//! End-to-end tests for the operation executors
//!
//! These tests verify the spec scenarios over real stores:
//! - index then dump yields last-write-wins entries in key order
//! - query reports FOUND/FAILED per key
//! - remove followed by query reports FAILED
//! - dump output fed back to index reproduces the same store

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use hopperkv::{ops, Config, IngestController, Store};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn config_for(path: &Path) -> Config {
    Config::builder().data_dir(path).build()
}

/// Drive the index pipeline without registering a signal handler
fn index_input(path: &Path, input: &[u8], batch_size: usize) {
    let store = Arc::new(Store::open_path(path).unwrap());
    let controller = IngestController::new(store, batch_size);
    ops::index::ingest(&controller, Cursor::new(input)).unwrap();
    controller.flush();
    controller.store().close().unwrap();
}

fn dump_output(path: &Path) -> Vec<u8> {
    let mut output = Vec::new();
    ops::dump::run(config_for(path), &mut output).unwrap();
    output
}

// =============================================================================
// Index + Dump
// =============================================================================

#[test]
fn test_index_then_dump_last_write_wins() {
    let temp = TempDir::new().unwrap();

    index_input(temp.path(), b"a,1\nb,2\na,3\n", 1000);

    assert_eq!(dump_output(temp.path()), b"a,3\nb,2\n");
}

#[test]
fn test_index_without_trailing_newline() {
    let temp = TempDir::new().unwrap();

    index_input(temp.path(), b"a,1\nb,2", 1000);

    assert_eq!(dump_output(temp.path()), b"a,1\nb,2\n");
}

#[test]
fn test_index_line_without_separator_stores_empty_value() {
    let temp = TempDir::new().unwrap();

    index_input(temp.path(), b"lonely\n", 1000);

    assert_eq!(dump_output(temp.path()), b"lonely,\n");
}

#[test]
fn test_index_strips_crlf_line_endings() {
    let temp = TempDir::new().unwrap();

    // Windows-style input, including a final line that ends at EOF
    index_input(temp.path(), b"a,1\r\nlonely\r\nb,2\r", 1000);

    assert_eq!(dump_output(temp.path()), b"a,1\nb,2\nlonely,\n");
}

#[test]
fn test_query_strips_crlf_line_endings() {
    let temp = TempDir::new().unwrap();
    index_input(temp.path(), b"a,1\nb,2\n", 1000);

    let mut output = Vec::new();
    ops::query::run(config_for(temp.path()), Cursor::new(b"a\r\nzzz\r\n"), &mut output).unwrap();

    assert_eq!(output, b"FOUND: a\nFAILED: zzz\n");
}

#[test]
fn test_index_with_small_batch_size() {
    let temp = TempDir::new().unwrap();

    // Forces several threshold commits plus a final partial flush
    index_input(temp.path(), b"a,1\nb,2\nc,3\nd,4\ne,5\n", 2);

    assert_eq!(dump_output(temp.path()), b"a,1\nb,2\nc,3\nd,4\ne,5\n");
}

#[test]
fn test_dump_round_trips_through_index() {
    let first = TempDir::new().unwrap();
    let second = TempDir::new().unwrap();

    index_input(first.path(), b"x,1\ny,two,with,commas\nz,\n", 1000);
    let dumped = dump_output(first.path());

    index_input(second.path(), &dumped, 1000);

    assert_eq!(dump_output(second.path()), dumped);
}

// =============================================================================
// Query
// =============================================================================

#[test]
fn test_query_reports_found_and_failed() {
    let temp = TempDir::new().unwrap();
    index_input(temp.path(), b"a,1\nb,2\na,3\n", 1000);

    let mut output = Vec::new();
    ops::query::run(config_for(temp.path()), Cursor::new(b"a\nzzz\n"), &mut output).unwrap();

    assert_eq!(output, b"FOUND: a\nFAILED: zzz\n");
}

#[test]
fn test_query_does_not_mutate_store() {
    let temp = TempDir::new().unwrap();
    index_input(temp.path(), b"a,1\n", 1000);

    let mut output = Vec::new();
    ops::query::run(config_for(temp.path()), Cursor::new(b"a\nb\n"), &mut output).unwrap();

    assert_eq!(dump_output(temp.path()), b"a,1\n");
}

// =============================================================================
// Remove
// =============================================================================

#[test]
fn test_remove_reports_success_per_key() {
    let temp = TempDir::new().unwrap();
    index_input(temp.path(), b"a,1\nb,2\n", 1000);

    let mut output = Vec::new();
    ops::remove::run(config_for(temp.path()), Cursor::new(b"a\n"), &mut output).unwrap();

    assert_eq!(output, b"SUCCESS: a\n");
}

#[test]
fn test_remove_then_query_reports_failed() {
    let temp = TempDir::new().unwrap();
    index_input(temp.path(), b"a,1\nb,2\n", 1000);

    let mut removed = Vec::new();
    ops::remove::run(config_for(temp.path()), Cursor::new(b"a\n"), &mut removed).unwrap();

    let mut queried = Vec::new();
    ops::query::run(
        config_for(temp.path()),
        Cursor::new(b"a\nb\n"),
        &mut queried,
    )
    .unwrap();

    assert_eq!(queried, b"FAILED: a\nFOUND: b\n");
}

#[test]
fn test_removed_key_absent_from_dump() {
    let temp = TempDir::new().unwrap();
    index_input(temp.path(), b"a,1\nb,2\n", 1000);

    let mut output = Vec::new();
    ops::remove::run(config_for(temp.path()), Cursor::new(b"a\n"), &mut output).unwrap();

    assert_eq!(dump_output(temp.path()), b"b,2\n");
}

// =============================================================================
// Dump
// =============================================================================

#[test]
fn test_dump_of_empty_store() {
    let temp = TempDir::new().unwrap();

    assert_eq!(dump_output(temp.path()), b"");
}

#[test]
fn test_dump_preserves_commas_in_values() {
    let temp = TempDir::new().unwrap();
    index_input(temp.path(), b"k,v1,v2,v3\n", 1000);

    assert_eq!(dump_output(temp.path()), b"k,v1,v2,v3\n");
}
