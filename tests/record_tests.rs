//! Tests for the record parser
//!
//! These tests verify:
//! - Splitting on the first separator only
//! - Lines without a separator parse as key-with-empty-value
//! - Bytes stay opaque (no trimming, no UTF-8 requirements)

use hopperkv::Record;

// =============================================================================
// Separator Handling
// =============================================================================

#[test]
fn test_splits_on_first_comma_only() {
    let record = Record::parse(b"key,value,with,commas");

    assert_eq!(record.key, b"key");
    assert_eq!(record.value, b"value,with,commas");
}

#[test]
fn test_simple_key_value() {
    let record = Record::parse(b"a,1");

    assert_eq!(record.key, b"a");
    assert_eq!(record.value, b"1");
}

#[test]
fn test_no_separator_yields_empty_value() {
    let record = Record::parse(b"just-a-key");

    assert_eq!(record.key, b"just-a-key");
    assert!(record.value.is_empty());
}

#[test]
fn test_separator_first_byte_yields_empty_key() {
    let record = Record::parse(b",value");

    assert!(record.key.is_empty());
    assert_eq!(record.value, b"value");
}

#[test]
fn test_trailing_separator_yields_empty_value() {
    let record = Record::parse(b"key,");

    assert_eq!(record.key, b"key");
    assert!(record.value.is_empty());
}

#[test]
fn test_empty_line() {
    let record = Record::parse(b"");

    assert!(record.key.is_empty());
    assert!(record.value.is_empty());
}

// =============================================================================
// Byte Opaqueness
// =============================================================================

#[test]
fn test_whitespace_is_preserved() {
    let record = Record::parse(b"  key , value ");

    assert_eq!(record.key, b"  key ");
    assert_eq!(record.value, b" value ");
}

#[test]
fn test_non_utf8_bytes_pass_through() {
    let record = Record::parse(&[0xff, 0xfe, b',', 0x00, 0x80]);

    assert_eq!(record.key, &[0xff, 0xfe]);
    assert_eq!(record.value, &[0x00, 0x80]);
}
