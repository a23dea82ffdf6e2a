//! Record Parser
//!
//! Turns one raw input line into a `(key, value)` byte pair.
//!
//! ## Responsibilities
//! - Split on the first `,` byte only
//! - Treat a line without a separator as key-with-empty-value
//! - Keep bytes opaque: no trimming, no escapes, no UTF-8 validation

/// Separator between key and value on an input line
pub const SEPARATOR: u8 = b',';

/// A single parsed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Record key (unique within the store; later writes supersede earlier)
    pub key: Vec<u8>,

    /// Record value (empty when the input line had no separator)
    pub value: Vec<u8>,
}

impl Record {
    /// Parse one input line into a record.
    ///
    /// Splits on the first occurrence of [`SEPARATOR`]; any later
    /// separators stay in the value. A line without a separator is a
    /// defined case (whole line is the key, value is empty), not an error.
    pub fn parse(line: &[u8]) -> Self {
        match line.iter().position(|&b| b == SEPARATOR) {
            Some(pos) => Self {
                key: line[..pos].to_vec(),
                value: line[pos + 1..].to_vec(),
            },
            None => Self {
                key: line.to_vec(),
                value: Vec::new(),
            },
        }
    }

    /// Build a record from owned parts
    pub fn new(key: Vec<u8>, value: Vec<u8>) -> Self {
        Self { key, value }
    }
}
