//! Write Batch
//!
//! An ordered, in-memory collection of pending mutations. Nothing in a
//! batch is durable until [`Store::commit`](super::Store::commit) applies
//! the whole batch at once.

/// A single pending mutation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOp {
    /// Write a key-value pair
    Set { key: Vec<u8>, value: Vec<u8> },

    /// Delete a key
    Delete { key: Vec<u8> },
}

/// Ordered pending mutations awaiting a commit
#[derive(Debug, Default)]
pub struct WriteBatch {
    ops: Vec<BatchOp>,
}

impl WriteBatch {
    /// Create an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a write
    pub fn set(&mut self, key: Vec<u8>, value: Vec<u8>) {
        self.ops.push(BatchOp::Set { key, value });
    }

    /// Stage a delete
    pub fn delete(&mut self, key: Vec<u8>) {
        self.ops.push(BatchOp::Delete { key });
    }

    /// Number of staged operations
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// True when nothing is staged
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Key of the most recently staged operation (for progress reporting)
    pub fn last_key(&self) -> Option<&[u8]> {
        self.ops.last().map(|op| match op {
            BatchOp::Set { key, .. } => key.as_slice(),
            BatchOp::Delete { key } => key.as_slice(),
        })
    }

    /// Consume the batch, yielding its operations in staging order
    pub(crate) fn into_ops(self) -> Vec<BatchOp> {
        self.ops
    }
}
