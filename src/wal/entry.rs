//! WAL Entry definitions
//!
//! Defines the structure of individual WAL log entries.

use serde::{Deserialize, Serialize};

use crate::error::{HopperError, Result};

/// Frame header size: LSN (8) + CRC (4) + Len (4)
pub const HEADER_SIZE: usize = 16;

/// A single entry in the WAL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalEntry {
    /// Log Sequence Number - monotonically increasing
    pub lsn: u64,

    /// The operation to replay
    pub op: WalOp,
}

/// Operations that can be logged
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalOp {
    /// Write a key-value pair
    Set { key: Vec<u8>, value: Vec<u8> },

    /// Delete a key
    Delete { key: Vec<u8> },
}

impl WalEntry {
    /// Create an entry for an operation
    pub fn new(lsn: u64, op: WalOp) -> Self {
        Self { lsn, op }
    }

    /// Encode the entry as a framed byte sequence: header + payload
    pub fn encode(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(&self.op)
            .map_err(|e| HopperError::Serialization(format!("WAL op encode: {}", e)))?;
        let crc = crc32fast::hash(&payload);

        let mut frame = Vec::with_capacity(HEADER_SIZE + payload.len());
        frame.extend_from_slice(&self.lsn.to_le_bytes());
        frame.extend_from_slice(&crc.to_le_bytes());
        frame.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        frame.extend_from_slice(&payload);

        Ok(frame)
    }

    /// Decode an entry from a header and its payload bytes
    ///
    /// Verifies the CRC; a mismatch is reported as corruption, which
    /// recovery treats as the end of the valid log.
    pub fn decode(header: &[u8; HEADER_SIZE], payload: &[u8]) -> Result<Self> {
        let lsn = u64::from_le_bytes(header[0..8].try_into().unwrap());
        let crc = u32::from_le_bytes(header[8..12].try_into().unwrap());

        if crc32fast::hash(payload) != crc {
            return Err(HopperError::WalCorruption(format!(
                "CRC mismatch for entry with lsn {}",
                lsn
            )));
        }

        let op = bincode::deserialize(payload)
            .map_err(|e| HopperError::WalCorruption(format!("WAL op decode: {}", e)))?;

        Ok(Self { lsn, op })
    }
}
