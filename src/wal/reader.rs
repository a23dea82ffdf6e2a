//! WAL Reader
//!
//! Handles reading entries from the WAL file.

use std::fs::File;
use std::io::{BufReader, ErrorKind, Read};
use std::path::Path;

use crate::error::{HopperError, Result};

use super::{WalEntry, HEADER_SIZE};

/// Reads entries from the WAL file sequentially
pub struct WalReader {
    reader: BufReader<File>,

    /// Byte offset of the end of the last fully read entry.
    /// Recovery truncates the file back to this point.
    valid_offset: u64,
}

impl WalReader {
    /// Open a WAL file for reading
    pub fn open(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self {
            reader: BufReader::new(file),
            valid_offset: 0,
        })
    }

    /// Read the next entry
    ///
    /// Returns:
    /// - `Ok(Some(entry))` — a complete, checksum-valid entry
    /// - `Ok(None)` — clean end of log, or a partial frame at the tail
    ///   (a torn write; everything past `valid_offset` is discardable)
    /// - `Err(WalCorruption)` — a full frame whose checksum or payload
    ///   does not decode
    pub fn next_entry(&mut self) -> Result<Option<WalEntry>> {
        let mut header = [0u8; HEADER_SIZE];
        if let Err(e) = self.reader.read_exact(&mut header) {
            return match e.kind() {
                // EOF at or inside the header: end of valid log
                ErrorKind::UnexpectedEof => Ok(None),
                _ => Err(HopperError::Io(e)),
            };
        }

        let len = u32::from_le_bytes(header[12..16].try_into().unwrap()) as usize;

        let mut payload = vec![0u8; len];
        if let Err(e) = self.reader.read_exact(&mut payload) {
            return match e.kind() {
                // Torn write: header landed but the payload did not
                ErrorKind::UnexpectedEof => Ok(None),
                _ => Err(HopperError::Io(e)),
            };
        }

        let entry = WalEntry::decode(&header, &payload)?;
        self.valid_offset += (HEADER_SIZE + len) as u64;

        Ok(Some(entry))
    }

    /// Offset of the end of the last fully decoded entry
    pub fn valid_offset(&self) -> u64 {
        self.valid_offset
    }
}
