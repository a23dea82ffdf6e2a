//! Table Reader
//!
//! Opens table files and serves point lookups through an in-memory index.
//! The file handle lives behind a mutex so lookups only need `&self`,
//! letting the table set search tables under a shared read lock.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use parking_lot::Mutex;

use crate::error::{HopperError, Result};
use crate::memtable::TableEntry;

use super::{FOOTER_SIZE, HEADER_SIZE, MAGIC, TOMBSTONE_MARKER, VERSION};

/// Reader for an immutable table file
pub struct TableReader {
    /// File handle for entry reads (interior mutability for seeking)
    file: Mutex<BufReader<File>>,

    /// In-memory index: key → data block offset
    index: BTreeMap<Vec<u8>, u64>,

    /// Number of entries in the data block
    entry_count: u64,

    /// Where the index block (and thus the end of data) starts
    index_offset: u64,
}

impl TableReader {
    /// Open a table file
    ///
    /// Validates the header, verifies the data block checksum, and loads
    /// the whole index into memory for O(log n) lookups.
    pub fn open(path: &Path) -> Result<Self> {
        let mut file = File::open(path)?;
        let file_size = file.metadata()?.len();

        if file_size < HEADER_SIZE + FOOTER_SIZE {
            return Err(HopperError::Storage(format!(
                "table file too short: {} bytes",
                file_size
            )));
        }

        // Header
        let mut header = [0u8; HEADER_SIZE as usize];
        file.read_exact(&mut header)?;

        if &header[0..4] != MAGIC {
            return Err(HopperError::Storage(format!(
                "invalid table magic: expected HPKV, got {:?}",
                &header[0..4]
            )));
        }

        let version = u16::from_le_bytes(header[4..6].try_into().unwrap());
        if version != VERSION {
            return Err(HopperError::Storage(format!(
                "unsupported table version: {}",
                version
            )));
        }

        let entry_count = u64::from_le_bytes(header[6..14].try_into().unwrap());

        // Footer
        file.seek(SeekFrom::End(-(FOOTER_SIZE as i64)))?;
        let mut footer = [0u8; FOOTER_SIZE as usize];
        file.read_exact(&mut footer)?;

        let index_offset = u64::from_le_bytes(footer[0..8].try_into().unwrap());
        let data_crc = u32::from_le_bytes(footer[8..12].try_into().unwrap());

        if index_offset < HEADER_SIZE || index_offset > file_size - FOOTER_SIZE {
            return Err(HopperError::Storage(format!(
                "table index offset {} out of bounds",
                index_offset
            )));
        }

        // Verify the data block checksum before trusting anything in it
        file.seek(SeekFrom::Start(HEADER_SIZE))?;
        let mut data = vec![0u8; (index_offset - HEADER_SIZE) as usize];
        file.read_exact(&mut data)?;
        if crc32fast::hash(&data) != data_crc {
            return Err(HopperError::Storage(
                "table data block checksum mismatch".to_string(),
            ));
        }

        // Index block sits between the data block and the footer
        let mut index_data = vec![0u8; (file_size - FOOTER_SIZE - index_offset) as usize];
        file.read_exact(&mut index_data)?;
        let index = parse_index(&index_data)?;

        Ok(Self {
            file: Mutex::new(BufReader::new(file)),
            index,
            entry_count,
            index_offset,
        })
    }

    /// Look up a key
    ///
    /// Returns:
    /// - `Ok(Some(Value(v)))` — key present with a live value
    /// - `Ok(Some(Tombstone))` — key deleted in this table
    /// - `Ok(None)` — key not in this table at all
    pub fn get(&self, key: &[u8]) -> Result<Option<TableEntry>> {
        let offset = match self.index.get(key) {
            Some(&off) => off,
            None => return Ok(None),
        };

        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(offset))?;

        let mut entry_header = [0u8; 8];
        file.read_exact(&mut entry_header)?;
        let key_len = u32::from_le_bytes(entry_header[0..4].try_into().unwrap()) as i64;
        let val_len = u32::from_le_bytes(entry_header[4..8].try_into().unwrap());

        if val_len == TOMBSTONE_MARKER {
            return Ok(Some(TableEntry::Tombstone));
        }

        // Skip the key; the index already matched it
        file.seek(SeekFrom::Current(key_len))?;
        let mut value = vec![0u8; val_len as usize];
        file.read_exact(&mut value)?;

        Ok(Some(TableEntry::Value(value)))
    }

    /// Read every entry of the data block in sorted key order
    ///
    /// Used by the full-store scan; `None` values are tombstones.
    pub fn entries(&self) -> Result<Vec<(Vec<u8>, Option<Vec<u8>>)>> {
        let mut file = self.file.lock();
        file.seek(SeekFrom::Start(HEADER_SIZE))?;

        let mut data = vec![0u8; (self.index_offset - HEADER_SIZE) as usize];
        file.read_exact(&mut data)?;
        drop(file);

        let mut entries = Vec::with_capacity(self.entry_count as usize);
        let mut pos = 0usize;
        while pos + 8 <= data.len() {
            let key_len = u32::from_le_bytes(data[pos..pos + 4].try_into().unwrap()) as usize;
            let val_len = u32::from_le_bytes(data[pos + 4..pos + 8].try_into().unwrap());
            pos += 8;

            if pos + key_len > data.len() {
                return Err(HopperError::Storage(
                    "table data block truncated mid-entry".to_string(),
                ));
            }
            let key = data[pos..pos + key_len].to_vec();
            pos += key_len;

            let value = if val_len == TOMBSTONE_MARKER {
                None
            } else {
                let val_len = val_len as usize;
                if pos + val_len > data.len() {
                    return Err(HopperError::Storage(
                        "table data block truncated mid-value".to_string(),
                    ));
                }
                let v = data[pos..pos + val_len].to_vec();
                pos += val_len;
                Some(v)
            };

            entries.push((key, value));
        }

        Ok(entries)
    }

    /// Number of entries in this table
    pub fn entry_count(&self) -> u64 {
        self.entry_count
    }

    /// Smallest key in this table
    pub fn min_key(&self) -> Option<&[u8]> {
        self.index.keys().next().map(|k| k.as_slice())
    }

    /// Largest key in this table
    pub fn max_key(&self) -> Option<&[u8]> {
        self.index.keys().next_back().map(|k| k.as_slice())
    }

    /// Quick range check: false means the key is definitely absent
    pub fn might_contain(&self, key: &[u8]) -> bool {
        match (self.min_key(), self.max_key()) {
            (Some(min), Some(max)) => key >= min && key <= max,
            _ => false,
        }
    }
}

/// Parse the index block: [key_len(4)][offset(8)][key] per entry
fn parse_index(data: &[u8]) -> Result<BTreeMap<Vec<u8>, u64>> {
    let mut index = BTreeMap::new();
    let mut pos = 0usize;

    while pos < data.len() {
        if pos + 12 > data.len() {
            return Err(HopperError::Storage(
                "table index block truncated".to_string(),
            ));
        }
        let key_len = u32::from_le_bytes(data[pos..pos + 4].try_into().unwrap()) as usize;
        let offset = u64::from_le_bytes(data[pos + 4..pos + 12].try_into().unwrap());
        pos += 12;

        if pos + key_len > data.len() {
            return Err(HopperError::Storage(
                "table index block truncated mid-key".to_string(),
            ));
        }
        index.insert(data[pos..pos + key_len].to_vec(), offset);
        pos += key_len;
    }

    Ok(index)
}
