//! Table Builder
//!
//! Writes sorted key-value entries to a new table file.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{HopperError, Result};
use crate::memtable::TableEntry;

use super::{HEADER_SIZE, MAGIC, TOMBSTONE_MARKER, VERSION};

/// Builder for creating a table file from sorted entries
///
/// Call [`TableBuilder::add`] in ascending key order (the memtable's
/// BTreeMap already guarantees this), then [`TableBuilder::finish`].
pub struct TableBuilder {
    path: PathBuf,
    writer: BufWriter<File>,

    /// Offset the next data entry will land at (recorded into the index)
    next_offset: u64,

    /// Index under construction: key → data block offset
    index: Vec<(Vec<u8>, u64)>,

    /// Running checksum of the data block
    hasher: crc32fast::Hasher,
}

impl TableBuilder {
    /// Create a builder and write the file header
    ///
    /// The entry count in the header is a placeholder until `finish`.
    pub fn new(path: &Path) -> Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;

        let mut writer = BufWriter::new(file);
        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&0u64.to_le_bytes())?;

        Ok(Self {
            path: path.to_path_buf(),
            writer,
            next_offset: HEADER_SIZE,
            index: Vec::new(),
            hasher: crc32fast::Hasher::new(),
        })
    }

    /// Add an entry (value or tombstone) in sorted key order
    pub fn add(&mut self, key: &[u8], entry: &TableEntry) -> Result<()> {
        let value = match entry {
            TableEntry::Value(v) => Some(v.as_slice()),
            TableEntry::Tombstone => None,
        };

        self.index.push((key.to_vec(), self.next_offset));

        let val_len = value.map(|v| v.len() as u32).unwrap_or(TOMBSTONE_MARKER);
        self.write_hashed(&(key.len() as u32).to_le_bytes())?;
        self.write_hashed(&val_len.to_le_bytes())?;
        self.write_hashed(key)?;

        self.next_offset += 8 + key.len() as u64;
        if let Some(v) = value {
            self.write_hashed(v)?;
            self.next_offset += v.len() as u64;
        }

        Ok(())
    }

    /// Write bytes to the data block while folding them into the checksum
    fn write_hashed(&mut self, bytes: &[u8]) -> Result<()> {
        self.writer.write_all(bytes)?;
        self.hasher.update(bytes);
        Ok(())
    }

    /// Write the index block and footer, patch the entry count, and sync
    pub fn finish(mut self) -> Result<PathBuf> {
        let index_offset = self.next_offset;
        let entry_count = self.index.len() as u64;

        // Index block: [key_len(4)][offset(8)][key] per entry
        for (key, offset) in &self.index {
            self.writer.write_all(&(key.len() as u32).to_le_bytes())?;
            self.writer.write_all(&offset.to_le_bytes())?;
            self.writer.write_all(key)?;
        }

        // Footer: index_offset (8) + data_crc (4) + padding (4)
        let data_crc = self.hasher.finalize();
        self.writer.write_all(&index_offset.to_le_bytes())?;
        self.writer.write_all(&data_crc.to_le_bytes())?;
        self.writer.write_all(&[0u8; 4])?;
        self.writer.flush()?;

        // Patch the entry count placeholder in the header
        let mut file = self
            .writer
            .into_inner()
            .map_err(|e| HopperError::Storage(format!("table flush failed: {}", e)))?;
        file.seek(SeekFrom::Start(6))?; // past magic + version
        file.write_all(&entry_count.to_le_bytes())?;
        file.sync_all()?;

        Ok(self.path)
    }
}
