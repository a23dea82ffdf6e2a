//! WAL Writer
//!
//! Handles appending entries to the WAL file.

use std::fs::{File, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use crate::config::WalSyncStrategy;
use crate::error::Result;

use super::{WalEntry, WalOp};

/// Writes entries to the WAL file
pub struct WalWriter {
    file: File,
    next_lsn: u64,
    sync_strategy: WalSyncStrategy,
}

impl WalWriter {
    /// Open or create a WAL file for appending
    ///
    /// The store only opens the writer after recovery has replayed and
    /// truncated the log, so LSNs restart at 1 on every open.
    pub fn open(path: &Path, sync_strategy: WalSyncStrategy) -> Result<Self> {
        let mut file = OpenOptions::new()
            .create(true)
            .write(true)
            .open(path)?;
        file.seek(SeekFrom::End(0))?;

        Ok(Self {
            file,
            next_lsn: 1,
            sync_strategy,
        })
    }

    /// Append an operation; returns the LSN assigned to it
    pub fn append(&mut self, op: WalOp) -> Result<u64> {
        let lsn = self.next_lsn;
        let frame = WalEntry::new(lsn, op).encode()?;
        self.write_frames(&frame, 1)?;

        if matches!(self.sync_strategy, WalSyncStrategy::EveryWrite) {
            self.file.sync_data()?;
        }

        Ok(lsn)
    }

    /// Append a group of operations as a unit.
    ///
    /// All frames are encoded up front and written in one call, and a
    /// failed write is rolled back to the previous log length, so the
    /// log never holds a strict prefix of the group.
    pub fn append_batch(&mut self, ops: Vec<WalOp>) -> Result<()> {
        let mut frames = Vec::new();
        let mut count = 0u64;
        for op in ops {
            frames.extend_from_slice(&WalEntry::new(self.next_lsn + count, op).encode()?);
            count += 1;
        }
        if count == 0 {
            return Ok(());
        }
        self.write_frames(&frames, count)?;

        if matches!(self.sync_strategy, WalSyncStrategy::EveryWrite) {
            self.file.sync_data()?;
        }

        Ok(())
    }

    /// Write pre-encoded frames, restoring the previous log length if
    /// the write fails partway. Partial frames must not stay in the
    /// log; a later sync would make them durable and recovery would
    /// replay them.
    fn write_frames(&mut self, frames: &[u8], count: u64) -> Result<()> {
        let start = self.file.stream_position()?;
        if let Err(err) = self.file.write_all(frames) {
            if let Err(rollback_err) = self.file.set_len(start) {
                tracing::warn!(error = %rollback_err, "failed to roll back partial WAL write");
            }
            let _ = self.file.seek(SeekFrom::Start(start));
            return Err(err.into());
        }
        self.next_lsn += count;
        Ok(())
    }

    /// Force sync to disk (the durability point of a batch commit)
    pub fn sync(&mut self) -> Result<()> {
        self.file.sync_data()?;
        Ok(())
    }

    /// Discard all entries (after their data became durable in a table file)
    pub fn truncate(&mut self) -> Result<()> {
        self.file.set_len(0)?;
        self.file.seek(SeekFrom::Start(0))?;
        self.file.sync_data()?;
        Ok(())
    }

    /// LSN that the next append will receive
    pub fn next_lsn(&self) -> u64 {
        self.next_lsn
    }
}
