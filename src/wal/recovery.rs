//! WAL Recovery
//!
//! Handles crash recovery by replaying the WAL.

use std::fs::OpenOptions;
use std::path::Path;

use crate::error::Result;

use super::{WalEntry, WalReader};

/// Entry point for recovering a WAL file after a crash
pub struct WalRecovery;

/// Outcome of a recovery pass
#[derive(Debug)]
pub struct RecoveryReport {
    /// Number of entries successfully recovered
    pub entries_recovered: u64,

    /// Number of corrupt entries dropped (with the tail that followed them)
    pub entries_corrupted: u64,

    /// Last valid LSN (0 when the log was empty)
    pub last_lsn: u64,

    /// Whether the file was truncated to remove a torn or corrupt tail
    pub was_truncated: bool,
}

impl WalRecovery {
    /// Recover all valid entries from a WAL file
    ///
    /// Reads entries in order until the first torn or corrupt frame, then
    /// truncates the file back to the end of the last valid entry so the
    /// log is clean for the writer. Valid entries are returned for replay.
    pub fn recover(path: &Path) -> Result<(Vec<WalEntry>, RecoveryReport)> {
        let mut reader = WalReader::open(path)?;
        let mut entries = Vec::new();
        let mut corrupted = 0u64;
        let mut last_lsn = 0u64;

        loop {
            match reader.next_entry() {
                Ok(Some(entry)) => {
                    last_lsn = entry.lsn;
                    entries.push(entry);
                }
                // Clean end of log or torn tail
                Ok(None) => break,
                // Corrupt frame: everything from here on is untrustworthy
                Err(e) => {
                    tracing::warn!(error = %e, "dropping corrupt WAL tail");
                    corrupted = 1;
                    break;
                }
            }
        }

        let valid_len = reader.valid_offset();
        let file_len = std::fs::metadata(path)?.len();
        let was_truncated = file_len > valid_len;

        if was_truncated {
            let file = OpenOptions::new().write(true).open(path)?;
            file.set_len(valid_len)?;
            file.sync_data()?;
        }

        let report = RecoveryReport {
            entries_recovered: entries.len() as u64,
            entries_corrupted: corrupted,
            last_lsn,
            was_truncated,
        };

        Ok((entries, report))
    }
}
