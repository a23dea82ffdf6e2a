//! Store Module
//!
//! The embedded ordered key-value engine behind the four operations.
//!
//! ## Responsibilities
//! - Coordinate WAL, memtable, and on-disk tables
//! - Atomic batch commits (the ingestion durability boundary)
//! - Point reads, per-key durable deletes, full ordered scans
//! - Crash recovery on open, graceful close
//!
//! ## Concurrency Model
//! Writes (commit/delete/flush/close) are serialized by `write_lock`.
//! Reads go to the memtable first, then the tables newest → oldest;
//! both layers take shared locks internally, so reads need no
//! coordination with each other.

mod batch;
mod tables;

pub use batch::{BatchOp, WriteBatch};

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::Result;
use crate::memtable::{MemTable, TableEntry};
use crate::wal::{WalOp, WalRecovery, WalWriter};

use tables::TableSet;

/// The embedded ordered key-value store
pub struct Store {
    config: Config,

    /// Write-ahead log (exclusive access for appends)
    wal: Mutex<WalWriter>,

    /// Recent writes, not yet in a table file
    memtable: MemTable,

    /// Immutable on-disk tables
    tables: TableSet,

    /// Serializes commit/delete/flush/close
    write_lock: Mutex<()>,
}

impl Store {
    const WAL_FILENAME: &'static str = "wal.log";
    const TABLE_DIR: &'static str = "tables";

    /// Open or create a store with the given config
    ///
    /// On startup:
    /// 1. Create the data directory
    /// 2. Load existing table files
    /// 3. Recover the WAL: replay valid entries, persist them to a table,
    ///    then truncate the log
    pub fn open(config: Config) -> Result<Self> {
        fs::create_dir_all(&config.data_dir)?;

        let table_dir = config.data_dir.join(Self::TABLE_DIR);
        let wal_path = config.data_dir.join(Self::WAL_FILENAME);

        let tables = TableSet::open(&table_dir)?;
        let memtable = MemTable::new();

        if wal_path.exists() {
            let (entries, report) = WalRecovery::recover(&wal_path)?;

            if report.entries_recovered > 0 || report.entries_corrupted > 0 {
                tracing::info!(
                    recovered = report.entries_recovered,
                    corrupted = report.entries_corrupted,
                    last_lsn = report.last_lsn,
                    truncated = report.was_truncated,
                    "WAL recovery complete"
                );
            }

            for entry in entries {
                match entry.op {
                    WalOp::Set { key, value } => {
                        memtable.put(key, value);
                    }
                    WalOp::Delete { key } => {
                        memtable.delete(key);
                    }
                }
            }

            // Persist recovered entries before truncating the log, so a
            // crash between here and the truncate loses nothing.
            if !memtable.is_empty() {
                tracing::info!(
                    entries = memtable.entry_count(),
                    "flushing recovered entries to a table file"
                );
                tables.flush(&memtable)?;
                memtable.clear();
            }
        }

        let mut wal = WalWriter::open(&wal_path, config.wal_sync_strategy)?;
        wal.truncate()?;

        Ok(Self {
            config,
            wal: Mutex::new(wal),
            memtable,
            tables,
            write_lock: Mutex::new(()),
        })
    }

    /// Open with default config rooted at `path`
    pub fn open_path(path: &Path) -> Result<Self> {
        Self::open(Config::builder().data_dir(path).build())
    }

    /// Start an empty write batch
    pub fn batch(&self) -> WriteBatch {
        WriteBatch::new()
    }

    /// Get a value by key
    ///
    /// Search order: memtable (most recent), then tables newest → oldest.
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        if let Some(entry) = self.memtable.get(key) {
            return match entry {
                TableEntry::Value(value) => Ok(Some(value)),
                TableEntry::Tombstone => Ok(None),
            };
        }

        self.tables.get(key)
    }

    /// Commit a batch atomically
    ///
    /// Under the write lock: append the whole batch to the WAL as one
    /// write, sync once, then apply all operations to the memtable.
    /// After the sync returns, the whole batch survives a crash; before
    /// it, none of it does — a failed append leaves no frames behind.
    pub fn commit(&self, batch: WriteBatch) -> Result<()> {
        if batch.is_empty() {
            return Ok(());
        }

        let _write_guard = self.write_lock.lock();
        let ops = batch.into_ops();

        {
            let wal_ops = ops
                .iter()
                .map(|op| match op {
                    BatchOp::Set { key, value } => WalOp::Set {
                        key: key.clone(),
                        value: value.clone(),
                    },
                    BatchOp::Delete { key } => WalOp::Delete { key: key.clone() },
                })
                .collect();

            let mut wal = self.wal.lock();
            wal.append_batch(wal_ops)?;
            wal.sync()?;
        }

        let mut size = 0;
        for op in ops {
            size = match op {
                BatchOp::Set { key, value } => self.memtable.put(key, value),
                BatchOp::Delete { key } => self.memtable.delete(key),
            };
        }

        if size >= self.config.memtable_size_limit {
            self.flush_locked()?;
        }

        Ok(())
    }

    /// Delete a single key with an immediate durable commit
    ///
    /// The per-key unit of work behind the `remove` operation.
    pub fn delete(&self, key: &[u8]) -> Result<()> {
        let _write_guard = self.write_lock.lock();

        {
            let mut wal = self.wal.lock();
            wal.append(WalOp::Delete { key: key.to_vec() })?;
            wal.sync()?;
        }

        let size = self.memtable.delete(key.to_vec());
        if size >= self.config.memtable_size_limit {
            self.flush_locked()?;
        }

        Ok(())
    }

    /// Take a consistent read view for a batch of lookups
    ///
    /// This process is the store's only writer, so the snapshot is a plain
    /// borrow; the type records the snapshot-isolation choice for the
    /// query operation.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot { store: self }
    }

    /// Full forward scan over all live entries, in key order
    ///
    /// Tables overlay oldest → newest, then the memtable on top; keys
    /// whose newest entry is a tombstone are dropped.
    pub fn scan(&self) -> Result<Scan> {
        let mut merged: BTreeMap<Vec<u8>, Option<Vec<u8>>> = BTreeMap::new();
        self.tables.scan_into(&mut merged)?;

        for (key, entry) in self.memtable.entries() {
            match entry {
                TableEntry::Value(v) => merged.insert(key, Some(v)),
                TableEntry::Tombstone => merged.insert(key, None),
            };
        }

        Ok(Scan {
            inner: merged.into_iter(),
        })
    }

    /// Close the store gracefully
    ///
    /// Flushes remaining memtable contents to a table file and syncs the
    /// WAL. The shutdown coordinator guarantees this runs once even when
    /// an interrupt races the end of input.
    pub fn close(&self) -> Result<()> {
        let _write_guard = self.write_lock.lock();

        if !self.memtable.is_empty() {
            self.flush_locked()?;
        }

        self.wal.lock().sync()?;
        Ok(())
    }

    /// Flush the memtable to a new table and truncate the WAL.
    /// Caller holds the write lock.
    fn flush_locked(&self) -> Result<()> {
        if self.memtable.is_empty() {
            return Ok(());
        }

        self.tables.flush(&self.memtable)?;
        self.memtable.clear();
        self.wal.lock().truncate()?;

        Ok(())
    }

    // =========================================================================
    // Accessors (for tests and diagnostics)
    // =========================================================================

    /// Data directory of this store
    pub fn data_dir(&self) -> &Path {
        &self.config.data_dir
    }

    /// Entries currently buffered in the memtable
    pub fn memtable_entry_count(&self) -> usize {
        self.memtable.entry_count()
    }

    /// Number of on-disk table files
    pub fn table_count(&self) -> usize {
        self.tables.count()
    }
}

/// A consistent read view over the store for one query run
pub struct Snapshot<'a> {
    store: &'a Store,
}

impl Snapshot<'_> {
    /// Point lookup within the snapshot
    pub fn get(&self, key: &[u8]) -> Result<Option<Vec<u8>>> {
        self.store.get(key)
    }
}

/// Iterator over all live `(key, value)` pairs in key order
pub struct Scan {
    inner: std::collections::btree_map::IntoIter<Vec<u8>, Option<Vec<u8>>>,
}

impl Iterator for Scan {
    type Item = (Vec<u8>, Vec<u8>);

    fn next(&mut self) -> Option<Self::Item> {
        // Skip tombstoned keys
        for (key, value) in self.inner.by_ref() {
            if let Some(value) = value {
                return Some((key, value));
            }
        }
        None
    }
}
