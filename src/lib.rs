//! # HopperKV
//!
//! A command-line bulk loader over an embedded ordered key-value store:
//! - Batched, interrupt-safe ingestion with a tunable commit threshold
//! - Write-Ahead Logging (WAL) for durability, with crash recovery
//! - Immutable sorted table files with checksummed data blocks
//! - Point queries, per-key deletes, and full ordered dumps
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CLI (index/query/remove/dump)            │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │  Record Parser ──► Batch Commit Controller ◄── SIGINT       │
//! │                        (mutex-guarded)      (flush + close)  │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │ atomic batch commit
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │     WAL     │          │  MemTable   │
//!   │  (Append)   │          │  (RwLock)   │
//!   └─────────────┘          └──────┬──────┘
//!                                   │ flush
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Tables    │
//!                           │  (sorted)   │
//!                           └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;

pub mod memtable;
pub mod record;
pub mod sstable;
pub mod store;
pub mod wal;

pub mod ingest;
pub mod ops;
pub mod shutdown;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use config::Config;
pub use error::{HopperError, Result};
pub use ingest::IngestController;
pub use record::Record;
pub use shutdown::{Phase, ShutdownCoordinator};
pub use store::{Store, WriteBatch};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of HopperKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
