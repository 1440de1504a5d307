//! sweep-directory — access to the persisted player base.
//!
//! This crate provides:
//! - `PlayerDirectory` trait for record load, rank and second-account lookup,
//!   and removal
//! - `FsPlayerDirectory`, the filesystem implementation over per-letter
//!   shard directories
//! - `ShardIterator`, paginated candidate enumeration shard-by-shard
//! - `DeletedFileReaper`, retention-gated tombstone removal
//! - `MemoryDirectory`, an in-memory fake for engine tests

pub mod fs;
pub mod memory;
pub mod reaper;
pub mod shards;
pub mod traits;

pub use fs::FsPlayerDirectory;
pub use memory::MemoryDirectory;
pub use reaper::DeletedFileReaper;
pub use shards::{Batch, ShardIterator, SHARD_LETTERS};
pub use traits::{PlayerDirectory, RecordError, TombstoneReaper};
