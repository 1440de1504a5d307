//! PlayerDirectory trait definition and record errors.

use sweep_core::AccountSnapshot;

/// Why a record could not be loaded. Per-candidate, never fatal to a run:
/// the scheduler routes malformed records to the anomaly report.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("no record for account")]
    NotFound,

    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Authority over the persisted player base.
///
/// The engine only depends on this trait so tests can substitute
/// [`MemoryDirectory`](crate::MemoryDirectory) for the filesystem.
pub trait PlayerDirectory: Send + Sync {
    /// Privilege rank of an account. 0 for ordinary accounts and for
    /// names with no readable record.
    fn rank_of(&self, name: &str) -> u8;

    /// Whether a record exists for this name.
    fn exists(&self, name: &str) -> bool;

    /// Load one account record. The embedded name must match `name`;
    /// a mismatch is a malformed record, not a different account.
    fn load_record(&self, name: &str) -> Result<AccountSnapshot, RecordError>;

    /// Names of the second accounts registered under `primary`.
    fn registered_alternates_of(&self, primary: &str) -> Vec<String>;

    /// The primary account `name` is registered under, if any.
    fn primary_of(&self, name: &str) -> Option<String>;

    /// Remove an account: delete the record and leave a tombstone.
    /// Atomic per account — returns false (and changes nothing durable)
    /// on failure. `silent` suppresses the removal announcement.
    fn remove_account(&self, name: &str, reason: &str, silent: bool) -> bool;

    /// Candidate record names in one leading-letter shard, sorted,
    /// tombstones excluded.
    fn list_shard(&self, letter: char) -> Vec<String>;
}

/// Second purge phase: removal of aged tombstone files.
pub trait TombstoneReaper: Send + Sync {
    /// Remove tombstones in `letter`'s shard older than the retention
    /// window. Returns how many were removed. Individual failures are
    /// swallowed and counted as not-reaped.
    fn reap(&self, letter: char) -> usize;
}
