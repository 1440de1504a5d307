//! In-memory player directory for tests.
//!
//! Backs the same traits as the filesystem implementation so the engine can
//! run full purge sessions against a fabricated player base: records keyed
//! by filename stem (which may disagree with the embedded name), a
//! malformed-record set, a seconds registry, forced removal failures, and
//! aged tombstones for the reaping phase.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;

use sweep_core::policy::TOMB_RETENTION_SECS;
use sweep_core::AccountSnapshot;

use crate::traits::{PlayerDirectory, RecordError, TombstoneReaper};

#[derive(Default)]
struct Inner {
    /// filename stem → record content.
    records: BTreeMap<String, AccountSnapshot>,
    /// Names whose records refuse to parse.
    malformed: BTreeSet<String>,
    /// alternate → primary.
    secondaries: HashMap<String, String>,
    /// Names whose removal is forced to fail.
    removal_fails: BTreeSet<String>,
    /// (name, reason) of successful removals, in order.
    removed: Vec<(String, String)>,
    /// tombstone name → age in seconds.
    tombstones: BTreeMap<String, u64>,
}

#[derive(Default)]
pub struct MemoryDirectory {
    inner: Mutex<Inner>,
}

impl MemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record stored under its own name.
    pub fn insert(&self, snapshot: AccountSnapshot) {
        let name = snapshot.name.clone();
        self.insert_as(&name, snapshot);
    }

    /// Insert a record stored under `file_name`, which may disagree with
    /// the embedded name (the anomaly case).
    pub fn insert_as(&self, file_name: &str, snapshot: AccountSnapshot) {
        self.lock().records.insert(file_name.to_string(), snapshot);
    }

    /// Make `name`'s record unreadable.
    pub fn mark_malformed(&self, name: &str) {
        let mut inner = self.lock();
        inner.malformed.insert(name.to_string());
        inner
            .records
            .entry(name.to_string())
            .or_insert_with(|| AccountSnapshot {
                name: name.to_string(),
                last_login: None,
                played_seconds: 0,
                experience: [0; 6],
                hold: None,
                rank: 0,
            });
    }

    /// Register `alt` as a second account of `primary`.
    pub fn register_second(&self, alt: &str, primary: &str) {
        self.lock()
            .secondaries
            .insert(alt.to_string(), primary.to_string());
    }

    /// Force removal of `name` to fail.
    pub fn fail_removal(&self, name: &str) {
        self.lock().removal_fails.insert(name.to_string());
    }

    /// Add a tombstone with a given age in seconds.
    pub fn add_tombstone(&self, name: &str, age_secs: u64) {
        self.lock().tombstones.insert(name.to_string(), age_secs);
    }

    /// Successful removals so far, in order.
    pub fn removed(&self) -> Vec<(String, String)> {
        self.lock().removed.clone()
    }

    pub fn tombstone_count(&self) -> usize {
        self.lock().tombstones.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }
}

impl PlayerDirectory for MemoryDirectory {
    fn rank_of(&self, name: &str) -> u8 {
        let inner = self.lock();
        if inner.malformed.contains(name) {
            return 0;
        }
        inner.records.get(name).map(|s| s.rank).unwrap_or(0)
    }

    fn exists(&self, name: &str) -> bool {
        self.lock().records.contains_key(name)
    }

    fn load_record(&self, name: &str) -> Result<AccountSnapshot, RecordError> {
        let inner = self.lock();
        if inner.malformed.contains(name) {
            return Err(RecordError::Malformed("unreadable record".to_string()));
        }
        let snapshot = inner.records.get(name).ok_or(RecordError::NotFound)?;
        if snapshot.name != name {
            return Err(RecordError::Malformed(format!(
                "embedded name '{}' does not match filename '{}'",
                snapshot.name, name
            )));
        }
        Ok(snapshot.clone())
    }

    fn registered_alternates_of(&self, primary: &str) -> Vec<String> {
        let inner = self.lock();
        let mut alts: Vec<String> = inner
            .secondaries
            .iter()
            .filter(|(_, p)| p.as_str() == primary)
            .map(|(alt, _)| alt.clone())
            .collect();
        alts.sort();
        alts
    }

    fn primary_of(&self, name: &str) -> Option<String> {
        self.lock().secondaries.get(name).cloned()
    }

    fn remove_account(&self, name: &str, reason: &str, _silent: bool) -> bool {
        let mut inner = self.lock();
        if inner.removal_fails.contains(name) || !inner.records.contains_key(name) {
            return false;
        }
        inner.records.remove(name);
        inner.removed.push((name.to_string(), reason.to_string()));
        inner.tombstones.insert(name.to_string(), 0);
        true
    }

    fn list_shard(&self, letter: char) -> Vec<String> {
        self.lock()
            .records
            .keys()
            .filter(|name| {
                name.chars()
                    .next()
                    .map(|c| c.to_ascii_lowercase() == letter)
                    .unwrap_or(false)
            })
            .cloned()
            .collect()
    }
}

impl TombstoneReaper for MemoryDirectory {
    fn reap(&self, letter: char) -> usize {
        let mut inner = self.lock();
        let expired: Vec<String> = inner
            .tombstones
            .iter()
            .filter(|(name, age)| {
                name.starts_with(letter) && **age > TOMB_RETENTION_SECS
            })
            .map(|(name, _)| name.clone())
            .collect();
        for name in &expired {
            inner.tombstones.remove(name);
        }
        expired.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn snapshot(name: &str, rank: u8) -> AccountSnapshot {
        AccountSnapshot {
            name: name.to_string(),
            last_login: Some(Utc::now() - Duration::days(5)),
            played_seconds: 100,
            experience: [0; 6],
            hold: None,
            rank,
        }
    }

    #[test]
    fn removal_moves_record_to_tombstones() {
        let dir = MemoryDirectory::new();
        dir.insert(snapshot("bob", 0));

        assert!(dir.remove_account("bob", "why", true));
        assert!(!dir.exists("bob"));
        assert_eq!(dir.removed(), vec![("bob".to_string(), "why".to_string())]);
        assert_eq!(dir.tombstone_count(), 1);
    }

    #[test]
    fn forced_removal_failure() {
        let dir = MemoryDirectory::new();
        dir.insert(snapshot("bob", 0));
        dir.fail_removal("bob");

        assert!(!dir.remove_account("bob", "why", true));
        assert!(dir.exists("bob"));
        assert!(dir.removed().is_empty());
    }

    #[test]
    fn mismatched_name_is_malformed() {
        let dir = MemoryDirectory::new();
        dir.insert_as("mallory", snapshot("alice", 0));
        assert!(matches!(
            dir.load_record("mallory"),
            Err(RecordError::Malformed(_))
        ));
    }

    #[test]
    fn reap_honors_retention_and_is_idempotent() {
        let dir = MemoryDirectory::new();
        dir.add_tombstone("bold", TOMB_RETENTION_SECS + 1);
        dir.add_tombstone("bright", 10);

        assert_eq!(dir.reap('b'), 1);
        assert_eq!(dir.reap('b'), 0);
        assert_eq!(dir.tombstone_count(), 1);
    }
}
