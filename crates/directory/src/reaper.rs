//! Tombstone reaping — the purge's second phase.
//!
//! Removal leaves a `.tomb` marker behind so a deleted name can be
//! recognized for a while. Markers older than the retention window are
//! deleted here, one shard letter at a time.

use std::fs;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use tracing::{debug, warn};
use walkdir::WalkDir;

use sweep_core::policy::TOMB_RETENTION_SECS;

use crate::fs::TOMB_EXT;
use crate::traits::TombstoneReaper;

/// Removes tombstone files past their retention window.
pub struct DeletedFileReaper {
    players_dir: PathBuf,
    retention: Duration,
}

impl DeletedFileReaper {
    pub fn new(data_dir: &std::path::Path) -> Self {
        Self {
            players_dir: data_dir.join("players"),
            retention: Duration::from_secs(TOMB_RETENTION_SECS),
        }
    }

    /// Override the retention window (tests).
    pub fn with_retention(mut self, retention: Duration) -> Self {
        self.retention = retention;
        self
    }
}

impl TombstoneReaper for DeletedFileReaper {
    fn reap(&self, letter: char) -> usize {
        let dir = self.players_dir.join(letter.to_string());
        if !dir.exists() {
            return 0;
        }

        let now = SystemTime::now();
        let mut reaped = 0;

        for entry in WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == TOMB_EXT).unwrap_or(false))
        {
            let path = entry.path();
            let age = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .and_then(|mtime| now.duration_since(mtime).ok());

            // Unreadable metadata counts as not-reaped, never fatal.
            let Some(age) = age else {
                warn!(path = %path.display(), "could not read tombstone age");
                continue;
            };

            if age > self.retention {
                match fs::remove_file(path) {
                    Ok(()) => reaped += 1,
                    Err(e) => {
                        warn!(path = %path.display(), error = %e, "failed to reap tombstone");
                    }
                }
            }
        }

        if reaped > 0 {
            debug!(shard = %letter, reaped, "reaped tombstones");
        }
        reaped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    fn touch_tomb(root: &std::path::Path, letter: char, name: &str) -> PathBuf {
        let dir = root.join("players").join(letter.to_string());
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join(format!("{}.{}", name, TOMB_EXT));
        File::create(&path).unwrap();
        path
    }

    #[test]
    fn fresh_tombstones_are_kept() {
        let tmp = TempDir::new().unwrap();
        let path = touch_tomb(tmp.path(), 'b', "bob");

        let reaper = DeletedFileReaper::new(tmp.path());
        assert_eq!(reaper.reap('b'), 0);
        assert!(path.exists());
    }

    #[test]
    fn aged_tombstones_are_reaped() {
        let tmp = TempDir::new().unwrap();
        let path = touch_tomb(tmp.path(), 'b', "bob");

        // Zero retention makes any mtime "aged".
        let reaper = DeletedFileReaper::new(tmp.path()).with_retention(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(reaper.reap('b'), 1);
        assert!(!path.exists());
    }

    #[test]
    fn reap_is_idempotent() {
        let tmp = TempDir::new().unwrap();
        touch_tomb(tmp.path(), 'b', "bob");

        let reaper = DeletedFileReaper::new(tmp.path()).with_retention(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(reaper.reap('b'), 1);
        // Second pass finds nothing and does not error.
        assert_eq!(reaper.reap('b'), 0);
    }

    #[test]
    fn record_files_are_never_touched() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("players").join("b");
        fs::create_dir_all(&dir).unwrap();
        let record = dir.join("bob.acct");
        File::create(&record).unwrap();

        let reaper = DeletedFileReaper::new(tmp.path()).with_retention(Duration::ZERO);
        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(reaper.reap('b'), 0);
        assert!(record.exists());
    }

    #[test]
    fn missing_shard_directory_reaps_nothing() {
        let tmp = TempDir::new().unwrap();
        let reaper = DeletedFileReaper::new(tmp.path());
        assert_eq!(reaper.reap('q'), 0);
    }
}
