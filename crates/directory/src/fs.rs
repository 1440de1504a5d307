//! Filesystem-backed player directory.
//!
//! Layout under the data root:
//! - `players/<letter>/<name>.acct` — one JSON record per account
//! - `players/<letter>/<name>.tomb` — tombstone left by removal
//! - `secondaries.json` — registry of second accounts (alternate → primary)

use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use tracing::{info, warn};
use walkdir::WalkDir;

use sweep_core::{AccountSnapshot, SweepError};

use crate::traits::{PlayerDirectory, RecordError};

/// Extension of live account record files.
pub const RECORD_EXT: &str = "acct";
/// Extension of tombstone marker files.
pub const TOMB_EXT: &str = "tomb";

/// Player directory over a per-letter shard tree.
pub struct FsPlayerDirectory {
    players_dir: PathBuf,
    /// alternate name → primary name, from `secondaries.json`.
    secondaries: HashMap<String, String>,
}

impl FsPlayerDirectory {
    /// Open the directory rooted at `data_dir`, creating the player tree
    /// if it does not exist yet.
    pub fn open(data_dir: &Path) -> Result<Self, SweepError> {
        let players_dir = data_dir.join("players");
        fs::create_dir_all(&players_dir)?;

        let secondaries = match fs::read_to_string(data_dir.join("secondaries.json")) {
            Ok(raw) => serde_json::from_str(&raw).map_err(|e| {
                SweepError::Serialize(format!("secondaries.json: {}", e))
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            players_dir,
            secondaries,
        })
    }

    /// Directory of one leading-letter shard.
    pub fn shard_dir(&self, letter: char) -> PathBuf {
        self.players_dir.join(letter.to_string())
    }

    fn shard_letter(name: &str) -> Option<char> {
        name.chars()
            .next()
            .map(|c| c.to_ascii_lowercase())
            .filter(|c| c.is_ascii_lowercase())
    }

    fn record_path(&self, name: &str) -> Option<PathBuf> {
        let letter = Self::shard_letter(name)?;
        Some(self.shard_dir(letter).join(format!("{}.{}", name, RECORD_EXT)))
    }

    fn tomb_path(&self, name: &str) -> Option<PathBuf> {
        let letter = Self::shard_letter(name)?;
        Some(self.shard_dir(letter).join(format!("{}.{}", name, TOMB_EXT)))
    }
}

impl PlayerDirectory for FsPlayerDirectory {
    fn rank_of(&self, name: &str) -> u8 {
        self.load_record(name).map(|s| s.rank).unwrap_or(0)
    }

    fn exists(&self, name: &str) -> bool {
        self.record_path(name).map(|p| p.exists()).unwrap_or(false)
    }

    fn load_record(&self, name: &str) -> Result<AccountSnapshot, RecordError> {
        let path = self
            .record_path(name)
            .ok_or_else(|| RecordError::Malformed(format!("unshardable name '{}'", name)))?;

        let raw = fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => RecordError::NotFound,
            _ => RecordError::Malformed(format!("unreadable record: {}", e)),
        })?;

        let snapshot: AccountSnapshot = serde_json::from_str(&raw)
            .map_err(|e| RecordError::Malformed(format!("invalid record: {}", e)))?;

        if snapshot.name != name {
            return Err(RecordError::Malformed(format!(
                "embedded name '{}' does not match filename '{}'",
                snapshot.name, name
            )));
        }

        Ok(snapshot)
    }

    fn registered_alternates_of(&self, primary: &str) -> Vec<String> {
        let mut alts: Vec<String> = self
            .secondaries
            .iter()
            .filter(|(_, p)| p.as_str() == primary)
            .map(|(alt, _)| alt.clone())
            .collect();
        alts.sort();
        alts
    }

    fn primary_of(&self, name: &str) -> Option<String> {
        self.secondaries.get(name).cloned()
    }

    fn remove_account(&self, name: &str, reason: &str, silent: bool) -> bool {
        let (Some(record), Some(tomb)) = (self.record_path(name), self.tomb_path(name)) else {
            warn!(name = %name, "cannot remove account with unshardable name");
            return false;
        };

        // Tombstone first, record second. If the record delete fails the
        // tombstone is rolled back, so a failed removal leaves no trace.
        let marker = serde_json::json!({
            "name": name,
            "reason": reason,
            "removed_at": Utc::now(),
        });
        if let Err(e) = fs::write(&tomb, marker.to_string()) {
            warn!(name = %name, error = %e, "failed to write tombstone");
            return false;
        }
        if let Err(e) = fs::remove_file(&record) {
            fs::remove_file(&tomb).ok();
            warn!(name = %name, error = %e, "failed to remove account record");
            return false;
        }

        if !silent {
            info!(name = %name, reason = %reason, "account removed");
        }
        true
    }

    fn list_shard(&self, letter: char) -> Vec<String> {
        let dir = self.shard_dir(letter);
        if !dir.exists() {
            return Vec::new();
        }

        let mut names: Vec<String> = WalkDir::new(&dir)
            .min_depth(1)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == RECORD_EXT).unwrap_or(false))
            .filter_map(|e| {
                e.path()
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(String::from)
            })
            .collect();

        names.sort();
        names
    }
}
