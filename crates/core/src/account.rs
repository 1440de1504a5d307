//! Typed view of one persisted account record.
//!
//! Account records live one-per-file as JSON under per-letter shard
//! directories. Only the fields the purge reads are modeled here; the live
//! game keeps more, but this crate never writes records back.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Why an account is administratively held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HoldKind {
    /// Suspended by an administrator.
    Suspended,
    /// Self-imposed lockout requested by the player.
    SelfLocked,
}

/// An administrative hold on an account. Held accounts are skipped by the
/// purge without appearing in any report bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hold {
    pub kind: HoldKind,
    /// When the hold expires. `None` means indefinite.
    pub until: Option<DateTime<Utc>>,
}

impl Hold {
    /// Whether the hold is still in force at `now`.
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        match self.until {
            Some(until) => until > now,
            None => true,
        }
    }
}

/// Read-only snapshot of one account record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountSnapshot {
    /// Account name. Must match the filename stem of the record it was
    /// loaded from; a mismatch is a malformed record.
    pub name: String,

    /// Last successful login. `None` means creation never completed.
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,

    /// Accumulated in-game active time, in seconds.
    #[serde(default)]
    pub played_seconds: u64,

    /// Experience values for the six core stats.
    #[serde(default)]
    pub experience: [u64; 6],

    /// Active suspension or self-lock, if any.
    #[serde(default)]
    pub hold: Option<Hold>,

    /// Privilege rank. 0 = ordinary account.
    #[serde(default)]
    pub rank: u8,
}

impl AccountSnapshot {
    /// Played duration as a `chrono::Duration`.
    pub fn played(&self) -> Duration {
        Duration::seconds(self.played_seconds as i64)
    }

    /// Average of the six core-stat experience values.
    pub fn average_experience(&self) -> u64 {
        self.experience.iter().sum::<u64>() / self.experience.len() as u64
    }

    /// Whether the account carries a hold that is active at `now`.
    pub fn has_active_hold(&self, now: DateTime<Utc>) -> bool {
        self.hold.map(|h| h.is_active(now)).unwrap_or(false)
    }

    /// Idle duration at `now`, or `None` for ghost accounts that never
    /// completed a login.
    pub fn idle(&self, now: DateTime<Utc>) -> Option<Duration> {
        self.last_login.map(|last| now - last)
    }
}
