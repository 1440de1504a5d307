//! Purge policy: every threshold the classifier and reaper compare against,
//! as named constants. All comparisons are strict — an account sitting
//! exactly on a boundary is not exempted by it.

const DAY_SECS: i64 = 86_400;

/// Maximum candidates evaluated per scheduling tick.
pub const MAX_BATCH: usize = 50;

/// Cooperative yield between ticks.
pub const TICK_INTERVAL: std::time::Duration = std::time::Duration::from_secs(2);

/// Privileged accounts idle longer than this are flagged (advisory only).
pub const WIZARD_IDLE_SECS: i64 = 365 * DAY_SECS;

/// Exemption pair 1: veterans. Played over an hour and idle under a year.
pub const VETERAN_PLAYED_SECS: i64 = 60 * 60;
pub const VETERAN_IDLE_SECS: i64 = 365 * DAY_SECS;

/// Exemption pair 2: casuals. Played over ten minutes and idle under 180 days.
pub const CASUAL_PLAYED_SECS: i64 = 10 * 60;
pub const CASUAL_IDLE_SECS: i64 = 180 * DAY_SECS;

/// Exemption 3: each minute of play earns three days of idle grace.
/// Expressed as a seconds ratio: idle_secs < played_secs * GRACE_PER_PLAYED.
pub const GRACE_PER_PLAYED: i64 = 3 * DAY_SECS / 60;

/// Tombstone files older than this are reaped.
pub const TOMB_RETENTION_SECS: u64 = 365 * DAY_SECS as u64;

/// Naming convention for throwaway aliases of privileged accounts:
/// `<base>jr` where `<base>` is privileged.
pub const JUNIOR_SUFFIX: &str = "jr";

/// Rank required to start a purge.
pub const TOP_RANK: u8 = 5;

/// Reason tag recorded when the purge removes an account.
pub const REMOVAL_REASON: &str = "inactive account purge";

/// The base name a junior alt is derived from, if `name` follows the
/// convention. The caller still has to check the base's rank.
pub fn junior_base(name: &str) -> Option<&str> {
    name.strip_suffix(JUNIOR_SUFFIX).filter(|base| !base.is_empty())
}

/// Whether an ordinary account's activity exempts it from the purge.
/// Inputs in seconds; all comparisons strict.
pub fn is_activity_exempt(idle_secs: i64, played_secs: i64) -> bool {
    (played_secs > VETERAN_PLAYED_SECS && idle_secs < VETERAN_IDLE_SECS)
        || (played_secs > CASUAL_PLAYED_SECS && idle_secs < CASUAL_IDLE_SECS)
        || idle_secs < played_secs.saturating_mul(GRACE_PER_PLAYED)
}
