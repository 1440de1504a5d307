//! Classification of one account snapshot into a purge verdict.
//!
//! The decision tree is evaluated in a fixed order, first match wins:
//! anomalous, ghost, hold, privileged (flag or skip), activity exemptions,
//! registered second, purgeable. All threshold comparisons are strict, so
//! an account sitting exactly on a boundary is not exempted by it.
//!
//! `classify` never acts on anything — it is a pure function of the
//! snapshot, the clock, and the directory's rank/second relationships. The
//! scheduler performs removals and notifications based on the verdict.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use sweep_core::{policy, AccountSnapshot};
use sweep_directory::{PlayerDirectory, RecordError};

/// Why an account was skipped without appearing in any report bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Active suspension or self-imposed lock.
    Hold,
    /// Privileged (directly or as a junior alt) but not idle long enough
    /// to flag.
    PrivilegedRecent,
}

/// Outcome of classifying one candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Unreadable record or embedded-name mismatch. Logged for manual
    /// review, never acted on automatically.
    Anomalous(String),
    /// Readable record with no last login — creation never completed.
    /// Removed immediately.
    Ghost,
    /// Silent skip; no bucket, no counter.
    Skip(SkipReason),
    /// Privileged account idle over the advisory threshold. Never removed.
    WizardIdle { rank: u8, idle_days: i64 },
    /// Ordinary account exempted by one of the activity rules.
    ProtectedIdle { idle_days: i64, played_minutes: i64 },
    /// Registered second of a privileged account. The primary is notified.
    ProtectedSecond { primary: String, idle_days: i64 },
    /// No exemption applied; eligible for removal.
    Purgeable { idle_days: i64 },
}

/// Pure verdict function over account snapshots.
pub struct Classifier {
    directory: Arc<dyn PlayerDirectory>,
}

impl Classifier {
    pub fn new(directory: Arc<dyn PlayerDirectory>) -> Self {
        Self { directory }
    }

    /// Classify the record loaded for `name` (the filename stem).
    pub fn classify(
        &self,
        name: &str,
        outcome: &Result<AccountSnapshot, RecordError>,
        now: DateTime<Utc>,
    ) -> Verdict {
        let snapshot = match outcome {
            Ok(s) => s,
            Err(RecordError::NotFound) => {
                return Verdict::Anomalous("record vanished before evaluation".to_string());
            }
            Err(RecordError::Malformed(reason)) => {
                return Verdict::Anomalous(reason.clone());
            }
        };

        if snapshot.name != name {
            return Verdict::Anomalous(format!(
                "embedded name '{}' does not match filename '{}'",
                snapshot.name, name
            ));
        }

        let Some(idle) = snapshot.idle(now) else {
            return Verdict::Ghost;
        };

        if snapshot.has_active_hold(now) {
            return Verdict::Skip(SkipReason::Hold);
        }

        let idle_secs = idle.num_seconds();
        let idle_days = idle.num_days();

        // A junior alt borrows its base's privilege but is never flagged.
        let is_junior = policy::junior_base(name)
            .map(|base| self.directory.rank_of(base) > 0)
            .unwrap_or(false);

        if snapshot.rank > 0 || is_junior {
            if idle_secs > policy::WIZARD_IDLE_SECS && !is_junior {
                return Verdict::WizardIdle {
                    rank: snapshot.rank,
                    idle_days,
                };
            }
            return Verdict::Skip(SkipReason::PrivilegedRecent);
        }

        // The average-stat proxy backstops records whose played clock was
        // never kept.
        let played_secs = (snapshot.played_seconds as i64).max(snapshot.average_experience() as i64);

        if policy::is_activity_exempt(idle_secs, played_secs) {
            return Verdict::ProtectedIdle {
                idle_days,
                played_minutes: played_secs / 60,
            };
        }

        if let Some(primary) = self.directory.primary_of(name) {
            if self.directory.rank_of(&primary) > 0 {
                return Verdict::ProtectedSecond { primary, idle_days };
            }
        }

        Verdict::Purgeable { idle_days }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use sweep_core::{Hold, HoldKind};
    use sweep_directory::MemoryDirectory;

    const DAY_SECS: u64 = 86_400;

    fn snapshot(name: &str) -> AccountSnapshot {
        AccountSnapshot {
            name: name.to_string(),
            last_login: Some(Utc::now()),
            played_seconds: 0,
            experience: [0; 6],
            hold: None,
            rank: 0,
        }
    }

    struct Fixture {
        directory: Arc<MemoryDirectory>,
        classifier: Classifier,
        now: DateTime<Utc>,
    }

    impl Fixture {
        fn new() -> Self {
            let directory = Arc::new(MemoryDirectory::new());
            let classifier = Classifier::new(directory.clone());
            Self {
                directory,
                classifier,
                now: Utc::now(),
            }
        }

        fn classify(&self, snap: AccountSnapshot) -> Verdict {
            let name = snap.name.clone();
            self.classifier.classify(&name, &Ok(snap), self.now)
        }

        fn idle(&self, snap: &mut AccountSnapshot, days: i64) {
            snap.last_login = Some(self.now - Duration::days(days));
        }
    }

    // ── Representative accounts ─────────────────────────────────────

    #[test]
    fn long_idle_low_activity_account_is_purgeable() {
        let fx = Fixture::new();
        let mut snap = snapshot("bob");
        fx.idle(&mut snap, 366);
        snap.played_seconds = 2 * 60;
        snap.experience = [10, 5, 0, 0, 0, 3];

        assert_eq!(fx.classify(snap), Verdict::Purgeable { idle_days: 366 });
    }

    #[test]
    fn idle_wizard_is_flagged_not_removed() {
        let fx = Fixture::new();
        let mut snap = snapshot("arch1");
        snap.rank = 5;
        fx.idle(&mut snap, 400);

        assert_eq!(
            fx.classify(snap),
            Verdict::WizardIdle {
                rank: 5,
                idle_days: 400
            }
        );
    }

    #[test]
    fn recently_active_newbie_is_protected() {
        let fx = Fixture::new();
        let mut snap = snapshot("newbie2");
        fx.idle(&mut snap, 10);
        snap.played_seconds = 5 * 60;

        assert_eq!(
            fx.classify(snap),
            Verdict::ProtectedIdle {
                idle_days: 10,
                played_minutes: 5
            }
        );
    }

    #[test]
    fn name_mismatch_is_anomalous() {
        let fx = Fixture::new();
        let snap = snapshot("alice");
        let verdict = fx.classifier.classify("mallory", &Ok(snap), fx.now);
        assert!(matches!(verdict, Verdict::Anomalous(_)));
    }

    #[test]
    fn second_of_a_wizard_is_protected() {
        let fx = Fixture::new();
        let mut merlin = snapshot("merlin");
        merlin.rank = 3;
        fx.directory.insert(merlin);
        fx.directory.register_second("altchar", "merlin");

        let mut snap = snapshot("altchar");
        fx.idle(&mut snap, 500);

        assert_eq!(
            fx.classify(snap),
            Verdict::ProtectedSecond {
                primary: "merlin".to_string(),
                idle_days: 500
            }
        );
    }

    // ── Rule order and skips ────────────────────────────────────────

    #[test]
    fn malformed_record_is_anomalous() {
        let fx = Fixture::new();
        let verdict = fx.classifier.classify(
            "junk",
            &Err(RecordError::Malformed("invalid record".to_string())),
            fx.now,
        );
        assert!(matches!(verdict, Verdict::Anomalous(_)));
    }

    #[test]
    fn no_last_login_is_a_ghost_even_when_held() {
        // Ghost is decided before the hold rule.
        let fx = Fixture::new();
        let mut snap = snapshot("halfmade");
        snap.last_login = None;
        snap.hold = Some(Hold {
            kind: HoldKind::Suspended,
            until: None,
        });

        assert_eq!(fx.classify(snap), Verdict::Ghost);
    }

    #[test]
    fn active_hold_is_silently_skipped() {
        let fx = Fixture::new();
        let mut snap = snapshot("benched");
        fx.idle(&mut snap, 900);
        snap.hold = Some(Hold {
            kind: HoldKind::SelfLocked,
            until: Some(fx.now + Duration::days(30)),
        });

        assert_eq!(fx.classify(snap), Verdict::Skip(SkipReason::Hold));
    }

    #[test]
    fn expired_hold_does_not_protect() {
        let fx = Fixture::new();
        let mut snap = snapshot("exheld");
        fx.idle(&mut snap, 900);
        snap.hold = Some(Hold {
            kind: HoldKind::Suspended,
            until: Some(fx.now - Duration::days(1)),
        });

        assert_eq!(fx.classify(snap), Verdict::Purgeable { idle_days: 900 });
    }

    #[test]
    fn recent_wizard_is_skipped_without_a_verdict() {
        let fx = Fixture::new();
        let mut snap = snapshot("arch2");
        snap.rank = 2;
        fx.idle(&mut snap, 100);

        assert_eq!(fx.classify(snap), Verdict::Skip(SkipReason::PrivilegedRecent));
    }

    #[test]
    fn junior_alt_of_a_wizard_is_never_flagged() {
        let fx = Fixture::new();
        let mut merlin = snapshot("merlin");
        merlin.rank = 3;
        fx.directory.insert(merlin);

        let mut snap = snapshot("merlinjr");
        fx.idle(&mut snap, 800);

        assert_eq!(fx.classify(snap), Verdict::Skip(SkipReason::PrivilegedRecent));
    }

    #[test]
    fn jr_suffix_without_privileged_base_is_ordinary() {
        let fx = Fixture::new();
        let mut snap = snapshot("bobjr");
        fx.idle(&mut snap, 800);

        assert_eq!(fx.classify(snap), Verdict::Purgeable { idle_days: 800 });
    }

    #[test]
    fn second_of_an_ordinary_account_is_not_protected() {
        let fx = Fixture::new();
        fx.directory.insert(snapshot("norm"));
        fx.directory.register_second("altchar", "norm");

        let mut snap = snapshot("altchar");
        fx.idle(&mut snap, 500);

        assert_eq!(fx.classify(snap), Verdict::Purgeable { idle_days: 500 });
    }

    // ── Boundaries (strict comparisons) ─────────────────────────────

    #[test]
    fn wizard_idle_boundary_is_strict() {
        let fx = Fixture::new();
        let mut snap = snapshot("arch3");
        snap.rank = 4;
        snap.last_login = Some(fx.now - Duration::seconds(sweep_core::policy::WIZARD_IDLE_SECS));

        // Exactly 365 days idle is not "over" the threshold.
        assert_eq!(fx.classify(snap), Verdict::Skip(SkipReason::PrivilegedRecent));
    }

    #[test]
    fn veteran_exemption_boundary_is_strict() {
        let fx = Fixture::new();
        // Exactly one hour played, idle well under a year, no other exemption.
        let mut snap = snapshot("edge");
        snap.played_seconds = 60 * 60;
        // Far enough out that the grace rule (3 days per minute = 180 days
        // for an hour) does not apply either.
        fx.idle(&mut snap, 200);

        assert_eq!(fx.classify(snap), Verdict::Purgeable { idle_days: 200 });
    }

    #[test]
    fn stat_proxy_backstops_missing_played_time() {
        let fx = Fixture::new();
        let mut snap = snapshot("oldtimer");
        snap.played_seconds = 0;
        // Average experience of 7200 stands in for two hours of play.
        snap.experience = [7200; 6];
        fx.idle(&mut snap, 100);

        assert_eq!(
            fx.classify(snap),
            Verdict::ProtectedIdle {
                idle_days: 100,
                played_minutes: 120
            }
        );
    }

    #[test]
    fn classify_is_deterministic() {
        let fx = Fixture::new();
        let mut snap = snapshot("same");
        fx.idle(&mut snap, 366);
        snap.played_seconds = 30;

        let first = fx.classify(snap.clone());
        let second = fx.classify(snap);
        assert_eq!(first, second);
    }

    #[test]
    fn grace_days_follow_played_minutes() {
        let fx = Fixture::new();

        // 100 minutes played earns 300 days of grace.
        let mut snap = snapshot("grace");
        snap.played_seconds = 100 * 60;
        snap.last_login = Some(fx.now - Duration::seconds(300 * DAY_SECS as i64 - 1));
        assert!(matches!(
            fx.classify(snap.clone()),
            Verdict::ProtectedIdle { .. }
        ));

        // Exactly at the grace boundary: not exempt (and over both fixed
        // idle windows), so it falls through.
        snap.last_login = Some(fx.now - Duration::seconds(400 * DAY_SECS as i64));
        assert!(matches!(fx.classify(snap), Verdict::Purgeable { .. }));
    }
}
