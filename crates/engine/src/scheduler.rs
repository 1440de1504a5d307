//! Cooperative, single-threaded purge driver.
//!
//! One tick does a bounded amount of work — at most
//! [`MAX_BATCH`](sweep_core::policy::MAX_BATCH) candidates — then yields
//! for [`TICK_INTERVAL`](sweep_core::policy::TICK_INTERVAL) so the host can
//! interleave other work. No tick runs concurrently with another: the
//! session is owned by the single `run` task.
//!
//! Phases: scan all 26 shards, then reap tombstones one shard per tick,
//! then finalize (flush the report, summarize to the caller, release the
//! singleton guard).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use sweep_core::policy::{self, MAX_BATCH, TICK_INTERVAL};
use sweep_directory::{PlayerDirectory, TombstoneReaper, SHARD_LETTERS};
use sweep_notify::{Notification, Notifier};

use crate::classifier::{Classifier, Verdict};
use crate::report::Bucket;
use crate::session::{Phase, PurgeSession};

pub struct PurgeScheduler {
    directory: Arc<dyn PlayerDirectory>,
    reaper: Arc<dyn TombstoneReaper>,
    mailer: Arc<dyn Notifier>,
    classifier: Classifier,
    /// The controller's singleton guard, released when the session ends.
    guard: Arc<AtomicBool>,
    tick: Duration,
}

impl PurgeScheduler {
    pub fn new(
        directory: Arc<dyn PlayerDirectory>,
        reaper: Arc<dyn TombstoneReaper>,
        mailer: Arc<dyn Notifier>,
        guard: Arc<AtomicBool>,
    ) -> Self {
        let classifier = Classifier::new(directory.clone());
        Self {
            directory,
            reaper,
            mailer,
            classifier,
            guard,
            tick: TICK_INTERVAL,
        }
    }

    /// Override the yield interval (tests).
    pub fn with_tick_interval(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Drive the session to completion, yielding between ticks.
    pub async fn run(self, mut session: PurgeSession) {
        info!(caller = %session.caller_name, "purge session started");
        loop {
            if self.step(&mut session).await {
                break;
            }
            tokio::time::sleep(self.tick).await;
        }
        info!(
            tested = session.total_tested,
            purged = session.report.count(Bucket::Purged),
            "purge session finished"
        );
    }

    /// Execute one tick. Returns true once the session is done.
    pub async fn step(&self, session: &mut PurgeSession) -> bool {
        match session.phase {
            Phase::Scanning => {
                self.scan_tick(session).await;
                false
            }
            Phase::Reaping { shard } => self.reap_tick(session, shard),
            Phase::Done => true,
        }
    }

    async fn scan_tick(&self, session: &mut PurgeSession) {
        let letter = session.shards.shard_letter();
        let batch = session.shards.next_batch(MAX_BATCH);
        let now = Utc::now();

        for name in &batch.names {
            let outcome = self.directory.load_record(name);
            let verdict = self.classifier.classify(name, &outcome, now);
            self.apply_verdict(session, name, verdict).await;
            session.total_tested += 1;
        }

        session.notify_caller(&format!(
            "purge [shard {}]: {} tested, {}",
            letter,
            session.total_tested,
            session.report.totals_line()
        ));

        if session.shards.finished() {
            debug!("scan complete, entering reaping phase");
            session.phase = Phase::Reaping { shard: 0 };
        }
    }

    fn reap_tick(&self, session: &mut PurgeSession, shard: usize) -> bool {
        let letter = SHARD_LETTERS[shard];
        let reaped = self.reaper.reap(letter);
        session.report.add_reaped(reaped);

        if shard + 1 == SHARD_LETTERS.len() {
            self.finalize(session);
            session.phase = Phase::Done;
            return true;
        }
        session.phase = Phase::Reaping { shard: shard + 1 };
        false
    }

    async fn apply_verdict(&self, session: &mut PurgeSession, name: &str, verdict: Verdict) {
        match verdict {
            Verdict::Anomalous(reason) => {
                session
                    .report
                    .append(Bucket::Anomalous, format!("{}: {}", name, reason));
            }
            Verdict::Ghost => {
                // Creation never completed; removed regardless of any
                // other rule.
                if self
                    .directory
                    .remove_account(name, policy::REMOVAL_REASON, true)
                {
                    session
                        .report
                        .append(Bucket::Purged, format!("{}: never completed creation", name));
                } else {
                    warn!(name = %name, "failed to remove ghost account");
                }
            }
            Verdict::Skip(_) => {}
            Verdict::WizardIdle { rank, idle_days } => {
                session.report.append(
                    Bucket::PrivilegedIdle,
                    format!("{}: rank {}, idle {} days", name, rank, idle_days),
                );
            }
            Verdict::ProtectedIdle {
                idle_days,
                played_minutes,
            } => {
                session.report.append(
                    Bucket::Protected,
                    format!(
                        "{}: idle {} days, played {} minutes",
                        name, idle_days, played_minutes
                    ),
                );
            }
            Verdict::ProtectedSecond { primary, idle_days } => {
                session.report.append(
                    Bucket::Protected,
                    format!(
                        "{}: idle {} days, registered second of {}",
                        name, idle_days, primary
                    ),
                );
                self.notify_primary(name, &primary).await;
            }
            Verdict::Purgeable { idle_days } => {
                // Removal failure just excludes the account from the
                // purged count; no retry this run.
                if self
                    .directory
                    .remove_account(name, policy::REMOVAL_REASON, true)
                {
                    session
                        .report
                        .append(Bucket::Purged, format!("{}: idle {} days", name, idle_days));
                } else {
                    warn!(name = %name, "removal failed, excluded from purge count");
                }
            }
        }
    }

    async fn notify_primary(&self, second: &str, primary: &str) {
        let notification = Notification {
            to: primary.to_string(),
            subject: "Idle purge: second account spared".to_string(),
            body: format!(
                "Your registered second account '{}' was idle enough to purge \
                 but has been protected because it is registered to you.",
                second
            ),
        };
        if let Err(e) = self.mailer.send(&notification).await {
            warn!(to = %primary, error = %e, "failed to notify primary");
        }
    }

    fn finalize(&self, session: &mut PurgeSession) {
        if let Err(e) = session.report.flush(&session.log_path) {
            error!(path = %session.log_path.display(), error = %e, "failed to flush purge report");
        }

        session.notify_caller(&format!(
            "purge complete: {} files tested, {}, {} tombstones reaped",
            session.total_tested,
            session.report.totals_line(),
            session.report.reaped()
        ));

        self.guard.store(false, Ordering::SeqCst);
    }
}
