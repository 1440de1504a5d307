//! Mutable state of one purge run.
//!
//! Exactly one session exists at a time (the controller's guard enforces
//! this); it is owned by the scheduler and touched only by the single
//! active tick. The caller is held weakly — a disconnect mid-run just
//! silences notifications.

use std::path::PathBuf;
use std::sync::Weak;

use chrono::{DateTime, Utc};

use sweep_directory::ShardIterator;
use sweep_notify::ProgressSink;

use crate::report::ReportAccumulator;

/// Where the session is in its lifecycle. The scanning shard index lives
/// in the shard iterator and only moves forward; `Done` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scanning,
    Reaping { shard: usize },
    Done,
}

pub struct PurgeSession {
    /// Who started the purge (for the log header and summaries).
    pub caller_name: String,
    caller: Weak<dyn ProgressSink>,
    pub(crate) shards: ShardIterator,
    pub(crate) phase: Phase,
    pub(crate) report: ReportAccumulator,
    pub(crate) total_tested: u64,
    pub(crate) log_path: PathBuf,
    pub started_at: DateTime<Utc>,
}

impl PurgeSession {
    pub fn new(
        caller_name: &str,
        caller: Weak<dyn ProgressSink>,
        shards: ShardIterator,
        log_path: PathBuf,
    ) -> Self {
        Self {
            caller_name: caller_name.to_string(),
            caller,
            shards,
            phase: Phase::Scanning,
            report: ReportAccumulator::new(),
            total_tested: 0,
            log_path,
            started_at: Utc::now(),
        }
    }

    /// Best-effort delivery to the caller; skipped silently once the
    /// caller is gone.
    pub(crate) fn notify_caller(&self, line: &str) {
        if let Some(sink) = self.caller.upgrade() {
            sink.send(line);
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn total_tested(&self) -> u64 {
        self.total_tested
    }

    pub fn report(&self) -> &ReportAccumulator {
        &self.report
    }

    pub fn log_path(&self) -> &std::path::Path {
        &self.log_path
    }
}
