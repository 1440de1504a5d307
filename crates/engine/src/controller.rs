//! Entry point: validation, singleton guard, and session start.
//!
//! `start_purge` is the only operation that can fail before any work
//! happens: the caller must hold the top administrative rank, the argument
//! must be the literal purge target, and no other session may be running.
//! On success the daily log is rotated, a header is written, and the
//! scheduler is spawned; the call returns immediately while the scan
//! proceeds across ticks.

use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tracing::info;

use sweep_core::policy::TOP_RANK;
use sweep_directory::{PlayerDirectory, ShardIterator, TombstoneReaper};
use sweep_notify::{Notifier, ProgressSink};

use crate::scheduler::PurgeScheduler;
use crate::session::PurgeSession;

/// The only accepted argument to the purge command.
pub const PURGE_TARGET: &str = "players";

/// Pre-flight failures. Reported synchronously; no session is created and
/// nothing is written.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("permission denied: purging requires the top administrative rank")]
    PermissionDenied,

    #[error("unknown purge target '{0}' (usage: purge players)")]
    BadArgument(String),

    #[error("a purge session is already running")]
    AlreadyRunning,

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Handle to a started session.
#[derive(Debug)]
pub struct Started {
    pub log_path: PathBuf,
    /// Completion handle for callers that want to wait (the CLI does).
    pub handle: tokio::task::JoinHandle<()>,
}

pub struct PurgeController {
    directory: Arc<dyn PlayerDirectory>,
    reaper: Arc<dyn TombstoneReaper>,
    mailer: Arc<dyn Notifier>,
    log_dir: PathBuf,
    /// Singleton guard: set while a session exists, released by the
    /// scheduler on finalize.
    active: Arc<AtomicBool>,
    tick: Duration,
}

impl PurgeController {
    pub fn new(
        directory: Arc<dyn PlayerDirectory>,
        reaper: Arc<dyn TombstoneReaper>,
        mailer: Arc<dyn Notifier>,
        log_dir: PathBuf,
    ) -> Self {
        Self {
            directory,
            reaper,
            mailer,
            log_dir,
            active: Arc::new(AtomicBool::new(false)),
            tick: sweep_core::policy::TICK_INTERVAL,
        }
    }

    /// Override the scheduler's yield interval (tests).
    pub fn with_tick_interval(mut self, tick: Duration) -> Self {
        self.tick = tick;
        self
    }

    /// Validate and start a purge session. Returns as soon as the first
    /// tick is scheduled.
    pub fn start_purge(
        &self,
        caller: &str,
        sink: &Arc<dyn ProgressSink>,
        argument: &str,
    ) -> Result<Started, StartError> {
        if self.directory.rank_of(caller) < TOP_RANK {
            return Err(StartError::PermissionDenied);
        }
        if argument != PURGE_TARGET {
            return Err(StartError::BadArgument(argument.to_string()));
        }
        if self
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(StartError::AlreadyRunning);
        }

        let log_path = match self.prepare_log(caller) {
            Ok(path) => path,
            Err(e) => {
                // No session was created; release the guard.
                self.active.store(false, Ordering::SeqCst);
                return Err(e.into());
            }
        };

        let session = PurgeSession::new(
            caller,
            Arc::downgrade(sink),
            ShardIterator::new(self.directory.clone()),
            log_path.clone(),
        );
        let scheduler = PurgeScheduler::new(
            self.directory.clone(),
            self.reaper.clone(),
            self.mailer.clone(),
            self.active.clone(),
        )
        .with_tick_interval(self.tick);

        info!(caller = %caller, log = %log_path.display(), "purge session starting");
        let handle = tokio::spawn(scheduler.run(session));

        Ok(Started { log_path, handle })
    }

    /// Rotate any pre-existing log for today to `.old` and write the
    /// session header to a fresh one.
    fn prepare_log(&self, caller: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.log_dir)?;
        let log_path = self
            .log_dir
            .join(format!("purge-{}.log", Utc::now().format("%Y-%m-%d")));

        if log_path.exists() {
            fs::rename(&log_path, log_path.with_extension("log.old"))?;
        }

        fs::write(
            &log_path,
            format!(
                "Idle account purge started {} by {}\n\n",
                Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
                caller
            ),
        )?;
        Ok(log_path)
    }
}
