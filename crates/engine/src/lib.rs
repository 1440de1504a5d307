//! sweep-engine — the purge itself.
//!
//! Control flow: [`PurgeController::start_purge`] validates the caller and
//! the singleton guard, rotates the daily log, and spawns a
//! [`PurgeScheduler`] that drives a [`PurgeSession`] tick by tick: pull a
//! bounded batch from the shard iterator, classify each candidate, route
//! verdicts into the [`ReportAccumulator`], then yield. When the last shard
//! is drained the reaping phase removes aged tombstones, the report is
//! flushed once, and the session is discarded.

pub mod classifier;
pub mod controller;
pub mod report;
pub mod scheduler;
pub mod session;

pub use classifier::{Classifier, SkipReason, Verdict};
pub use controller::{PurgeController, StartError, Started, PURGE_TARGET};
pub use report::{Bucket, ReportAccumulator};
pub use scheduler::PurgeScheduler;
pub use session::{Phase, PurgeSession};
