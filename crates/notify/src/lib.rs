//! Notification delivery for the purge.
//!
//! This crate provides:
//! - `Notifier` trait for mail delivery to accounts (wizards whose seconds
//!   were spared)
//! - SMTP implementation via `lettre`, log-only fallback, and an in-memory
//!   recorder for tests
//! - `ProgressSink` trait for best-effort progress lines to the caller who
//!   started the purge

pub mod email;
pub mod memory;
pub mod traits;

pub use email::EmailNotifier;
pub use memory::{LogNotifier, MemoryNotifier, MemorySink};
pub use traits::{Notification, Notifier, NotifyError, ProgressSink};
