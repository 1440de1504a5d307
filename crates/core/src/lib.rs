//! sweep-core — shared domain types for the idle-account purge.
//!
//! This crate holds everything the other crates agree on:
//! - [`AccountSnapshot`]: the typed view of one persisted account record
//! - [`policy`]: the purge thresholds as named constants
//! - [`Config`]: environment-driven configuration
//! - [`SweepError`]: the shared error type

pub mod account;
pub mod config;
pub mod error;
pub mod policy;

pub use account::{AccountSnapshot, Hold, HoldKind};
pub use config::{load_dotenv, Config};
pub use error::SweepError;
