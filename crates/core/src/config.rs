use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

fn env_u16(key: &str, default: u16) -> u16 {
    env_opt(key).and_then(|v| v.parse().ok()).unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub storage: StorageConfig,
    pub smtp: SmtpConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    pub fn from_env() -> Self {
        Self {
            storage: StorageConfig::from_env(),
            smtp: SmtpConfig::from_env(),
        }
    }
}

// ── Storage ───────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Root of the player data tree (shard directories live under
    /// `<data_dir>/players`).
    pub data_dir: PathBuf,
    /// Directory for daily purge logs.
    pub log_dir: PathBuf,
}

impl StorageConfig {
    pub fn from_env() -> Self {
        Self {
            data_dir: PathBuf::from(env_or("SWEEP_DATA_DIR", "./data")),
            log_dir: PathBuf::from(env_or("SWEEP_LOG_DIR", "./log")),
        }
    }
}

// ── SMTP / mail ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP relay host. Empty disables mail delivery (falls back to
    /// log-only notifications).
    pub host: Option<String>,
    pub port: u16,
    /// Sender address for purge notifications.
    pub from: String,
    /// Domain appended to account names when mailing them.
    pub mail_domain: String,
}

impl SmtpConfig {
    pub fn from_env() -> Self {
        Self {
            host: env_opt("SWEEP_SMTP_HOST"),
            port: env_u16("SWEEP_SMTP_PORT", 587),
            from: env_or("SWEEP_SMTP_FROM", "purge@localhost"),
            mail_domain: env_or("SWEEP_MAIL_DOMAIN", "localhost"),
        }
    }
}
