// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Chime reminder daemon.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Chime configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable overrides.
/// All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChimeConfig {
    /// Daemon identity and logging settings.
    #[serde(default)]
    pub daemon: DaemonConfig,

    /// Delivery pass cadence settings.
    #[serde(default)]
    pub scheduler: SchedulerConfig,

    /// Storage backend settings.
    #[serde(default)]
    pub storage: StorageConfig,

    /// Time and timezone settings.
    #[serde(default)]
    pub time: TimeConfig,
}

/// Daemon identity and logging configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct DaemonConfig {
    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Delivery pass cadence configuration.
///
/// Each pass runs on its own interval. The recurring pass is deliberately
/// slower than the one-shot pass; occurrences are computed from persisted
/// rule sets, so a late pass delivers the elapsed occurrence rather than
/// dropping it.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SchedulerConfig {
    /// Seconds between one-shot delivery passes.
    #[serde(default = "default_one_shot_interval_secs")]
    pub one_shot_interval_secs: u64,

    /// Seconds between recurring delivery passes.
    #[serde(default = "default_recurring_interval_secs")]
    pub recurring_interval_secs: u64,

    /// Seconds between orphan purge passes.
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            one_shot_interval_secs: default_one_shot_interval_secs(),
            recurring_interval_secs: default_recurring_interval_secs(),
            purge_interval_secs: default_purge_interval_secs(),
        }
    }
}

fn default_one_shot_interval_secs() -> u64 {
    60
}

fn default_recurring_interval_secs() -> u64 {
    120
}

fn default_purge_interval_secs() -> u64 {
    3600 // 1 hour
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct StorageConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// Enable WAL (Write-Ahead Logging) mode for SQLite.
    #[serde(default = "default_wal_mode")]
    pub wal_mode: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            wal_mode: default_wal_mode(),
        }
    }
}

fn default_database_path() -> String {
    dirs::data_dir()
        .map(|p| p.join("chime").join("chime.db"))
        .unwrap_or_else(|| std::path::PathBuf::from("chime.db"))
        .to_string_lossy()
        .into_owned()
}

fn default_wal_mode() -> bool {
    true
}

/// Time and timezone configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct TimeConfig {
    /// IANA timezone name used to resolve temporal expressions that carry
    /// no explicit timezone of their own.
    #[serde(default = "default_timezone")]
    pub default_timezone: String,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            default_timezone: default_timezone(),
        }
    }
}

fn default_timezone() -> String {
    "UTC".to_string()
}
