// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde attributes,
//! such as resolvable timezone names, non-empty paths, and non-zero intervals.

use crate::diagnostic::ConfigError;
use crate::model::ChimeConfig;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ChimeConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    // Validate log_level is a known tracing level
    let level = config.daemon.log_level.trim();
    if !LOG_LEVELS.contains(&level) {
        errors.push(ConfigError::Validation {
            message: format!(
                "daemon.log_level `{level}` is not one of trace, debug, info, warn, error"
            ),
        });
    }

    // Validate pass intervals are non-zero
    if config.scheduler.one_shot_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "scheduler.one_shot_interval_secs must be greater than zero".to_string(),
        });
    }

    if config.scheduler.recurring_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "scheduler.recurring_interval_secs must be greater than zero".to_string(),
        });
    }

    if config.scheduler.purge_interval_secs == 0 {
        errors.push(ConfigError::Validation {
            message: "scheduler.purge_interval_secs must be greater than zero".to_string(),
        });
    }

    // Validate database_path is not empty
    if config.storage.database_path.trim().is_empty() {
        errors.push(ConfigError::Validation {
            message: "storage.database_path must not be empty".to_string(),
        });
    }

    // Validate default_timezone resolves to a real IANA zone
    let tz = config.time.default_timezone.trim();
    if tz.parse::<chrono_tz::Tz>().is_err() {
        errors.push(ConfigError::Validation {
            message: format!("time.default_timezone `{tz}` is not a known IANA timezone"),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
