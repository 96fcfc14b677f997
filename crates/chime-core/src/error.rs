// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Chime reminder daemon.

use thiserror::Error;

/// The primary error type used across Chime's adapter traits and core operations.
#[derive(Debug, Error)]
pub enum ChimeError {
    /// Configuration errors (invalid TOML, missing required fields, type mismatches).
    #[error("configuration error: {0}")]
    Config(String),

    /// Storage backend errors (database connection, query failure, serialization).
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Messenger errors (surface gone, permission denied, platform failure).
    #[error("messenger error: {message}")]
    Messenger {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
