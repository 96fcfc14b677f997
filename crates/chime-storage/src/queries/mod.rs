// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Query modules for CRUD operations on the reminder tables.

pub mod one_shot;
pub mod recurring;

use chime_core::types::ReminderId;
use chrono::{DateTime, Utc};

/// Decode an epoch-seconds column into an instant.
pub(crate) fn instant_from_epoch(idx: usize, secs: i64) -> Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::from_timestamp(secs, 0).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Integer,
            format!("epoch seconds out of range: {secs}").into(),
        )
    })
}

/// Decode a uuid TEXT column.
pub(crate) fn id_from_text(idx: usize, text: String) -> Result<ReminderId, rusqlite::Error> {
    uuid::Uuid::parse_str(&text)
        .map(ReminderId)
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}
