// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chime delete`: remove a reminder before it becomes due.

use chime_config::model::ChimeConfig;
use chime_core::error::ChimeError;
use chime_core::traits::ReminderStore;
use chime_core::types::ReminderId;
use chime_storage::SqliteReminderStore;

pub async fn run_delete(raw_id: &str, config: &ChimeConfig) -> Result<(), ChimeError> {
    let id: ReminderId = raw_id
        .parse()
        .map_err(|e| ChimeError::Config(format!("`{raw_id}` is not a reminder id: {e}")))?;

    let store = SqliteReminderStore::open(&config.storage).await?;
    store.delete(id).await?;
    store.close().await?;

    // Deleting an unknown id is a no-op by contract, so this reports the
    // request rather than a row count.
    println!("deleted reminder {id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_ids_are_rejected_before_touching_storage() {
        let err = "definitely-not-a-uuid"
            .parse::<ReminderId>()
            .map_err(|e| ChimeError::Config(format!("`x` is not a reminder id: {e}")))
            .unwrap_err();
        assert!(matches!(err, ChimeError::Config(_)));
    }

    #[test]
    fn well_formed_ids_parse() {
        let id = ReminderId::new();
        assert_eq!(id.to_string().parse::<ReminderId>().unwrap(), id);
    }
}
