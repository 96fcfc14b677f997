// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `chime parse` command implementation.
//!
//! Resolver debugging from the command line: feed a temporal expression
//! through the same pipeline the daemon uses and print what came out. For
//! recurrence phrases the normalized rule is printed too, so an operator can
//! see exactly what would be persisted.

use chrono::{DateTime, Utc};

use chime_config::model::ChimeConfig;
use chime_core::error::ChimeError;
use chime_temporal::tz::resolve_timezone;
use chime_temporal::{classify_instant, parse, ParseOutcome};

/// Runs the `chime parse` command.
///
/// `timezone` falls back to the configured default; `now` falls back to the
/// wall clock. This is the only place the resolver is handed a live instant.
pub fn run_parse(
    text: &str,
    timezone: Option<&str>,
    now: Option<&str>,
    config: &ChimeConfig,
) -> Result<(), ChimeError> {
    let zone_name = timezone.unwrap_or(&config.time.default_timezone);
    let zone = resolve_timezone(zone_name)
        .ok_or_else(|| ChimeError::Config(format!("unknown timezone `{zone_name}`")))?;

    let now = match now {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map_err(|e| ChimeError::Config(format!("--now must be RFC 3339: {e}")))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };

    let result = parse(text, now, zone);
    match result.outcome {
        ParseOutcome::Absolute(instant) => {
            let class = classify_instant(instant, now);
            println!("absolute: {} ({class})", instant.to_rfc3339());
            println!("local:    {} ({zone_name})", instant.with_timezone(&zone).to_rfc3339());
        }
        ParseOutcome::Recurring(phrase) => {
            println!("recurring phrase: {phrase}");
            match chime_recurrence::normalize(&phrase, now) {
                Ok(rule) => println!("normalized rule:  {rule}"),
                Err(e) => println!("normalization failed: {e}"),
            }
        }
        ParseOutcome::Failure { displayed, kind } => {
            println!("unresolved ({kind}); reference instant was {}", displayed.to_rfc3339());
        }
    }

    if !result.diagnostic.is_empty() {
        println!("diagnostics:");
        for line in result.diagnostic.lines() {
            println!("  {line}");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_timezone_is_a_config_error() {
        let config = ChimeConfig::default();
        let err = run_parse("2d", Some("Atlantis/Nowhere"), None, &config)
            .expect_err("should reject unknown timezone");
        assert!(matches!(err, ChimeError::Config(_)));
    }

    #[test]
    fn malformed_now_is_a_config_error() {
        let config = ChimeConfig::default();
        let err = run_parse("2d", None, Some("yesterday-ish"), &config)
            .expect_err("should reject malformed reference instant");
        assert!(matches!(err, ChimeError::Config(_)));
    }

    #[test]
    fn all_outcome_shapes_print_without_error() {
        let config = ChimeConfig::default();
        let now = Some("2021-01-01T00:00:00Z");

        // Absolute, recurring, and failure outcomes all render.
        run_parse("2d", None, now, &config).expect("absolute should print");
        run_parse("every other day", None, now, &config).expect("recurring should print");
        run_parse("asdfgh", None, now, &config).expect("failure should print");
    }

    #[test]
    fn configured_timezone_is_the_fallback() {
        let mut config = ChimeConfig::default();
        config.time.default_timezone = "Europe/Berlin".to_string();
        run_parse("2021-05-01 12:00", None, Some("2021-01-01T00:00:00Z"), &config)
            .expect("configured zone should resolve");
    }
}
