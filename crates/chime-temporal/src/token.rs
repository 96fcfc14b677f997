// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Free-text splitting for the temporal resolver.
//!
//! Turns raw user text into ordered tokens of `(optional signed magnitude,
//! unit fragment)`. No interpretation happens here; the relative resolver
//! decides what a fragment means.

/// One argument split into an optional signed magnitude and the remaining
/// unit fragment. Ephemeral; never leaves this crate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct TemporalToken {
    pub magnitude: Option<i64>,
    pub unit_fragment: String,
}

/// Splits free text into temporal tokens.
///
/// Words break on any character that is neither alphanumeric nor a leading
/// minus, so `"2d,4h"` and `"2d 4h"` tokenize identically and negative
/// magnitudes (`"1mo -1d"`) survive. A magnitude-only token absorbs an
/// immediately following fragment-only token, so `"2 weeks"` becomes one
/// token; two already-complete tokens stay separate.
pub(crate) fn tokenize(text: &str) -> Vec<TemporalToken> {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() || (c == '-' && current.is_empty()) {
            current.push(c);
        } else if !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        words.push(current);
    }

    let mut tokens: Vec<TemporalToken> = Vec::new();
    for word in &words {
        let token = split_word(word);
        if let Some(prev) = tokens.last_mut() {
            if prev.magnitude.is_some()
                && prev.unit_fragment.is_empty()
                && token.magnitude.is_none()
                && !token.unit_fragment.is_empty()
            {
                prev.unit_fragment = token.unit_fragment;
                continue;
            }
        }
        tokens.push(token);
    }
    tokens
}

fn split_word(word: &str) -> TemporalToken {
    let (negative, body) = match word.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, word),
    };
    let digits_end = body
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(body.len());
    let (digits, fragment) = body.split_at(digits_end);

    if digits.is_empty() {
        // No numeric prefix; a bare minus sticks to the fragment.
        return TemporalToken {
            magnitude: None,
            unit_fragment: word.to_lowercase(),
        };
    }

    match digits.parse::<i64>() {
        Ok(value) => TemporalToken {
            magnitude: Some(if negative { -value } else { value }),
            unit_fragment: fragment.to_lowercase(),
        },
        // Numeric prefix wider than i64; hand the whole word to the
        // diagnostic path instead of wrapping.
        Err(_) => TemporalToken {
            magnitude: None,
            unit_fragment: word.to_lowercase(),
        },
    }
}
