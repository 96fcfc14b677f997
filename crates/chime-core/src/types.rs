// SPDX-FileCopyrightText: 2026 Chime Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Chime workspace.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a reminder of either kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReminderId(pub Uuid);

impl ReminderId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReminderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReminderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ReminderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

/// Platform-assigned identifier of a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// Platform-assigned identifier of a channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChannelId(pub String);

/// A delivery destination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Surface {
    /// The channel a reminder was created in.
    Channel(ChannelId),
    /// A direct message to a user.
    Direct(UserId),
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Surface::Channel(id) => write!(f, "channel:{}", id.0),
            Surface::Direct(id) => write!(f, "direct:{}", id.0),
        }
    }
}

/// Payload handed to a messenger for delivery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// The reminder text, verbatim as the user entered it.
    pub message: String,
    /// Who asked to be reminded.
    pub author: UserId,
    /// The occurrence instant this notification fires for.
    pub due_at: DateTime<Utc>,
}

impl Notification {
    /// Plain-text rendering used when rich delivery is unavailable.
    pub fn plain_text(&self) -> String {
        format!("Reminder: {}", self.message)
    }
}

/// A canonical serialized recurrence rule (RFC 5545 `RRULE` property grammar).
///
/// Canonical rules are timezone-agnostic: any embedded instant (`UNTIL`) is
/// UTC. Construction goes through the recurrence normalizer; this type only
/// carries the validated text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecurrenceRule(pub String);

impl RecurrenceRule {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecurrenceRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Everything needed to enumerate the occurrences of a recurring reminder.
///
/// Invariant: the anchor is an implicit extra instant. The creation moment
/// always qualifies as an occurrence unless it appears in
/// `excluded_instants`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSet {
    /// The instant the recurrence is rooted at.
    pub anchor: DateTime<Utc>,
    #[serde(default)]
    pub base_rules: Vec<RecurrenceRule>,
    #[serde(default)]
    pub exclusion_rules: Vec<RecurrenceRule>,
    #[serde(default)]
    pub extra_instants: Vec<DateTime<Utc>>,
    #[serde(default)]
    pub excluded_instants: Vec<DateTime<Utc>>,
}

impl RuleSet {
    /// Rule set with a single base rule rooted at `anchor`.
    pub fn with_rule(anchor: DateTime<Utc>, rule: RecurrenceRule) -> Self {
        Self {
            anchor,
            base_rules: vec![rule],
            exclusion_rules: Vec::new(),
            extra_instants: Vec::new(),
            excluded_instants: Vec::new(),
        }
    }
}

/// The fields shared by every reminder kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderCore {
    pub id: ReminderId,
    pub author: UserId,
    pub channel: ChannelId,
    pub message: String,
    /// One-shot reminders: the trigger instant. Recurring reminders: the
    /// rule-set anchor.
    pub scheduled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl ReminderCore {
    /// The channel surface this reminder was created in.
    pub fn channel_surface(&self) -> Surface {
        Surface::Channel(self.channel.clone())
    }

    /// The creator's direct-message surface.
    pub fn direct_surface(&self) -> Surface {
        Surface::Direct(self.author.clone())
    }
}

/// A reminder that fires on every occurrence of its rule set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringReminder {
    pub core: ReminderCore,
    pub rules: RuleSet,
    /// Next due instant. `None` marks the item orphaned (rule set
    /// exhausted), eligible for the purge pass.
    pub next_trigger: Option<DateTime<Utc>>,
}

/// A reminder of either kind.
///
/// Tagged rather than subclassed: delivery logic reads the shared
/// [`ReminderCore`] and branches exactly once on the variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReminderKind {
    OneShot(ReminderCore),
    Recurring(RecurringReminder),
}

impl ReminderKind {
    pub fn core(&self) -> &ReminderCore {
        match self {
            ReminderKind::OneShot(core) => core,
            ReminderKind::Recurring(recurring) => &recurring.core,
        }
    }

    pub fn id(&self) -> ReminderId {
        self.core().id
    }
}
