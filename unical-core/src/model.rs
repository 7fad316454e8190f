//! Source records consumed by the aggregator.
//!
//! These mirror what the CRM hands out for tasks, meetings and the
//! organization directory. They are read-only inputs: the aggregator never
//! edits them, it only projects them into calendar items.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A task-like record with a due date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionItem {
    pub id: i64,
    pub title: String,
    /// Calendar day the item is due, `YYYY-MM-DD`, no time component.
    pub due_date: NaiveDate,
    pub status: ActionItemStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
}

/// A meeting pinned to an absolute instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledMeeting {
    pub id: i64,
    pub title: String,
    /// Accepts any RFC 3339 offset on input; stored as UTC.
    pub date_time: DateTime<Utc>,
    pub status: MeetingStatus,
}

/// One row of the organization directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrgDirectoryEntry {
    pub id: i64,
    #[serde(alias = "company")]
    pub name: String,
}

/// Lowercases and strips separators so "In Progress", "in_progress" and
/// "InProgress" compare equal.
fn normalize_label(s: &str) -> String {
    s.chars()
        .filter(|c| !matches!(c, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ActionItemStatus {
    NotStarted,
    InProgress,
    InReview,
    OnHold,
    Completed,
    Done,
    Other(String),
}

impl ActionItemStatus {
    /// Completed and Done items never reach the calendar.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActionItemStatus::Completed | ActionItemStatus::Done)
    }

    pub fn label(&self) -> &str {
        match self {
            ActionItemStatus::NotStarted => "Not Started",
            ActionItemStatus::InProgress => "In Progress",
            ActionItemStatus::InReview => "In Review",
            ActionItemStatus::OnHold => "On Hold",
            ActionItemStatus::Completed => "Completed",
            ActionItemStatus::Done => "Done",
            ActionItemStatus::Other(s) => s,
        }
    }
}

impl From<String> for ActionItemStatus {
    fn from(s: String) -> Self {
        match normalize_label(&s).as_str() {
            "notstarted" | "todo" => ActionItemStatus::NotStarted,
            "inprogress" => ActionItemStatus::InProgress,
            "inreview" => ActionItemStatus::InReview,
            "onhold" => ActionItemStatus::OnHold,
            "completed" => ActionItemStatus::Completed,
            "done" => ActionItemStatus::Done,
            _ => ActionItemStatus::Other(s),
        }
    }
}

impl From<&str> for ActionItemStatus {
    fn from(s: &str) -> Self {
        ActionItemStatus::from(s.to_string())
    }
}

impl From<ActionItemStatus> for String {
    fn from(status: ActionItemStatus) -> Self {
        status.label().to_string()
    }
}

impl fmt::Display for ActionItemStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
    Other(String),
}

impl Priority {
    pub fn label(&self) -> &str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Urgent => "Urgent",
            Priority::Other(s) => s,
        }
    }
}

impl From<String> for Priority {
    fn from(s: String) -> Self {
        match normalize_label(&s).as_str() {
            "low" => Priority::Low,
            "medium" | "normal" => Priority::Medium,
            "high" => Priority::High,
            "urgent" | "critical" => Priority::Urgent,
            _ => Priority::Other(s),
        }
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.label().to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MeetingStatus {
    Scheduled,
    Completed,
    Cancelled,
    Postponed,
    Other(String),
}

impl MeetingStatus {
    pub fn label(&self) -> &str {
        match self {
            MeetingStatus::Scheduled => "Scheduled",
            MeetingStatus::Completed => "Completed",
            MeetingStatus::Cancelled => "Cancelled",
            MeetingStatus::Postponed => "Postponed",
            MeetingStatus::Other(s) => s,
        }
    }
}

impl From<String> for MeetingStatus {
    fn from(s: String) -> Self {
        match normalize_label(&s).as_str() {
            "scheduled" => MeetingStatus::Scheduled,
            "completed" | "done" => MeetingStatus::Completed,
            "cancelled" | "canceled" => MeetingStatus::Cancelled,
            "postponed" | "rescheduled" => MeetingStatus::Postponed,
            _ => MeetingStatus::Other(s),
        }
    }
}

impl From<&str> for MeetingStatus {
    fn from(s: &str) -> Self {
        MeetingStatus::from(s.to_string())
    }
}

impl From<MeetingStatus> for String {
    fn from(status: MeetingStatus) -> Self {
        status.label().to_string()
    }
}

impl fmt::Display for MeetingStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Organization id to display name.
///
/// Not used by aggregation or grid placement; kept for consumers that want to
/// label items with the organization they belong to.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompanyMap(HashMap<i64, String>);

impl CompanyMap {
    /// Entries are applied in the order given, so a later duplicate id wins.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a OrgDirectoryEntry>) -> Self {
        let mut map = HashMap::new();
        for entry in entries {
            map.insert(entry.id, entry.name.clone());
        }
        CompanyMap(map)
    }

    pub fn name(&self, id: i64) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries ordered by id, for stable display.
    pub fn sorted(&self) -> Vec<(i64, &str)> {
        let mut entries: Vec<_> = self.0.iter().map(|(id, name)| (*id, name.as_str())).collect();
        entries.sort_by_key(|(id, _)| *id);
        entries
    }
}
