//! The normalized calendar item both sources are merged into.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Serialize, Serializer};

use crate::local_date::{ItemDate, ViewerZone, resolve_local_date};
use crate::model::{ActionItem, ScheduledMeeting};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    ActionItem,
    Meeting,
}

impl ItemKind {
    /// Prefix used in item ids.
    pub fn slug(&self) -> &'static str {
        match self {
            ItemKind::ActionItem => "task",
            ItemKind::Meeting => "meeting",
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// The record an item was projected from. Shared, never owned by the item.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOrigin {
    ActionItem(Arc<ActionItem>),
    Meeting(Arc<ScheduledMeeting>),
}

impl Serialize for ItemOrigin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ItemOrigin::ActionItem(item) => item.serialize(serializer),
            ItemOrigin::Meeting(meeting) => meeting.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarItem {
    /// `<kind>-<source id>`, unique across both sources.
    pub id: String,
    /// Bucketing key for the grid.
    pub calendar_date: NaiveDate,
    /// Milliseconds since the epoch for meetings, 0 for action items.
    pub ordering_instant: i64,
    pub title: String,
    pub kind: ItemKind,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<String>,
    pub origin: ItemOrigin,
}

impl CalendarItem {
    /// Returns `None` for completed or done items, which never reach the calendar.
    pub fn from_action_item(item: Arc<ActionItem>, zone: &ViewerZone) -> Option<Self> {
        if item.status.is_terminal() {
            return None;
        }
        Some(CalendarItem {
            id: format!("{}-{}", ItemKind::ActionItem.slug(), item.id),
            calendar_date: resolve_local_date(ItemDate::Calendar(item.due_date), zone),
            ordering_instant: 0,
            title: item.title.clone(),
            kind: ItemKind::ActionItem,
            status: item.status.to_string(),
            priority: item.priority.as_ref().map(ToString::to_string),
            origin: ItemOrigin::ActionItem(item),
        })
    }

    /// Meetings are always placed, whatever their status.
    pub fn from_meeting(meeting: Arc<ScheduledMeeting>, zone: &ViewerZone) -> Self {
        CalendarItem {
            id: format!("{}-{}", ItemKind::Meeting.slug(), meeting.id),
            calendar_date: resolve_local_date(ItemDate::Instant(meeting.date_time), zone),
            ordering_instant: meeting.date_time.timestamp_millis(),
            title: meeting.title.clone(),
            kind: ItemKind::Meeting,
            status: meeting.status.to_string(),
            priority: None,
            origin: ItemOrigin::Meeting(meeting),
        }
    }
}

impl fmt::Display for CalendarItem {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ActionItemStatus, MeetingStatus, Priority};
    use chrono::{TimeZone, Utc};

    fn task(id: i64, status: &str) -> Arc<ActionItem> {
        Arc::new(ActionItem {
            id,
            title: format!("Task {id}"),
            due_date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
            status: ActionItemStatus::from(status),
            priority: Some(Priority::Urgent),
        })
    }

    #[test]
    fn test_action_item_projection() {
        let item = CalendarItem::from_action_item(task(1, "InProgress"), &ViewerZone::System).unwrap();

        assert_eq!(item.id, "task-1");
        assert_eq!(item.kind, ItemKind::ActionItem);
        assert_eq!(item.ordering_instant, 0);
        assert_eq!(item.status, "In Progress");
        assert_eq!(item.priority.as_deref(), Some("Urgent"));
    }

    #[test]
    fn test_terminal_action_items_are_dropped() {
        assert!(CalendarItem::from_action_item(task(1, "Completed"), &ViewerZone::System).is_none());
        assert!(CalendarItem::from_action_item(task(2, "Done"), &ViewerZone::System).is_none());
    }

    #[test]
    fn test_meeting_projection_carries_instant() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 9, 0, 0).unwrap();
        let meeting = Arc::new(ScheduledMeeting {
            id: 7,
            title: "Review".into(),
            date_time: at,
            status: MeetingStatus::Cancelled,
        });
        let item = CalendarItem::from_meeting(meeting, &ViewerZone::Named(chrono_tz::Tz::UTC));

        assert_eq!(item.id, "meeting-7");
        assert_eq!(item.ordering_instant, at.timestamp_millis());
        assert_eq!(item.calendar_date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(item.status, "Cancelled");
        assert!(item.priority.is_none());
    }
}
