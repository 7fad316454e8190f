//! Resolving items to the calendar day the viewer sees.
//!
//! Every item goes through [`resolve_local_date`]. Action items carry a bare
//! calendar date that is taken literally: it is assumed to already be the
//! viewer's day. Meetings carry an absolute instant that is decomposed in the
//! viewer's zone, so a late-evening meeting never drifts onto the next UTC day.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::error::UnicalError;

/// The timezone a calendar is evaluated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewerZone {
    /// Host local time.
    #[default]
    System,
    Named(Tz),
    Fixed(FixedOffset),
}

impl ViewerZone {
    /// Wall-clock time of `instant` in this zone.
    pub fn local_datetime(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        match self {
            ViewerZone::System => instant.with_timezone(&Local).naive_local(),
            ViewerZone::Named(tz) => instant.with_timezone(tz).naive_local(),
            ViewerZone::Fixed(offset) => instant.with_timezone(offset).naive_local(),
        }
    }

    pub fn local_date(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.local_datetime(instant).date()
    }

    /// The viewer's current calendar date.
    pub fn today(&self) -> NaiveDate {
        self.local_date(Utc::now())
    }
}

impl FromStr for ViewerZone {
    type Err = UnicalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") || trimmed.eq_ignore_ascii_case("system") {
            return Ok(ViewerZone::System);
        }
        if trimmed.starts_with('+') || trimmed.starts_with('-') {
            return parse_offset(trimmed)
                .map(ViewerZone::Fixed)
                .ok_or_else(|| UnicalError::InvalidTimeZone(s.to_string()));
        }
        trimmed
            .parse::<Tz>()
            .map(ViewerZone::Named)
            .map_err(|_| UnicalError::InvalidTimeZone(s.to_string()))
    }
}

impl fmt::Display for ViewerZone {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ViewerZone::System => write!(f, "local"),
            ViewerZone::Named(tz) => write!(f, "{}", tz.name()),
            ViewerZone::Fixed(offset) => write!(f, "{offset}"),
        }
    }
}

/// Parse `+HH:MM`, `-HH:MM` or `-HH`.
fn parse_offset(s: &str) -> Option<FixedOffset> {
    let (sign, rest) = s.split_at(1);
    let (hours, minutes) = match rest.split_once(':') {
        Some((h, m)) => (h.parse::<i32>().ok()?, m.parse::<i32>().ok()?),
        None => (rest.parse::<i32>().ok()?, 0),
    };
    if hours > 23 || minutes > 59 {
        return None;
    }
    let seconds = hours * 3600 + minutes * 60;
    if sign == "-" {
        FixedOffset::west_opt(seconds)
    } else {
        FixedOffset::east_opt(seconds)
    }
}

/// When an item happens, as delivered by its source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemDate {
    /// Already a viewer calendar day.
    Calendar(NaiveDate),
    Instant(DateTime<Utc>),
}

/// The single policy for placing an item on a calendar day.
pub fn resolve_local_date(when: ItemDate, zone: &ViewerZone) -> NaiveDate {
    match when {
        ItemDate::Calendar(date) => date,
        ItemDate::Instant(instant) => zone.local_date(instant),
    }
}
