//! Month grid construction.
//!
//! A grid is a pure projection of (items, month, visibility, options, today).
//! It borrows the items it shows and holds no state between renders.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_CELL_LIMIT;
use crate::item::{CalendarItem, ItemKind};
use crate::month::{WeekStart, YearMonth};

/// Per-kind visibility toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visibility {
    pub action_items: bool,
    pub meetings: bool,
}

impl Default for Visibility {
    fn default() -> Self {
        Visibility {
            action_items: true,
            meetings: true,
        }
    }
}

impl Visibility {
    pub fn shows(&self, kind: ItemKind) -> bool {
        match kind {
            ItemKind::ActionItem => self.action_items,
            ItemKind::Meeting => self.meetings,
        }
    }
}

/// How items are ordered inside one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayOrder {
    /// Aggregator order: action items first, then meetings, each in source order.
    #[default]
    Source,
    /// Stable sort by ordering instant. Action items (instant 0) lead.
    Chronological,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridOptions {
    pub week_start: WeekStart,
    /// Items exposed per cell before the rest is counted as overflow.
    pub cell_limit: usize,
    pub day_order: DayOrder,
}

impl Default for GridOptions {
    fn default() -> Self {
        GridOptions {
            week_start: WeekStart::default(),
            cell_limit: DEFAULT_CELL_LIMIT,
            day_order: DayOrder::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayCell<'a> {
    /// 1-based day of month.
    pub day: u32,
    pub date: NaiveDate,
    pub is_today: bool,
    items: Vec<&'a CalendarItem>,
    limit: usize,
}

impl<'a> DayCell<'a> {
    /// Every visible-kind item on this day.
    pub fn items(&self) -> &[&'a CalendarItem] {
        &self.items
    }

    /// Items within the cell limit.
    pub fn visible(&self) -> &[&'a CalendarItem] {
        &self.items[..self.items.len().min(self.limit)]
    }

    /// Count of items beyond the cell limit, `None` when everything fits.
    pub fn overflow(&self) -> Option<usize> {
        let hidden = self.items.len().saturating_sub(self.limit);
        (hidden > 0).then_some(hidden)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum GridCell<'a> {
    /// Padding before day 1.
    Blank,
    Day(DayCell<'a>),
}

impl<'a> GridCell<'a> {
    pub fn as_day(&self) -> Option<&DayCell<'a>> {
        match self {
            GridCell::Day(cell) => Some(cell),
            GridCell::Blank => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthGrid<'a> {
    pub month: YearMonth,
    pub week_start: WeekStart,
    cells: Vec<GridCell<'a>>,
}

impl<'a> MonthGrid<'a> {
    /// Leading blanks then one cell per day. No trailing padding.
    pub fn cells(&self) -> &[GridCell<'a>] {
        &self.cells
    }

    pub fn leading_offset(&self) -> usize {
        self.cells
            .iter()
            .take_while(|cell| matches!(cell, GridCell::Blank))
            .count()
    }

    pub fn days(&self) -> impl Iterator<Item = &DayCell<'a>> {
        self.cells.iter().filter_map(GridCell::as_day)
    }

    pub fn day(&self, day: u32) -> Option<&DayCell<'a>> {
        self.days().find(|cell| cell.day == day)
    }

    /// Rows of up to seven cells; the last row may be short.
    pub fn weeks(&self) -> impl Iterator<Item = &[GridCell<'a>]> {
        self.cells.chunks(7)
    }
}

/// Build the grid for `month`, marking `today` if it falls inside it.
pub fn build_month_grid<'a>(
    items: &'a [CalendarItem],
    month: YearMonth,
    visibility: Visibility,
    options: &GridOptions,
    today: NaiveDate,
) -> MonthGrid<'a> {
    let leading = month.leading_offset(options.week_start) as usize;
    let days_in_month = month.days_in_month();

    // One pass over the items; keeps aggregator order within each date.
    let mut by_date: HashMap<NaiveDate, Vec<&'a CalendarItem>> = HashMap::new();
    for item in items {
        if month.contains(item.calendar_date) && visibility.shows(item.kind) {
            by_date.entry(item.calendar_date).or_default().push(item);
        }
    }

    let mut cells = Vec::with_capacity(leading + days_in_month as usize);
    cells.extend(std::iter::repeat_n(GridCell::Blank, leading));

    for (day, date) in (1..=days_in_month).filter_map(|d| month.day(d).map(|date| (d, date))) {
        let mut day_items = by_date.remove(&date).unwrap_or_default();
        if options.day_order == DayOrder::Chronological {
            day_items.sort_by_key(|item| item.ordering_instant);
        }
        cells.push(GridCell::Day(DayCell {
            day,
            date,
            is_today: date == today,
            items: day_items,
            limit: options.cell_limit,
        }));
    }

    MonthGrid {
        month,
        week_start: options.week_start,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local_date::ViewerZone;
    use crate::model::{ActionItem, ActionItemStatus, MeetingStatus, ScheduledMeeting};
    use chrono::{TimeZone, Utc};
    use std::sync::Arc;

    fn ym(s: &str) -> YearMonth {
        s.parse().unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn task(id: i64, due: NaiveDate) -> CalendarItem {
        let item = Arc::new(ActionItem {
            id,
            title: format!("Task {id}"),
            due_date: due,
            status: ActionItemStatus::NotStarted,
            priority: None,
        });
        CalendarItem::from_action_item(item, &ViewerZone::System).unwrap()
    }

    fn meeting(id: i64, y: i32, m: u32, d: u32, hour: u32) -> CalendarItem {
        let meeting = Arc::new(ScheduledMeeting {
            id,
            title: format!("Meeting {id}"),
            date_time: Utc.with_ymd_and_hms(y, m, d, hour, 0, 0).unwrap(),
            status: MeetingStatus::Scheduled,
        });
        CalendarItem::from_meeting(meeting, &ViewerZone::Named(chrono_tz::Tz::UTC))
    }

    fn ids(cell: &DayCell) -> Vec<String> {
        cell.items().iter().map(|i| i.id.clone()).collect()
    }

    #[test]
    fn test_cell_count_is_offset_plus_days_for_every_month() {
        let options = GridOptions::default();
        let today = date(1999, 1, 1);
        let mut month = ym("2023-01");
        for _ in 0..36 {
            for week_start in [WeekStart::Sunday, WeekStart::Monday] {
                let options = GridOptions { week_start, ..options };
                let grid = build_month_grid(&[], month, Visibility::default(), &options, today);
                let offset = month.leading_offset(week_start) as usize;

                assert!(offset <= 6);
                assert_eq!(grid.leading_offset(), offset);
                assert_eq!(grid.cells().len(), offset + month.days_in_month() as usize);

                let days: Vec<u32> = grid.days().map(|c| c.day).collect();
                assert_eq!(days, (1..=month.days_in_month()).collect::<Vec<_>>());
            }
            month = month.succ();
        }
    }

    #[test]
    fn test_leap_february_lengths() {
        let options = GridOptions::default();
        let today = date(1999, 1, 1);
        let leap = build_month_grid(&[], ym("2024-02"), Visibility::default(), &options, today);
        let common = build_month_grid(&[], ym("2023-02"), Visibility::default(), &options, today);

        assert_eq!(leap.days().count(), 29);
        assert_eq!(common.days().count(), 28);
    }

    #[test]
    fn test_overflow_beyond_cell_limit() {
        let due = date(2024, 3, 12);
        let six: Vec<_> = (1..=6).map(|id| task(id, due)).collect();
        let grid = build_month_grid(&six, ym("2024-03"), Visibility::default(), &GridOptions::default(), due);
        let cell = grid.day(12).unwrap();

        assert_eq!(cell.visible().len(), 4);
        assert_eq!(cell.overflow(), Some(2));
        assert_eq!(cell.items().len(), 6);

        let four: Vec<_> = (1..=4).map(|id| task(id, due)).collect();
        let grid = build_month_grid(&four, ym("2024-03"), Visibility::default(), &GridOptions::default(), due);
        let cell = grid.day(12).unwrap();

        assert_eq!(cell.visible().len(), 4);
        assert_eq!(cell.overflow(), None);
    }

    #[test]
    fn test_zero_cell_limit_overflows_everything() {
        let due = date(2024, 3, 12);
        let items = vec![task(1, due), task(2, due)];
        let options = GridOptions { cell_limit: 0, ..GridOptions::default() };
        let grid = build_month_grid(&items, ym("2024-03"), Visibility::default(), &options, due);
        let cell = grid.day(12).unwrap();

        assert!(cell.visible().is_empty());
        assert_eq!(cell.overflow(), Some(2));
    }

    #[test]
    fn test_is_today_only_inside_reference_month() {
        let today = date(2024, 3, 18);
        let march = build_month_grid(&[], ym("2024-03"), Visibility::default(), &GridOptions::default(), today);
        let april = build_month_grid(&[], ym("2024-04"), Visibility::default(), &GridOptions::default(), today);

        let flagged: Vec<u32> = march.days().filter(|c| c.is_today).map(|c| c.day).collect();
        assert_eq!(flagged, vec![18]);
        assert_eq!(april.days().filter(|c| c.is_today).count(), 0);
    }

    #[test]
    fn test_visibility_filters_by_kind() {
        let items = vec![task(1, date(2024, 3, 5)), meeting(7, 2024, 3, 5, 9)];
        let month = ym("2024-03");
        let today = date(1999, 1, 1);
        let options = GridOptions::default();

        let both = build_month_grid(&items, month, Visibility::default(), &options, today);
        assert_eq!(ids(both.day(5).unwrap()), vec!["task-1", "meeting-7"]);

        let only_meetings = Visibility { action_items: false, meetings: true };
        let grid = build_month_grid(&items, month, only_meetings, &options, today);
        assert_eq!(ids(grid.day(5).unwrap()), vec!["meeting-7"]);

        let none = Visibility { action_items: false, meetings: false };
        let grid = build_month_grid(&items, month, none, &options, today);
        assert!(grid.day(5).unwrap().is_empty());
    }

    #[test]
    fn test_items_outside_month_are_ignored() {
        let items = vec![task(1, date(2024, 2, 5)), task(2, date(2024, 3, 5))];
        let grid = build_month_grid(&items, ym("2024-03"), Visibility::default(), &GridOptions::default(), date(1999, 1, 1));

        let total: usize = grid.days().map(|c| c.items().len()).sum();
        assert_eq!(total, 1);
        assert_eq!(ids(grid.day(5).unwrap()), vec!["task-2"]);
    }

    #[test]
    fn test_day_order_policies() {
        let items = vec![
            meeting(2, 2024, 3, 5, 15),
            task(1, date(2024, 3, 5)),
            meeting(3, 2024, 3, 5, 8),
        ];
        let month = ym("2024-03");
        let today = date(1999, 1, 1);

        let source = build_month_grid(&items, month, Visibility::default(), &GridOptions::default(), today);
        assert_eq!(ids(source.day(5).unwrap()), vec!["meeting-2", "task-1", "meeting-3"]);

        let options = GridOptions { day_order: DayOrder::Chronological, ..GridOptions::default() };
        let sorted = build_month_grid(&items, month, Visibility::default(), &options, today);
        assert_eq!(ids(sorted.day(5).unwrap()), vec!["task-1", "meeting-3", "meeting-2"]);
    }

    #[test]
    fn test_weeks_chunk_cells_by_seven() {
        // March 2024: 5 blanks + 31 days = 36 cells.
        let grid = build_month_grid(&[], ym("2024-03"), Visibility::default(), &GridOptions::default(), date(1999, 1, 1));
        let rows: Vec<usize> = grid.weeks().map(|row| row.len()).collect();
        assert_eq!(rows, vec![7, 7, 7, 7, 7, 1]);
    }
}
