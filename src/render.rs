//! TUI rendering traits for unical types.
//!
//! This module provides extension traits that add colored terminal rendering
//! to unical-core types using owo_colors.

use owo_colors::OwoColorize;
use unical_core::grid::{DayCell, GridCell, MonthGrid};
use unical_core::item::{CalendarItem, ItemKind, ItemOrigin};
use unical_core::local_date::ViewerZone;

/// Width of one grid column, borders excluded.
const CELL_WIDTH: usize = 14;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for ItemKind {
    fn render(&self) -> String {
        match self {
            ItemKind::ActionItem => "▪".blue().to_string(),
            ItemKind::Meeting => "●".magenta().to_string(),
        }
    }
}

/// Cut `text` to `width` characters, marking the cut with an ellipsis.
fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

/// Pad first, colour second, so escape codes don't count toward the width.
fn cell_item_line(item: &CalendarItem) -> String {
    let title = format!("{:<width$}", truncate(&item.title, CELL_WIDTH - 2), width = CELL_WIDTH - 2);
    let title = match item.kind {
        ItemKind::ActionItem => title.blue().to_string(),
        ItemKind::Meeting => title.magenta().to_string(),
    };
    format!("{} {}", item.kind.render(), title)
}

fn day_cell_lines(cell: &DayCell) -> Vec<String> {
    let number = format!("{:>2}", cell.day);
    let header = if cell.is_today {
        format!("{}{}", number.reversed().bold(), " ".repeat(CELL_WIDTH - 2))
    } else {
        format!("{}{}", number.dimmed(), " ".repeat(CELL_WIDTH - 2))
    };

    let mut lines = vec![header];
    lines.extend(cell.visible().iter().map(|item| cell_item_line(item)));
    if let Some(hidden) = cell.overflow() {
        let more = format!("{:<width$}", format!("+{hidden} more"), width = CELL_WIDTH);
        lines.push(more.dimmed().to_string());
    }
    lines
}

fn cell_lines(cell: &GridCell) -> Vec<String> {
    match cell {
        GridCell::Blank => Vec::new(),
        GridCell::Day(day) => day_cell_lines(day),
    }
}

impl Render for MonthGrid<'_> {
    fn render(&self) -> String {
        let blank = " ".repeat(CELL_WIDTH);
        let rule = format!("+{}+", vec!["-".repeat(CELL_WIDTH); 7].join("+"));
        let mut lines = Vec::new();

        lines.push(self.month.label().bold().to_string());
        let headers: Vec<String> = self
            .week_start
            .weekday_labels()
            .iter()
            .map(|label| format!("{label:^width$}", width = CELL_WIDTH))
            .collect();
        lines.push(format!(" {}", headers.join(" ").dimmed()));
        lines.push(rule.dimmed().to_string());

        for week in self.weeks() {
            let columns: Vec<Vec<String>> = week.iter().map(cell_lines).collect();
            let height = columns.iter().map(Vec::len).max().unwrap_or(0).max(1);

            for row in 0..height {
                let cells: Vec<&str> = (0..7)
                    .map(|col| {
                        columns
                            .get(col)
                            .and_then(|lines| lines.get(row))
                            .map(String::as_str)
                            .unwrap_or(blank.as_str())
                    })
                    .collect();
                lines.push(format!("|{}|", cells.join("|")));
            }
            lines.push(rule.dimmed().to_string());
        }

        lines.join("\n")
    }
}

/// One line for the day-by-day list, e.g. "  09:00 ● Kickoff  Scheduled".
pub fn render_item_line(item: &CalendarItem, zone: &ViewerZone) -> String {
    let time = match &item.origin {
        ItemOrigin::Meeting(meeting) => zone.local_datetime(meeting.date_time).format("%H:%M").to_string(),
        ItemOrigin::ActionItem(_) => "due".to_string(),
    };
    let priority = item
        .priority
        .as_deref()
        .map(|p| format!(" ({p})"))
        .unwrap_or_default();

    format!(
        "  {:>5} {} {}{} {}",
        time.dimmed(),
        item.kind.render(),
        item.title,
        priority.yellow(),
        item.status.dimmed()
    )
}
