//! Core of the unical calendar.
//!
//! This crate merges action items and scheduled meetings into one list of
//! calendar items and projects them onto a month grid:
//! - `aggregate` joins the three sources all-or-nothing
//! - `grid` builds the month grid with overflow and visibility rules
//! - `view` holds the reference month, toggles and the installed items
//! - `source` defines the source seam and the provider subprocess protocol

pub mod aggregate;
pub mod config;
pub mod constants;
pub mod error;
pub mod grid;
pub mod item;
pub mod local_date;
pub mod model;
pub mod month;
pub mod notify;
pub mod source;
pub mod view;

pub use aggregate::{Aggregation, Aggregator};
pub use error::{SyncFailure, TransportError, UnicalError, UnicalResult};
pub use grid::{DayCell, DayOrder, GridCell, GridOptions, MonthGrid, Visibility, build_month_grid};
pub use item::{CalendarItem, ItemKind, ItemOrigin};
pub use local_date::ViewerZone;
pub use month::{WeekStart, YearMonth};
pub use view::{Applied, MonthStep, ViewState};
