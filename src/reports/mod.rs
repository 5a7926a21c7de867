//! Read-only views over a repository.

pub mod calendar;
pub mod dashboard;
pub mod export;

pub use calendar::{calendar_feed, CalendarEvent};
pub use dashboard::{Dashboard, DashboardQuery, MonthlyTotal, YearMonth};
pub use export::{ClientRow, PaymentRow, SpreadsheetExport};
