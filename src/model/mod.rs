//! In-memory model of an hours file.
//!  - [Project]s are the categories hours are booked against.
//!  - A [Month] holds [Item]s, each item books hours per day on one project.
//!  - A [Context] owns all months and projects of one file.

pub mod context;
pub mod item;
pub mod month;
pub mod project;

pub use context::{Context, ContextError};
pub use item::{Hours, Item, MAX_DAYS, NumHour, sum_day_hours, sum_of};
pub use month::{INVALID_MONTH_ID, Month, MonthId, make_month_id, split_month_id};
pub use project::{INVALID_PROJECT_ID, Project, ProjectId};
