//! Element and attribute names of the hours file.

pub const HOURGLASS: &str = "HourGlass";

pub const PROJECTS: &str = "projects";
pub const PROJECT: &str = "project";
pub const NAME: &str = "name";
pub const ANNOTATION: &str = "annotation";

pub const MONTHS: &str = "months";
pub const MONTH: &str = "month";
pub const ITEMS: &str = "items";
pub const ITEM: &str = "item";
pub const ACTIVITY: &str = "activity";
pub const HOURS: &str = "hours";
pub const DAY: &str = "day";

pub const PROJECT_ID: &str = "pid";
pub const MONTH_ID: &str = "mid";
pub const DAY_ID: &str = "did";
