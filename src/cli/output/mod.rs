//! Plain text and JSON rendering of months and reports for the terminal.

pub mod grid;
pub mod report_table;
