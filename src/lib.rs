//! Book working hours per project and month.
//!
//! A [Context](model::Context) holds every project and month of an hours file, [xml] reads and
//! writes that file, [report] sums a month per project and [storage] keeps the file on disk with
//! a backup of every previous version.
//!

pub mod cli;
pub mod model;
pub mod report;
pub mod storage;
pub mod utils;
pub mod xml;
