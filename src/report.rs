//! Per project summary of a month.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{
    item::{NumHour, sum_of},
    month::Month,
    project::ProjectId,
};

/// Total hours of one project within a month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportLine {
    pub project_id: ProjectId,
    pub hours: NumHour,
}

impl ReportLine {
    pub fn new(project_id: ProjectId, hours: NumHour) -> Self {
        Self { project_id, hours }
    }
}

/// Sums the hours of every item per project. Lines are ordered by project id and a project
/// appears as soon as it has an item, even if nothing was booked on it.
pub fn generate_report(month: &Month) -> Vec<ReportLine> {
    if !month.is_valid() {
        return vec![];
    }

    let mut totals = BTreeMap::<ProjectId, NumHour>::new();
    for item in &month.items {
        *totals.entry(item.project_id).or_insert(0.) += item.sum_hours();
    }

    totals
        .into_iter()
        .map(|(project_id, hours)| ReportLine::new(project_id, hours))
        .collect()
}

pub fn sum_report(report: &[ReportLine]) -> NumHour {
    sum_of(report.iter().map(|line| line.hours))
}
