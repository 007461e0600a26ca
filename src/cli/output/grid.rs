use ansi_term::{Colour, Style};

use crate::{
    model::{Context, Month, NumHour},
    utils::clock::Clock,
};

const ZERO_HOURS: &str = "-";

/// Header label of a day column. Mondays carry their ISO week as `[ww]`, today is wrapped in
/// `>d<`.
pub fn day_label(month: &Month, day: u32, clock: &dyn Clock) -> String {
    let label = if month.is_current_day(day, clock) {
        format!(">{day}<")
    } else {
        day.to_string()
    };

    if month.is_monday(day) {
        format!("[{:02}]{label}", month.week_number(day))
    } else {
        label
    }
}

pub fn format_hours(hours: NumHour) -> String {
    if hours == 0. {
        ZERO_HOURS.to_string()
    } else {
        format!("{hours:.2}")
    }
}

/// Renders the month as a tab separated table: one row per item with its total and the hours of
/// every requested day, followed by a row with the sums of each day.
pub fn format_month_grid(
    context: &Context,
    month: &Month,
    days: &[u32],
    clock: &dyn Clock,
    colored: bool,
) -> String {
    let style_of = |day: u32| {
        if !colored {
            Style::new()
        } else if month.is_current_day(day, clock) {
            Colour::Yellow.bold()
        } else if month.is_weekend(day) {
            Style::new().dimmed()
        } else {
            Style::new()
        }
    };

    let mut lines = vec![];

    let mut header = vec![
        "Row".to_string(),
        "Project".to_string(),
        "Activity".to_string(),
        "Total".to_string(),
    ];
    header.extend(
        days.iter()
            .map(|day| style_of(*day).paint(day_label(month, *day, clock)).to_string()),
    );
    lines.push(header.join("\t"));

    for (row, item) in month.items.iter().enumerate() {
        let project = context
            .find_project(item.project_id)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| format!("#{}", item.project_id));

        let mut line = vec![
            row.to_string(),
            project,
            item.activity.clone(),
            format_hours(item.sum_hours()),
        ];
        line.extend(days.iter().map(|day| {
            let hours = item.hours.get(*day as usize - 1);
            style_of(*day).paint(format_hours(hours)).to_string()
        }));
        lines.push(line.join("\t"));
    }

    let mut sums = vec![
        String::new(),
        "Sum".to_string(),
        String::new(),
        format_hours(month.sum_hours()),
    ];
    sums.extend(days.iter().map(|day| {
        let hours = month.sum_day_hours(*day as usize - 1);
        style_of(*day).paint(format_hours(hours)).to_string()
    }));
    lines.push(sums.join("\t"));

    lines.join("\n")
}
