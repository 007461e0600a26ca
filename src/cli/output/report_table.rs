use serde::Serialize;

use crate::{
    model::{Context, Month, NumHour, ProjectId},
    report::{ReportLine, sum_report},
};

#[derive(Debug, Serialize)]
pub struct JsonReportLine<'a> {
    #[serde(flatten)]
    pub line: ReportLine,
    pub project: &'a str,
    pub annotation: &'a str,
}

#[derive(Debug, Serialize)]
pub struct JsonReport<'a> {
    pub month: String,
    pub lines: Vec<JsonReportLine<'a>>,
    pub total: NumHour,
}

/// Name and annotation of a project, empty when the project is unknown.
fn project_texts(context: &Context, id: ProjectId) -> (&str, &str) {
    context
        .find_project(id)
        .map(|project| (project.name.as_str(), project.annotation.as_str()))
        .unwrap_or_default()
}

/// One line per project with id, name, annotation and hours, then the total.
pub fn format_report(context: &Context, month: &Month, report: &[ReportLine]) -> String {
    let mut lines = vec![month.to_long_string()];
    lines.extend(report.iter().map(|line| {
        let (name, annotation) = project_texts(context, line.project_id);
        format!("{}\t{name}\t{annotation}\t{:.2}", line.project_id, line.hours)
    }));
    lines.push(format!("\tTotal\t\t{:.2}", sum_report(report)));
    lines.join("\n")
}

pub fn json_report<'a>(context: &'a Context, month: &Month, report: &[ReportLine]) -> JsonReport<'a> {
    JsonReport {
        month: month.to_string(),
        lines: report
            .iter()
            .map(|line| {
                let (project, annotation) = project_texts(context, line.project_id);
                JsonReportLine {
                    line: *line,
                    project,
                    annotation,
                }
            })
            .collect(),
        total: sum_report(report),
    }
}

#[cfg(test)]
mod report_table_tests {
    use anyhow::Result;
    use serde_json::json;

    use super::{format_report, json_report};
    use crate::{
        model::{Context, Month, Project},
        report::generate_report,
    };

    fn sample() -> Result<Context> {
        let mut context = Context::new();
        assert!(context.add_project(Project::new(1, "Support").with_annotation("hotline")));
        assert!(context.add_project(Project::new(2, "Lab")));
        assert!(context.add_month(Month::new(2024, 3)));
        let row = context.add_item(202403, 2, "")?;
        context.set_hours(202403, row, 4, 1.25)?;
        let row = context.add_item(202403, 1, "")?;
        context.set_hours(202403, row, 1, 5.)?;
        Ok(context)
    }

    #[test]
    fn table_lists_projects_then_total() -> Result<()> {
        let context = sample()?;
        let month = context.find_month(202403).expect("added");
        let text = format_report(&context, month, &generate_report(month));

        assert_eq!(
            text,
            "March 2024\n1\tSupport\thotline\t5.00\n2\tLab\t\t1.25\n\tTotal\t\t6.25"
        );
        Ok(())
    }

    #[test]
    fn empty_month_total_is_positive_zero() -> Result<()> {
        let mut context = Context::new();
        assert!(context.add_month(Month::new(2024, 4)));
        let month = context.find_month(202404).expect("added");
        let report = generate_report(month);

        assert_eq!(format_report(&context, month, &report), "April 2024\n\tTotal\t\t0.00");
        let value = serde_json::to_value(json_report(&context, month, &report))?;
        assert!(value["total"].as_f64().is_some_and(f64::is_sign_positive));
        Ok(())
    }

    #[test]
    fn json_shape() -> Result<()> {
        let context = sample()?;
        let month = context.find_month(202403).expect("added");
        let value = serde_json::to_value(json_report(&context, month, &generate_report(month)))?;

        assert_eq!(
            value,
            json!({
                "month": "2024-03",
                "lines": [
                    { "project_id": 1, "project": "Support", "annotation": "hotline", "hours": 5.0 },
                    { "project_id": 2, "project": "Lab", "annotation": "", "hours": 1.25 },
                ],
                "total": 6.25,
            })
        );
        Ok(())
    }
}
