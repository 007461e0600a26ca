use anyhow::{Result, bail};

use crate::{model::Month, report::generate_report, storage::Session};

use super::{
    output::report_table::{format_report, json_report},
    selected_month,
};

#[derive(Debug, clap::Args)]
pub struct ReportCommand {
    #[arg(help = "Month formatted as YYYY-MM, the current one by default")]
    month: Option<Month>,
    #[arg(long, help = "Print the report as JSON")]
    json: bool,
}

pub fn process_report_command(
    session: &Session,
    ReportCommand { month, json }: ReportCommand,
) -> Result<()> {
    let id = selected_month(month, session.clock()).id();
    let context = session.context();
    let Some(month) = context.find_month(id) else {
        bail!("Month {id} does not exist");
    };

    let report = generate_report(month);
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json_report(context, month, &report))?
        );
    } else {
        println!("{}", format_report(context, month, &report));
    }
    Ok(())
}
