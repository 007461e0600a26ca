use std::io::IsTerminal;

use anyhow::{Result, bail};
use clap::Subcommand;

use crate::{
    model::{Context, Month},
    storage::Session,
    utils::clock::Clock,
};

use super::{output::grid::format_month_grid, selected_month};

#[derive(Subcommand, Debug)]
pub enum MonthCommand {
    #[command(about = "Adds an empty month, formatted as YYYY-MM")]
    Add { month: Month },
    #[command(about = "Lists months, newest first")]
    List,
    #[command(about = "Shows the hours of a month, the current one by default")]
    Show {
        month: Option<Month>,
        #[arg(short, long, help = "Only show the days of the current week")]
        week: bool,
    },
}

pub fn process_month_command(session: &mut Session, command: MonthCommand) -> Result<()> {
    match command {
        MonthCommand::Add { month } => {
            let id = month.id();
            if !session.context_mut().add_month(month) {
                bail!("Month {id} already exists");
            }
        }
        MonthCommand::List => {
            for line in list_months(session.context()) {
                println!("{line}");
            }
        }
        MonthCommand::Show { month, week } => {
            let id = selected_month(month, session.clock()).id();
            let context = session.context();
            let Some(month) = context.find_month(id) else {
                bail!("Month {id} does not exist, add it with `hourglass month add`");
            };
            let days = shown_days(month, week, session.clock());
            let colored = std::io::stdout().is_terminal();
            println!("{}", month.to_long_string());
            println!(
                "{}",
                format_month_grid(context, month, &days, session.clock(), colored)
            );
        }
    }
    Ok(())
}

fn list_months(context: &Context) -> Vec<String> {
    context
        .list_months()
        .into_iter()
        .filter_map(|id| context.find_month(id))
        .map(|month| {
            format!(
                "{month}\t{}\t{:.2}",
                month.items.len(),
                month.sum_hours()
            )
        })
        .collect()
}

/// Every day of the month, or only those sharing the week of today. Months other than the
/// current one show their first week.
fn shown_days(month: &Month, week: bool, clock: &dyn Clock) -> Vec<u32> {
    if !week {
        return (1..=month.days() as u32).collect();
    }

    let today = clock.now().date_naive();
    if month.is_month(today) {
        return month.days_of_week(today);
    }
    match chrono::NaiveDate::from_ymd_opt(month.year(), month.month(), 1) {
        Some(first) => month.days_of_week(first),
        None => vec![],
    }
}

#[cfg(test)]
mod month_command_tests {
    use super::{list_months, shown_days};
    use crate::{
        model::{Context, Month},
        utils::clock::fixed_clock,
    };

    #[test]
    fn lists_newest_first() {
        let mut context = Context::new();
        assert!(context.add_month(Month::new(2023, 12)));
        assert!(context.add_month(Month::new(2024, 2)));

        assert_eq!(
            list_months(&context),
            vec!["2024-02\t0\t0.00", "2023-12\t0\t0.00"]
        );
    }

    #[test]
    fn week_of_today_or_first_week() {
        let clock = fixed_clock(2024, 3, 13);
        let march = Month::new(2024, 3);

        assert_eq!(shown_days(&march, false, &clock).len(), 31);
        assert_eq!(shown_days(&march, true, &clock), vec![11, 12, 13, 14, 15, 16, 17]);
        // 2024-02-01 is a Thursday.
        assert_eq!(shown_days(&Month::new(2024, 2), true, &clock), vec![1, 2, 3, 4]);
    }
}
