pub mod item;
pub mod month;
pub mod output;
pub mod project;
pub mod report;

use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result, bail};
use clap::{Parser, Subcommand};
use item::{HoursCommand, ItemCommand, process_hours_command, process_item_command};
use month::{MonthCommand, process_month_command};
use project::{ProjectCommand, process_project_command};
use report::{ReportCommand, process_report_command};
use tracing::{info, level_filters::LevelFilter};

use crate::{
    model::{Month, sum_of},
    storage::{Session, read_hours_file},
    utils::{
        clock::{Clock, DefaultClock},
        dir::{DEFAULT_HOURS_FILE, create_application_default_path},
        logging::{CLI_PREFIX, enable_logging},
    },
};

#[derive(Parser, Debug)]
#[command(name = "HourGlass", version, long_about = None)]
#[command(about = "Book working hours per project and month", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(
        long,
        env = "HOURGLASS_FILE",
        help = "Hours file. By default hours.xml inside $XDG_DATA_HOME/hourglass or $HOME/.local/share/hourglass"
    )]
    file: Option<PathBuf>,
    #[arg(long, help = "Also print logs to the console")]
    log: bool,
    #[arg(long, help = "Log level, e.g. info, debug or trace. Overrides RUST_LOG")]
    log_filter: Option<LevelFilter>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Creates an empty hours file")]
    Init,
    #[command(about = "Manage projects")]
    Project {
        #[command(subcommand)]
        command: ProjectCommand,
    },
    #[command(about = "Manage months and show their hours")]
    Month {
        #[command(subcommand)]
        command: MonthCommand,
    },
    #[command(about = "Manage the items of a month")]
    Item {
        #[command(subcommand)]
        command: ItemCommand,
    },
    #[command(about = "Book hours on an item")]
    Hours {
        #[command(subcommand)]
        command: HoursCommand,
    },
    #[command(about = "Sum the hours of a month per project")]
    Report {
        #[command(flatten)]
        command: ReportCommand,
    },
    #[command(about = "Read and validate the hours file")]
    Check,
}

pub fn run_cli() -> Result<()> {
    let args = Args::parse();

    let application_path = create_application_default_path()?;
    let logging_level = match (args.log_filter, args.log) {
        (Some(level), _) => Some(level),
        (None, true) => Some(LevelFilter::TRACE),
        (None, false) => None,
    };
    enable_logging(CLI_PREFIX, &application_path, logging_level, args.log)?;

    let path = args
        .file
        .unwrap_or_else(|| application_path.join(DEFAULT_HOURS_FILE));

    match args.commands {
        Commands::Init => init_hours_file(&path),
        Commands::Project { command } => {
            let mut session = open_session(&path)?;
            process_project_command(&mut session, command)?;
            save_if_modified(&mut session)
        }
        Commands::Month { command } => {
            let mut session = open_session(&path)?;
            process_month_command(&mut session, command)?;
            save_if_modified(&mut session)
        }
        Commands::Item { command } => {
            let mut session = open_session(&path)?;
            process_item_command(&mut session, command)?;
            save_if_modified(&mut session)
        }
        Commands::Hours { command } => {
            let mut session = open_session(&path)?;
            process_hours_command(&mut session, command)?;
            save_if_modified(&mut session)
        }
        Commands::Report { command } => process_report_command(&open_session(&path)?, command),
        Commands::Check => check_hours_file(&path),
    }
}

fn init_hours_file(path: &Path) -> Result<()> {
    if path.exists() {
        bail!("{path:?} already exists");
    }
    let mut session = Session::new(Box::new(DefaultClock));
    session
        .save_as(path)
        .with_context(|| format!("Failed to create {path:?}"))?;
    println!("Created {}", path.display());
    Ok(())
}

fn open_session(path: &Path) -> Result<Session> {
    if !path.exists() {
        bail!(
            "{} does not exist, create it with `hourglass init`",
            path.display()
        );
    }
    Ok(Session::open(path, Box::new(DefaultClock))?)
}

fn save_if_modified(session: &mut Session) -> Result<()> {
    if session.is_modified() {
        session.save()?;
    } else {
        info!("Nothing changed, not saving");
    }
    Ok(())
}

fn check_hours_file(path: &Path) -> Result<()> {
    let context = read_hours_file(path)?;
    let items = context.months().map(|m| m.items.len()).sum::<usize>();
    let hours = sum_of(context.months().map(Month::sum_hours));
    println!(
        "{}: {} projects, {} months, {items} items, {hours:.2} hours",
        path.display(),
        context.list_projects().len(),
        context.list_months().len(),
    );
    Ok(())
}

/// Month given on the command line, the current one otherwise.
fn selected_month(month: Option<Month>, clock: &dyn Clock) -> Month {
    month.unwrap_or_else(|| Month::from_date(clock.now().date_naive()))
}

#[cfg(test)]
mod cli_tests {
    use std::path::Path;

    use clap::Parser;

    use super::{Args, Commands, selected_month};
    use crate::{model::Month, utils::clock::fixed_clock};

    #[test]
    fn parses_global_options() {
        let args = Args::try_parse_from([
            "hourglass",
            "--file",
            "/tmp/h.xml",
            "--log-filter",
            "debug",
            "check",
        ])
        .expect("valid arguments");

        assert_eq!(args.file.as_deref(), Some(Path::new("/tmp/h.xml")));
        assert!(matches!(args.commands, Commands::Check));
        assert!(args.log_filter.is_some());
    }

    #[test]
    fn rejects_invalid_month_arguments() {
        assert!(Args::try_parse_from(["hourglass", "month", "add", "2024-13"]).is_err());
        assert!(Args::try_parse_from(["hourglass", "month", "add", "1999-01"]).is_err());
        assert!(Args::try_parse_from(["hourglass", "month", "add", "2024-02"]).is_ok());
    }

    #[test]
    fn current_month_is_the_default() {
        let clock = fixed_clock(2024, 7, 9);
        assert_eq!(selected_month(None, &clock).id(), 202407);
        assert_eq!(
            selected_month(Some(Month::new(2023, 1)), &clock).id(),
            202301
        );
    }
}
