use anyhow::Result;
use clap::Subcommand;
use tracing::debug;

use crate::{
    model::{Month, NumHour, ProjectId},
    storage::Session,
};

#[derive(Subcommand, Debug)]
pub enum ItemCommand {
    #[command(about = "Adds an item to a month and prints its row")]
    Add {
        month: Month,
        project: ProjectId,
        #[arg(default_value = "")]
        activity: String,
    },
    Remove {
        month: Month,
        row: usize,
    },
    #[command(about = "Changes the activity text of an item")]
    Activity {
        month: Month,
        row: usize,
        activity: String,
    },
    #[command(about = "Moves an item to another project")]
    Project {
        month: Month,
        row: usize,
        project: ProjectId,
    },
}

#[derive(Subcommand, Debug)]
pub enum HoursCommand {
    #[command(about = "Sets the hours of an item on a day of the month (1-31)")]
    Set {
        month: Month,
        row: usize,
        day: u32,
        hours: NumHour,
    },
}

pub fn process_item_command(session: &mut Session, command: ItemCommand) -> Result<()> {
    let context = session.context_mut();
    match command {
        ItemCommand::Add {
            month,
            project,
            activity,
        } => {
            let row = context.add_item(month.id(), project, &activity)?;
            println!("{row}");
        }
        ItemCommand::Remove { month, row } => {
            let item = context.remove_item(month.id(), row)?;
            debug!("Removed item {item:?}");
        }
        ItemCommand::Activity {
            month,
            row,
            activity,
        } => context.set_activity(month.id(), row, &activity)?,
        ItemCommand::Project {
            month,
            row,
            project,
        } => context.set_item_project(month.id(), row, project)?,
    }
    Ok(())
}

pub fn process_hours_command(session: &mut Session, command: HoursCommand) -> Result<()> {
    match command {
        HoursCommand::Set {
            month,
            row,
            day,
            hours,
        } => session
            .context_mut()
            .set_hours(month.id(), row, day, hours)?,
    }
    Ok(())
}
