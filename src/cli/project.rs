use anyhow::{Result, bail};
use clap::Subcommand;
use tracing::info;

use crate::{
    model::{Context, ProjectId},
    storage::Session,
};

#[derive(Subcommand, Debug)]
pub enum ProjectCommand {
    #[command(about = "Creates a project with the next free id")]
    Add {
        name: String,
        #[arg(short, long, default_value = "")]
        annotation: String,
    },
    #[command(about = "Lists projects ordered by id")]
    List,
    Rename {
        id: ProjectId,
        name: String,
    },
    Annotate {
        id: ProjectId,
        annotation: String,
    },
    #[command(about = "Removes a project that no item refers to")]
    Remove {
        id: ProjectId,
    },
}

pub fn process_project_command(session: &mut Session, command: ProjectCommand) -> Result<()> {
    let context = session.context_mut();
    match command {
        ProjectCommand::Add { name, annotation } => {
            let id = add_project(context, &name, &annotation)?;
            println!("{id}");
        }
        ProjectCommand::List => {
            for line in list_projects(context) {
                println!("{line}");
            }
        }
        ProjectCommand::Rename { id, name } => context.rename_project(id, &name)?,
        ProjectCommand::Annotate { id, annotation } => context.set_annotation(id, &annotation)?,
        ProjectCommand::Remove { id } => {
            let project = context.remove_project(id)?;
            info!("Removed project {project}");
        }
    }
    Ok(())
}

fn add_project(context: &mut Context, name: &str, annotation: &str) -> Result<ProjectId> {
    let name = name.trim();
    if name.is_empty() {
        bail!("Project name must not be empty");
    }
    let project = context.make_project(name).with_annotation(annotation.trim());
    let id = project.id();
    if !context.add_project(project) {
        bail!("Project {id} could not be added");
    }
    Ok(id)
}

fn list_projects(context: &Context) -> Vec<String> {
    context
        .projects()
        .map(|project| {
            format!(
                "{}\t{}\t{}\t{}",
                project.id(),
                project.name,
                context.count_references(project.id()),
                project.annotation
            )
        })
        .collect()
}
