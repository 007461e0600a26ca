use std::collections::{BTreeMap, BTreeSet, btree_map::Entry};

use thiserror::Error;
use tracing::debug;

use super::{
    item::{Item, NumHour},
    month::{Month, MonthId},
    project::{Project, ProjectId},
};

#[derive(Error, Debug, PartialEq)]
pub enum ContextError {
    #[error("Unknown month {0}")]
    UnknownMonth(MonthId),
    #[error("Unknown project {0}")]
    UnknownProject(ProjectId),
    #[error("Month {month} has no item in row {row}")]
    UnknownItem { month: MonthId, row: usize },
    #[error("Day {day} does not exist in month {month}")]
    DayOutOfRange { month: MonthId, day: u32 },
    #[error("Invalid number of hours {0}")]
    InvalidHours(NumHour),
    #[error("Project name must not be empty")]
    EmptyName,
    #[error("Project {id} is still referenced by {items} item(s)")]
    ProjectInUse { id: ProjectId, items: usize },
}

/// Aggregate root of an hours file: every month and every project, unique by id.
///
/// Every item of every month has to reference a project of the same context, see
/// [Context::is_valid]. Edit operations keep that invariant; [Context::add_month] and the raw
/// `*_mut` handles do not check it.
#[derive(Debug, Default, Clone)]
pub struct Context {
    months: BTreeMap<MonthId, Month>,
    projects: BTreeMap<ProjectId, Project>,
    modified: bool,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.months
            .values()
            .flat_map(|month| month.items.iter())
            .all(|item| self.is_project(item.project_id))
    }

    /// Project ids referenced by items but missing from the context.
    pub fn missing_projects(&self) -> BTreeSet<ProjectId> {
        self.months
            .values()
            .flat_map(|month| month.items.iter())
            .map(|item| item.project_id)
            .filter(|id| !self.is_project(*id))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty() && self.projects.is_empty()
    }

    pub fn clear(&mut self) {
        self.months.clear();
        self.projects.clear();
        self.clear_modified();
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self) {
        self.modified = true;
    }

    pub fn clear_modified(&mut self) {
        self.modified = false;
    }

    /// Inserts `month` unless it is invalid or its id is already taken.
    pub fn add_month(&mut self, month: Month) -> bool {
        if !month.is_valid() {
            return false;
        }
        match self.months.entry(month.id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(month);
                self.modified = true;
                true
            }
        }
    }

    pub fn find_month(&self, id: MonthId) -> Option<&Month> {
        self.months.get(&id)
    }

    /// Raw handle, call [Context::set_modified] after editing through it.
    pub fn find_month_mut(&mut self, id: MonthId) -> Option<&mut Month> {
        self.months.get_mut(&id)
    }

    pub fn is_month(&self, id: MonthId) -> bool {
        self.months.contains_key(&id)
    }

    /// Month ids, most recent first.
    pub fn list_months(&self) -> Vec<MonthId> {
        self.months.keys().rev().copied().collect()
    }

    pub fn months(&self) -> impl Iterator<Item = &Month> {
        self.months.values()
    }

    /// Inserts `project` unless it is invalid or its id is already taken. Name and annotation
    /// are stored trimmed, as the file format does not keep surrounding whitespace.
    pub fn add_project(&mut self, mut project: Project) -> bool {
        if !project.is_valid() {
            return false;
        }
        project.name = project.name.trim().to_string();
        project.annotation = project.annotation.trim().to_string();
        match self.projects.entry(project.id()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(project);
                self.modified = true;
                true
            }
        }
    }

    pub fn find_project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.get(&id)
    }

    /// Raw handle, call [Context::set_modified] after editing through it.
    pub fn find_project_mut(&mut self, id: ProjectId) -> Option<&mut Project> {
        self.projects.get_mut(&id)
    }

    pub fn is_project(&self, id: ProjectId) -> bool {
        self.projects.contains_key(&id)
    }

    /// Project ids in ascending order.
    pub fn list_projects(&self) -> Vec<ProjectId> {
        self.projects.keys().copied().collect()
    }

    pub fn projects(&self) -> impl Iterator<Item = &Project> {
        self.projects.values()
    }

    /// Creates a project with the next free id (highest id + 1, starting at 1). The project is
    /// not inserted.
    pub fn make_project(&self, name: impl Into<String>) -> Project {
        let id = self
            .projects
            .keys()
            .next_back()
            .map_or(1, |max| max.saturating_add(1));
        Project::new(id, name)
    }

    pub fn rename_project(&mut self, id: ProjectId, name: &str) -> Result<(), ContextError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ContextError::EmptyName);
        }
        let project = self.project_mut(id)?;
        project.name = name.to_string();
        self.modified = true;
        Ok(())
    }

    pub fn set_annotation(&mut self, id: ProjectId, annotation: &str) -> Result<(), ContextError> {
        let project = self.project_mut(id)?;
        project.annotation = annotation.trim().to_string();
        self.modified = true;
        Ok(())
    }

    /// Removes a project nothing refers to anymore.
    pub fn remove_project(&mut self, id: ProjectId) -> Result<Project, ContextError> {
        if !self.is_project(id) {
            return Err(ContextError::UnknownProject(id));
        }
        let items = self.count_references(id);
        if items > 0 {
            return Err(ContextError::ProjectInUse { id, items });
        }
        let project = self
            .projects
            .remove(&id)
            .ok_or(ContextError::UnknownProject(id))?;
        self.modified = true;
        debug!("Removed project {project}");
        Ok(project)
    }

    /// Number of items across all months booked against the project.
    pub fn count_references(&self, id: ProjectId) -> usize {
        self.months
            .values()
            .flat_map(|month| month.items.iter())
            .filter(|item| item.project_id == id)
            .count()
    }

    /// Appends a new item for an existing project and returns its row.
    pub fn add_item(
        &mut self,
        month: MonthId,
        project: ProjectId,
        activity: &str,
    ) -> Result<usize, ContextError> {
        if !self.is_project(project) {
            return Err(ContextError::UnknownProject(project));
        }
        let month = self.month_mut(month)?;
        month.items.push(Item::new(project).with_activity(activity));
        let row = month.items.len() - 1;
        self.modified = true;
        Ok(row)
    }

    pub fn remove_item(&mut self, month: MonthId, row: usize) -> Result<Item, ContextError> {
        let entry = self.month_mut(month)?;
        if row >= entry.items.len() {
            return Err(ContextError::UnknownItem { month, row });
        }
        let item = entry.items.remove(row);
        self.modified = true;
        Ok(item)
    }

    pub fn set_activity(
        &mut self,
        month: MonthId,
        row: usize,
        activity: &str,
    ) -> Result<(), ContextError> {
        self.item_mut(month, row)?.activity = activity.to_string();
        self.modified = true;
        Ok(())
    }

    pub fn set_item_project(
        &mut self,
        month: MonthId,
        row: usize,
        project: ProjectId,
    ) -> Result<(), ContextError> {
        if !self.is_project(project) {
            return Err(ContextError::UnknownProject(project));
        }
        self.item_mut(month, row)?.project_id = project;
        self.modified = true;
        Ok(())
    }

    /// Books `value` hours on calendar `day` (1-based) of an item.
    pub fn set_hours(
        &mut self,
        month: MonthId,
        row: usize,
        day: u32,
        value: NumHour,
    ) -> Result<(), ContextError> {
        if !value.is_finite() || value < 0. {
            return Err(ContextError::InvalidHours(value));
        }
        let entry = self.month_mut(month)?;
        if day == 0 || day as usize > entry.days() {
            return Err(ContextError::DayOutOfRange { month, day });
        }
        if !entry.set_hours(row, day as usize - 1, value) {
            return Err(ContextError::UnknownItem { month, row });
        }
        self.modified = true;
        Ok(())
    }

    fn month_mut(&mut self, id: MonthId) -> Result<&mut Month, ContextError> {
        self.months
            .get_mut(&id)
            .ok_or(ContextError::UnknownMonth(id))
    }

    fn project_mut(&mut self, id: ProjectId) -> Result<&mut Project, ContextError> {
        self.projects
            .get_mut(&id)
            .ok_or(ContextError::UnknownProject(id))
    }

    fn item_mut(&mut self, month: MonthId, row: usize) -> Result<&mut Item, ContextError> {
        self.month_mut(month)?
            .items
            .get_mut(row)
            .ok_or(ContextError::UnknownItem { month, row })
    }
}

#[cfg(test)]
mod context_tests {
    use anyhow::Result;

    use super::{Context, ContextError};
    use crate::model::{
        item::Item,
        month::Month,
        project::{INVALID_PROJECT_ID, Project},
    };

    fn context_with_projects(names: &[&str]) -> Context {
        let mut context = Context::new();
        for name in names {
            let project = context.make_project(*name);
            assert!(context.add_project(project));
        }
        context
    }

    #[test]
    fn make_project_uses_max_plus_one() -> Result<()> {
        let mut context = Context::new();
        let first = context.make_project("First");
        assert_eq!(first.id(), 1);
        assert!(context.is_empty());

        assert!(context.add_project(first));
        assert!(context.add_project(Project::new(7, "Seventh")));

        let next = context.make_project("Next");
        assert_eq!(next.id(), 8);
        assert!(context.add_project(next));
        assert_eq!(context.find_project(8).map(|p| p.name.as_str()), Some("Next"));

        context.remove_project(8)?;
        context.remove_project(7)?;
        assert_eq!(context.make_project("Again").id(), 2);
        Ok(())
    }

    #[test]
    fn add_project_rejects_duplicates_and_invalid() {
        let mut context = Context::new();
        assert!(context.add_project(Project::new(1, "One")));
        assert!(!context.add_project(Project::new(1, "Other")));
        assert!(!context.add_project(Project::new(2, "")));
        assert!(!context.add_project(Project::new(INVALID_PROJECT_ID, "Nope")));

        assert_eq!(context.find_project(1).map(|p| p.name.as_str()), Some("One"));
        assert!(context.find_project(2).is_none());
        assert_eq!(context.list_projects(), vec![1]);
    }

    #[test]
    fn add_project_stores_trimmed_texts() {
        let mut context = Context::new();
        assert!(!context.add_project(Project::new(1, "  ")));
        assert!(context.add_project(Project::new(2, " Padded ").with_annotation(" note\n")));

        let project = context.find_project(2).expect("added");
        assert_eq!(project.name, "Padded");
        assert_eq!(project.annotation, "note");
        assert_eq!(context.list_projects(), vec![2]);
    }

    #[test]
    fn add_month_rejects_duplicates_without_altering() {
        let mut context = context_with_projects(&["One"]);

        let mut month = Month::new(2024, 3);
        assert!(month.add(Item::new(1).with_activity("original")));
        assert!(context.add_month(month));

        let mut duplicate = Month::new(2024, 3);
        assert!(duplicate.add(Item::new(1).with_activity("duplicate")));
        assert!(duplicate.add(Item::new(1)));
        assert!(!context.add_month(duplicate));

        let stored = context.find_month(202403).expect("month was added");
        assert_eq!(stored.items.len(), 1);
        assert_eq!(stored.items[0].activity, "original");

        assert!(!context.add_month(Month::new(1999, 1)));
        assert!(!context.add_month(Month::new(2024, 13)));
    }

    #[test]
    fn months_are_listed_newest_first() {
        let mut context = Context::new();
        for (year, month) in [(2024, 2), (2023, 11), (2024, 10), (2024, 1)] {
            assert!(context.add_month(Month::new(year, month)));
        }
        assert_eq!(context.list_months(), vec![202410, 202402, 202401, 202311]);
        assert!(context.is_month(202311));
        assert!(!context.is_month(202312));
    }

    #[test]
    fn modified_flag_tracks_edits() -> Result<()> {
        let mut context = context_with_projects(&["One"]);
        assert!(context.is_modified());
        context.clear_modified();

        assert!(!context.add_project(Project::new(1, "One")));
        assert!(!context.is_modified());

        assert!(context.add_month(Month::new(2024, 3)));
        assert!(context.is_modified());
        context.clear_modified();

        let row = context.add_item(202403, 1, "coding")?;
        assert_eq!(row, 0);
        assert!(context.is_modified());
        context.clear_modified();

        context.set_hours(202403, row, 1, 7.5)?;
        assert!(context.is_modified());

        context.clear();
        assert!(context.is_empty());
        assert!(!context.is_modified());
        Ok(())
    }

    #[test]
    fn validity_follows_project_references() {
        let mut context = context_with_projects(&["One"]);
        let mut month = Month::new(2024, 3);
        assert!(month.add(Item::new(1)));
        assert!(context.add_month(month));
        assert!(context.is_valid());

        let mut month = Month::new(2024, 4);
        assert!(month.add(Item::new(2)));
        assert!(context.add_month(month));
        assert!(!context.is_valid());

        assert_eq!(context.missing_projects().into_iter().collect::<Vec<_>>(), vec![2]);

        assert!(context.add_project(Project::new(2, "Two")));
        assert!(context.is_valid());
        assert!(context.missing_projects().is_empty());
    }

    #[test]
    fn item_edits() -> Result<()> {
        let mut context = context_with_projects(&["One", "Two"]);
        assert!(context.add_month(Month::new(2024, 2)));

        assert_eq!(
            context.add_item(202402, 3, ""),
            Err(ContextError::UnknownProject(3))
        );
        assert_eq!(
            context.add_item(202403, 1, ""),
            Err(ContextError::UnknownMonth(202403))
        );

        let row = context.add_item(202402, 1, "support")?;
        context.set_activity(202402, row, "hotline")?;
        context.set_item_project(202402, row, 2)?;
        context.set_hours(202402, row, 29, 3.)?;

        assert_eq!(
            context.set_hours(202402, row, 30, 1.),
            Err(ContextError::DayOutOfRange {
                month: 202402,
                day: 30
            })
        );
        assert_eq!(
            context.set_hours(202402, row, 0, 1.),
            Err(ContextError::DayOutOfRange {
                month: 202402,
                day: 0
            })
        );
        assert_eq!(
            context.set_hours(202402, row, 1, -1.),
            Err(ContextError::InvalidHours(-1.))
        );
        assert_eq!(
            context.set_hours(202402, 5, 1, 1.),
            Err(ContextError::UnknownItem {
                month: 202402,
                row: 5
            })
        );

        let month = context.find_month(202402).expect("month exists");
        let item = &month.items[row];
        assert_eq!(item.activity, "hotline");
        assert_eq!(item.project_id, 2);
        assert_eq!(item.hours.get(28), 3.);

        let removed = context.remove_item(202402, row)?;
        assert_eq!(removed.activity, "hotline");
        assert!(context.remove_item(202402, row).is_err());
        Ok(())
    }

    #[test]
    fn projects_in_use_cannot_be_removed() -> Result<()> {
        let mut context = context_with_projects(&["One", "Two"]);
        assert!(context.add_month(Month::new(2024, 2)));
        context.add_item(202402, 1, "")?;
        context.add_item(202402, 1, "")?;

        assert_eq!(
            context.remove_project(1),
            Err(ContextError::ProjectInUse { id: 1, items: 2 })
        );
        assert_eq!(
            context.remove_project(9),
            Err(ContextError::UnknownProject(9))
        );

        let removed = context.remove_project(2)?;
        assert_eq!(removed.name, "Two");
        assert!(context.is_valid());
        Ok(())
    }

    #[test]
    fn project_edits() -> Result<()> {
        let mut context = context_with_projects(&["One"]);
        context.rename_project(1, "  Renamed ")?;
        context.set_annotation(1, "internal")?;
        assert_eq!(context.rename_project(1, "  "), Err(ContextError::EmptyName));
        assert_eq!(
            context.rename_project(2, "x"),
            Err(ContextError::UnknownProject(2))
        );

        let project = context.find_project(1).expect("project exists");
        assert_eq!(project.name, "Renamed");
        assert_eq!(project.annotation, "internal");
        Ok(())
    }
}
