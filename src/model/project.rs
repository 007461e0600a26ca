use std::fmt::Display;

pub type ProjectId = u32;

/// Marks "no project". Never assigned by [Context::make_project](super::Context::make_project).
pub const INVALID_PROJECT_ID: ProjectId = ProjectId::MAX;

/// A named work category hours are booked against.
#[derive(Debug, Clone, PartialEq)]
pub struct Project {
    id: ProjectId,
    pub name: String,
    pub annotation: String,
}

impl Default for Project {
    fn default() -> Self {
        Self {
            id: INVALID_PROJECT_ID,
            name: String::new(),
            annotation: String::new(),
        }
    }
}

impl Project {
    pub fn new(id: ProjectId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            annotation: String::new(),
        }
    }

    pub fn with_annotation(self, annotation: impl Into<String>) -> Self {
        Self {
            annotation: annotation.into(),
            ..self
        }
    }

    pub fn id(&self) -> ProjectId {
        self.id
    }

    pub fn is_valid(&self) -> bool {
        self.id != INVALID_PROJECT_ID && !self.name.trim().is_empty()
    }
}

impl Display for Project {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}

#[cfg(test)]
mod project_tests {
    use super::{INVALID_PROJECT_ID, Project};

    #[test]
    fn validity_needs_id_and_name() {
        assert!(Project::new(1, "Support").is_valid());
        assert!(Project::new(0, "Zero is a usable id").is_valid());
        assert!(!Project::new(1, "").is_valid());
        assert!(!Project::new(1, " \t ").is_valid());
        assert!(!Project::new(INVALID_PROJECT_ID, "Support").is_valid());
        assert!(!Project::default().is_valid());
    }

    #[test]
    fn annotation_defaults_to_empty() {
        let project = Project::new(3, "Research");
        assert_eq!(project.annotation, "");

        let project = project.with_annotation("billable");
        assert_eq!(project.id(), 3);
        assert_eq!(project.annotation, "billable");
    }
}
