use std::path::{Path, PathBuf};

use tracing::info;

use crate::{model::Context, utils::clock::Clock};

use super::{StorageError, backup_hours_file, read_hours_file, write_hours_file};

/// The hours file currently being worked on.
pub struct Session {
    context: Context,
    path: Option<PathBuf>,
    clock: Box<dyn Clock>,
}

impl Session {
    /// Starts with an empty context that is not bound to any file yet.
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self {
            context: Context::new(),
            path: None,
            clock,
        }
    }

    pub fn open(path: impl Into<PathBuf>, clock: Box<dyn Clock>) -> Result<Self, StorageError> {
        let path = path.into();
        let context = read_hours_file(&path)?;
        info!(
            "Opened {path:?} with {} projects and {} months",
            context.list_projects().len(),
            context.list_months().len()
        );

        Ok(Self {
            context,
            path: Some(path),
            clock,
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Edits through this reference mark the context as modified.
    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    pub fn clock(&self) -> &dyn Clock {
        self.clock.as_ref()
    }

    pub fn is_modified(&self) -> bool {
        self.context.is_modified()
    }

    /// Backs up the previous content of the file, then writes the context over it.
    pub fn save(&mut self) -> Result<(), StorageError> {
        let path = self.path.as_deref().ok_or(StorageError::NoPath)?;
        backup_hours_file(path, self.clock.as_ref())?;
        write_hours_file(path, &self.context)?;

        info!("Saved {path:?}");
        self.context.clear_modified();
        Ok(())
    }

    /// Binds the session to `path` and saves there.
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), StorageError> {
        self.path = Some(path.into());
        self.save()
    }

    /// Drops all data and forgets the file.
    pub fn clear(&mut self) {
        self.context.clear();
        self.path = None;
    }
}
