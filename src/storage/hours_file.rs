use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use fs4::fs_std::FileExt;
use thiserror::Error;
use tracing::{debug, info};

use crate::{
    model::{Context, ProjectId},
    utils::clock::Clock,
    xml::{self, XmlError},
};

/// Directory next to the hours file that receives the backups.
pub const BACKUP_DIR: &str = "bakhours";

const BACKUP_TIME_FORMAT: &str = "%Y%m%d-%H%M%S";

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Unable to open file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unable to read XML file {path:?}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: XmlError,
    },
    #[error("Invalid hours file {path:?}, items reference unknown projects {missing:?}")]
    InvalidContext {
        path: PathBuf,
        missing: Vec<ProjectId>,
    },
    #[error("Unable to create XML: {0}")]
    Encode(#[source] XmlError),
    #[error("Unable to save file {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Unable to back up {path:?}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("No file name was given to save to")]
    NoPath,
}

/// Reads and decodes a whole hours file. A file whose items reference unknown projects is
/// refused.
pub fn read_hours_file(path: &Path) -> Result<Context, StorageError> {
    debug!("Reading {path:?}");
    let content = fs::read_to_string(path).map_err(|source| StorageError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let mut context = xml::read(&content).map_err(|source| StorageError::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let missing = context.missing_projects();
    if !missing.is_empty() {
        return Err(StorageError::InvalidContext {
            path: path.to_path_buf(),
            missing: missing.into_iter().collect(),
        });
    }

    context.clear_modified();
    Ok(context)
}

/// Encodes `context` in memory, then replaces the content of `path` while holding an exclusive
/// lock on it.
pub fn write_hours_file(path: &Path, context: &Context) -> Result<(), StorageError> {
    let content = xml::write(context).map_err(StorageError::Encode)?;
    let into_error = |source| StorageError::Write {
        path: path.to_path_buf(),
        source,
    };

    let mut file = File::options()
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)
        .map_err(into_error)?;

    FileExt::lock_exclusive(&file).map_err(into_error)?;
    let result = replace_content(&mut file, content.as_bytes());
    FileExt::unlock(&file).map_err(into_error)?;
    result.map_err(into_error)?;

    debug!("Wrote {} bytes to {path:?}", content.len());
    Ok(())
}

fn replace_content(file: &mut File, content: &[u8]) -> io::Result<()> {
    file.set_len(0)?;
    file.write_all(content)?;
    file.sync_all()
}

/// Copies an existing hours file into [BACKUP_DIR] next to it, stamped with the current time.
/// Returns the path of the copy, or `None` when there was nothing to back up.
pub fn backup_hours_file(path: &Path, clock: &dyn Clock) -> Result<Option<PathBuf>, StorageError> {
    if !path.exists() {
        return Ok(None);
    }
    let into_error = |source| StorageError::Backup {
        path: path.to_path_buf(),
        source,
    };

    let path = path.canonicalize().map_err(into_error)?;
    let backup_dir = path
        .parent()
        .map(|dir| dir.join(BACKUP_DIR))
        .unwrap_or_else(|| PathBuf::from(BACKUP_DIR));
    fs::create_dir_all(&backup_dir).map_err(into_error)?;

    let target = backup_dir.join(backup_file_name(&path, clock));
    fs::copy(&path, &target).map_err(into_error)?;

    info!("Backed up {path:?} to {target:?}");
    Ok(Some(target))
}

fn backup_file_name(path: &Path, clock: &dyn Clock) -> String {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .unwrap_or_default();
    let time = clock.now().format(BACKUP_TIME_FORMAT);

    match path.extension() {
        Some(extension) => format!("{stem}-{time}.{}", extension.to_string_lossy()),
        None => format!("{stem}-{time}"),
    }
}
