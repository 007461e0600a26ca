//! Hours files on disk: reading, locked writing, timestamped backups and the [Session] that ties
//! them to one [Context](crate::model::Context).

mod hours_file;
mod session;

pub use hours_file::{
    BACKUP_DIR, StorageError, backup_hours_file, read_hours_file, write_hours_file,
};
pub use session::Session;
