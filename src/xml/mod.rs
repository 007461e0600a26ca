//! XML persistence of a [Context](crate::model::Context).
//!
//! ```text
//! <HourGlass>
//!   <projects>
//!     <project pid="1"><name>..</name><annotation>..</annotation></project>
//!   </projects>
//!   <months>
//!     <month mid="202403">
//!       <items>
//!         <item pid="1">
//!           <activity>..</activity>
//!           <hours><day did="0">7.50</day></hours>
//!         </item>
//!       </items>
//!     </month>
//!   </months>
//! </HourGlass>
//! ```
//!
//! Every container is optional. `did` is the zero based day slot, `mid` is `year * 100 + month`.

mod read;
pub mod tags;
mod tree;
mod write;

use quick_xml::events::attributes::AttrError;
use thiserror::Error;

use crate::model::{MonthId, ProjectId};

pub use read::{read, read_into};
pub use write::write;

#[derive(Error, Debug)]
pub enum XmlError {
    #[error("Malformed XML at byte {position}: {source}")]
    Syntax {
        position: u64,
        #[source]
        source: quick_xml::Error,
    },
    #[error("Malformed XML attribute: {0}")]
    Attribute(#[from] AttrError),
    #[error("Malformed XML: {0}")]
    Malformed(String),
    #[error("Root element <{}> not found", tags::HOURGLASS)]
    MissingRoot,
    #[error("Project without a valid id")]
    InvalidProjectId,
    #[error("Project {0} has no name")]
    MissingProjectName(ProjectId),
    #[error("Project {0} is invalid or defined twice")]
    RejectedProject(ProjectId),
    #[error("Month without a valid id")]
    InvalidMonthId,
    #[error("Month {0} is invalid or defined twice")]
    RejectedMonth(MonthId),
    #[error("Item of month {0} without a valid project id")]
    InvalidItemProject(MonthId),
    #[error("Day index {0:?} is outside of 0..=30")]
    InvalidDay(String),
    #[error("Cannot read hours from {0:?}")]
    InvalidHours(String),
    #[error("Failed to write XML: {0}")]
    Encode(#[from] quick_xml::Error),
    #[error("Failed to write XML: {0}")]
    Io(#[from] std::io::Error),
}
