pub mod models;
pub mod services;

pub use linemark_types::{
    ChangeType, RelativePathPosition, ScrollTarget, VersionEntryStatus, VersionEntryType,
    VersionId,
};
pub use services::{Error, Result};
