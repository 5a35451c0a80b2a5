mod entry;
mod navigation;
mod version_id;

pub use entry::{VersionChannel, VersionEntryStatus, VersionEntryType};
pub use navigation::{ChangeType, RelativePathPosition, ScrollTarget};
pub use version_id::VersionId;
