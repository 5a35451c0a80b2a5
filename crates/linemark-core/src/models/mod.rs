use std::collections::BTreeMap;

mod diff;
mod entry;
pub mod external;
mod version;

pub use diff::{ChangeInfo, DiffInfo, DiffType, HunkInfo};
pub use entry::{EntryStatusMap, EntryStatusMapKey, VersionEntry};
pub use version::{
    CompareInfo, CompareInfoKey, StoredVersionFile, Version, VersionAddon, VersionFile,
    VersionsListItem, VersionsMap,
};

/// Locale code to translated string, e.g. `{"en-US": "Tab Manager"}`.
pub type LocalizedStringMap = BTreeMap<String, String>;
