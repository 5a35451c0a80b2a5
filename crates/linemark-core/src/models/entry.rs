use std::collections::BTreeMap;

use serde::Serialize;

use linemark_types::{VersionEntryStatus, VersionEntryType, VersionId};

use super::external::ExternalVersionEntry;

/// One file or directory node of a version's file listing.
///
/// Entries carry no parent/child pointers: the tree is implied by path
/// prefixes and `depth`, and a version's entry list is ordered so that a
/// directory's descendants follow it contiguously.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionEntry {
    pub depth: u32,
    /// Basename of the entry
    pub filename: String,
    pub mime_type: String,
    pub modified: String,
    /// Relative path, including directories
    pub path: String,
    pub sha256: String,
    #[serde(rename = "type")]
    pub entry_type: VersionEntryType,
}

impl From<&ExternalVersionEntry> for VersionEntry {
    fn from(entry: &ExternalVersionEntry) -> Self {
        Self {
            depth: entry.depth,
            filename: entry.filename.clone(),
            mime_type: entry.mimetype.clone(),
            modified: entry.modified.clone(),
            path: entry.path.clone(),
            sha256: entry.sha256.clone(),
            entry_type: entry.mime_category,
        }
    }
}

/// Per-path change status of a version relative to the version it is compared to.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct EntryStatusMap(BTreeMap<String, VersionEntryStatus>);

impl EntryStatusMap {
    /// Status recorded for `path`, if the path is known at all.
    pub fn get(&self, path: &str) -> Option<VersionEntryStatus> {
        self.0.get(path).copied()
    }

    /// Status of `path`, treating unknown paths as unchanged.
    pub fn status(&self, path: &str) -> VersionEntryStatus {
        self.get(path).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, VersionEntryStatus)> {
        self.0.iter().map(|(path, status)| (path.as_str(), *status))
    }
}

impl FromIterator<(String, VersionEntryStatus)> for EntryStatusMap {
    fn from_iter<I: IntoIterator<Item = (String, VersionEntryStatus)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Cache key of an [`EntryStatusMap`]: the status of a version only means
/// something relative to the version it was compared to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct EntryStatusMapKey {
    pub version_id: VersionId,
    pub compared_to_version_id: Option<VersionId>,
}

impl EntryStatusMapKey {
    pub fn new(version_id: VersionId, compared_to_version_id: Option<VersionId>) -> Self {
        Self {
            version_id,
            compared_to_version_id,
        }
    }
}

impl std::fmt::Display for EntryStatusMapKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "versionId={};comparedToVersionId=", self.version_id)?;
        match self.compared_to_version_id {
            Some(id) => write!(f, "{id}"),
            None => f.write_str("null"),
        }
    }
}
