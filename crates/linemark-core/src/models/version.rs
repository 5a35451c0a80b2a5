use serde::Serialize;

use linemark_types::{VersionChannel, VersionEntryType, VersionId};

use super::LocalizedStringMap;
use super::diff::DiffInfo;
use super::entry::VersionEntry;
use super::external::{
    ExternalVersion, ExternalVersionAddon, ExternalVersionFile, ExternalVersionsListItem,
};
use crate::services::entry_status::parent_folders;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionAddon {
    pub icon_url: String,
    pub id: u64,
    pub name: LocalizedStringMap,
    pub slug: String,
}

impl From<&ExternalVersionAddon> for VersionAddon {
    fn from(addon: &ExternalVersionAddon) -> Self {
        Self {
            icon_url: addon.icon_url.clone(),
            id: addon.id,
            name: addon.name.clone(),
            slug: addon.slug.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Version {
    pub addon: VersionAddon,
    pub entries: Vec<VersionEntry>,
    pub expanded_paths: Vec<String>,
    pub id: VersionId,
    pub reviewed: String,
    pub selected_path: String,
    pub validation_url: String,
    pub visible_selected_path: Option<String>,
    pub version: String,
}

impl Version {
    pub fn from_external(version: &ExternalVersion) -> Self {
        Self {
            addon: VersionAddon::from(&version.addon),
            entries: version
                .file
                .entries
                .values()
                .map(VersionEntry::from)
                .collect(),
            expanded_paths: parent_folders(&version.file.selected_file),
            id: version.id,
            reviewed: version.reviewed.clone(),
            selected_path: version.file.selected_file.clone(),
            validation_url: version.validation_url_json.clone(),
            visible_selected_path: None,
            version: version.version.clone(),
        }
    }

    pub fn entry(&self, path: &str) -> Option<&VersionEntry> {
        self.entries.iter().find(|e| e.path == path)
    }

    /// Paths of every non-directory entry, in listing order.
    pub fn file_paths(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|e| e.entry_type != VersionEntryType::Directory)
            .map(|e| e.path.clone())
            .collect()
    }
}

/// File content as stored per version; [`VersionFile`] joins it with the entry metadata.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StoredVersionFile {
    pub content: String,
    pub created: String,
    pub download_url: Option<String>,
    pub id: u64,
    pub size: u64,
}

impl StoredVersionFile {
    /// Returns `None` for a file payload that carries a diff instead of content.
    pub fn from_external(file: &ExternalVersionFile) -> Option<Self> {
        Some(Self {
            content: file.content.clone()?,
            created: file.created.clone(),
            download_url: file.download_url.clone(),
            id: file.id,
            size: file.size,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionFile {
    pub content: String,
    pub created: String,
    pub download_url: Option<String>,
    pub filename: String,
    pub id: u64,
    pub mime_type: String,
    pub path: String,
    pub sha256: String,
    pub size: u64,
    #[serde(rename = "type")]
    pub entry_type: VersionEntryType,
    pub version: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionsListItem {
    pub channel: VersionChannel,
    pub id: VersionId,
    pub version: String,
}

impl From<&ExternalVersionsListItem> for VersionsListItem {
    fn from(item: &ExternalVersionsListItem) -> Self {
        Self {
            channel: item.channel,
            id: item.id,
            version: item.version.clone(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct VersionsMap {
    pub listed: Vec<VersionsListItem>,
    pub unlisted: Vec<VersionsListItem>,
}

impl VersionsMap {
    pub fn from_external(versions: &[ExternalVersionsListItem]) -> Self {
        let (listed, unlisted) = versions
            .iter()
            .map(VersionsListItem::from)
            .partition(|v| v.channel == VersionChannel::Listed);
        Self { listed, unlisted }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareInfo {
    pub diff: Option<DiffInfo>,
    pub mime_type: String,
}

/// Identifies one compare request: `addonId/baseVersionId/headVersionId/path`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompareInfoKey {
    pub addon_id: u64,
    pub base_version_id: VersionId,
    pub head_version_id: VersionId,
    pub path: Option<String>,
}

impl std::fmt::Display for CompareInfoKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}/{}/{}/{}",
            self.addon_id,
            self.base_version_id,
            self.head_version_id,
            self.path.as_deref().unwrap_or("")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(channel: VersionChannel, id: u64) -> ExternalVersionsListItem {
        ExternalVersionsListItem {
            channel,
            id: VersionId::new(id),
            version: format!("1.{id}"),
        }
    }

    #[test]
    fn versions_map_splits_by_channel() {
        let map = VersionsMap::from_external(&[
            item(VersionChannel::Listed, 1),
            item(VersionChannel::Unlisted, 2),
            item(VersionChannel::Listed, 3),
        ]);
        let listed: Vec<u64> = map.listed.iter().map(|v| v.id.get()).collect();
        assert_eq!(listed, [1, 3]);
        assert_eq!(map.unlisted.len(), 1);
    }

    #[test]
    fn compare_info_key_without_path() {
        let key = CompareInfoKey {
            addon_id: 4,
            base_version_id: VersionId::new(1),
            head_version_id: VersionId::new(2),
            path: None,
        };
        assert_eq!(key.to_string(), "4/1/2/");
    }
}
