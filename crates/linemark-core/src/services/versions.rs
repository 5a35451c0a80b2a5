//! Cache of everything loaded about the versions under review.
//!
//! Every transition replaces the affected value wholesale; nothing handed out
//! by a selector is mutated afterwards.

use std::collections::{HashMap, HashSet};

use linemark_types::{RelativePathPosition, VersionEntryStatus, VersionEntryType, VersionId};

use super::entry_status::{ROOT_PATH, create_entry_status_map, most_relevant_status, parent_folders};
use super::relative_diff::{NavigationOutcome, RelativeDiffRequest, relative_diff};
use super::relative_path::RelativePathFinder;
use crate::models::external::{ExternalVersion, ExternalVersionsListItem};
use crate::models::{
    CompareInfo, CompareInfoKey, DiffInfo, EntryStatusMap, EntryStatusMapKey, StoredVersionFile,
    Version, VersionFile, VersionsMap,
};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Version missing for versionId: {0}")]
    VersionMissing(VersionId),

    #[error("No entry status map for {key}")]
    EntryStatusMapMissing { key: EntryStatusMapKey },

    #[error("Path \"{path}\" is an unknown path for version ID {version_id}")]
    UnknownPath { path: String, version_id: VersionId },

    #[error("Entry missing for path {path}, versionId: {version_id}")]
    EntryMissing { path: String, version_id: VersionId },

    #[error("Version {version_id} carries no content for {path}")]
    FileContentMissing { path: String, version_id: VersionId },
}

/// Progress of one fetch. Absence from the cache means "never requested".
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LoadState<T> {
    Loading,
    Loaded(T),
    Failed,
}

impl<T> LoadState<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            Self::Loaded(value) => Some(value),
            Self::Loading | Self::Failed => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Which version the page is showing.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum CurrentVersion {
    /// Not decided yet (e.g. still routing).
    #[default]
    Pending,
    /// Explicitly no version (e.g. the route has none).
    Unset,
    Set(VersionId),
}

/// Inputs of a "jump to the next/previous changed region" request.
#[derive(Clone, Copy, Debug)]
pub struct GoToRelativeDiff<'a> {
    pub version_id: VersionId,
    pub compared_to_version_id: Option<VersionId>,
    pub current_anchor: Option<&'a str>,
    pub diff: Option<&'a DiffInfo>,
    pub path_list: &'a [String],
    pub position: RelativePathPosition,
}

#[derive(Clone, Debug, Default)]
pub struct VersionsState {
    by_addon_id: HashMap<u64, VersionsMap>,
    compare_info: HashMap<CompareInfoKey, LoadState<CompareInfo>>,
    current_version: CurrentVersion,
    entry_status_maps: HashMap<EntryStatusMapKey, EntryStatusMap>,
    version_info: HashMap<VersionId, LoadState<Version>>,
    /// `None` marks a file whose fetch failed.
    version_files: HashMap<VersionId, HashMap<String, Option<StoredVersionFile>>>,
    version_files_loading: HashMap<VersionId, HashSet<String>>,
}

impl VersionsState {
    pub fn new() -> Self {
        Self::default()
    }

    // ---- version info ----

    pub fn begin_fetch_version(&mut self, version_id: VersionId) {
        self.version_info.insert(version_id, LoadState::Loading);
    }

    pub fn load_version_info(&mut self, version: &ExternalVersion) {
        self.version_info
            .insert(version.id, LoadState::Loaded(Version::from_external(version)));
    }

    pub fn abort_fetch_version(&mut self, version_id: VersionId) {
        self.version_info.insert(version_id, LoadState::Failed);
    }

    pub fn version_load_state(&self, version_id: VersionId) -> Option<&LoadState<Version>> {
        self.version_info.get(&version_id)
    }

    pub fn version_info(&self, version_id: VersionId) -> Option<&Version> {
        self.version_load_state(version_id)?.loaded()
    }

    fn loaded_version(&self, version_id: VersionId) -> Result<&Version> {
        self.version_info(version_id)
            .ok_or(Error::VersionMissing(version_id))
    }

    /// Applies `update` to a copy of the loaded version and stores the copy.
    fn replace_version(
        &mut self,
        version_id: VersionId,
        update: impl FnOnce(&mut Version) -> Result<()>,
    ) -> Result<()> {
        let mut version = self.loaded_version(version_id)?.clone();
        update(&mut version)?;
        self.version_info
            .insert(version_id, LoadState::Loaded(version));
        Ok(())
    }

    // ---- entry statuses ----

    pub fn load_entry_status_map(
        &mut self,
        version: &ExternalVersion,
        compared_to_version_id: Option<VersionId>,
    ) {
        let key = EntryStatusMapKey::new(version.id, compared_to_version_id);
        let map = create_entry_status_map(version.file.entries.values());
        log::debug!("loaded {} entry statuses for {key}", map.len());
        self.entry_status_maps.insert(key, map);
    }

    pub fn entry_status_map(
        &self,
        version_id: VersionId,
        compared_to_version_id: Option<VersionId>,
    ) -> Option<&EntryStatusMap> {
        self.entry_status_maps
            .get(&EntryStatusMapKey::new(version_id, compared_to_version_id))
    }

    /// Badge status of `path` (a file or a whole directory subtree).
    pub fn most_relevant_entry_status(
        &self,
        version_id: VersionId,
        compared_to_version_id: Option<VersionId>,
        path: &str,
    ) -> Option<VersionEntryStatus> {
        let version = self.version_info(version_id)?;
        let status_map = self.entry_status_map(version_id, compared_to_version_id)?;
        most_relevant_status(&version.entries, status_map, path)
    }

    // ---- version files ----

    pub fn begin_fetch_version_file(&mut self, version_id: VersionId, path: &str) {
        self.version_files_loading
            .entry(version_id)
            .or_default()
            .insert(path.to_string());
    }

    /// Stores the file content carried by `version` under `path`.
    pub fn load_version_file(&mut self, path: &str, version: &ExternalVersion) -> Result<()> {
        let file = StoredVersionFile::from_external(&version.file).ok_or_else(|| {
            Error::FileContentMissing {
                path: path.to_string(),
                version_id: version.id,
            }
        })?;
        self.store_version_file(version.id, path, Some(file));
        Ok(())
    }

    pub fn abort_fetch_version_file(&mut self, version_id: VersionId, path: &str) {
        self.store_version_file(version_id, path, None);
    }

    fn store_version_file(
        &mut self,
        version_id: VersionId,
        path: &str,
        file: Option<StoredVersionFile>,
    ) {
        self.version_files
            .entry(version_id)
            .or_default()
            .insert(path.to_string(), file);
        if let Some(loading) = self.version_files_loading.get_mut(&version_id) {
            loading.remove(path);
        }
    }

    pub fn is_file_loading(&self, version_id: VersionId, path: &str) -> bool {
        self.version_files_loading
            .get(&version_id)
            .is_some_and(|paths| paths.contains(path))
    }

    /// The file at `path` joined with its entry metadata.
    ///
    /// `None` when the version, the file, or the entry is not known (yet).
    pub fn version_file(&self, version_id: VersionId, path: &str) -> Option<LoadState<VersionFile>> {
        let version = self.version_info(version_id)?;
        let stored = match self
            .version_files
            .get(&version_id)
            .and_then(|files| files.get(path))
        {
            Some(Some(file)) => file,
            Some(None) => return Some(LoadState::Failed),
            None if self.is_file_loading(version_id, path) => return Some(LoadState::Loading),
            None => return None,
        };

        let Some(entry) = version.entry(path) else {
            log::debug!("Entry missing for path: {path}, versionId: {version_id}");
            return None;
        };

        Some(LoadState::Loaded(VersionFile {
            content: stored.content.clone(),
            created: stored.created.clone(),
            download_url: stored.download_url.clone(),
            filename: entry.filename.clone(),
            id: stored.id,
            mime_type: entry.mime_type.clone(),
            path: path.to_string(),
            sha256: entry.sha256.clone(),
            size: stored.size,
            entry_type: entry.entry_type,
            version: version.version.clone(),
        }))
    }

    // ---- file tree ----

    /// Selects `selected_path` and expands every folder above it.
    pub fn update_selected_path(&mut self, version_id: VersionId, selected_path: &str) -> Result<()> {
        self.replace_version(version_id, |version| {
            for parent in parent_folders(selected_path) {
                if !version.expanded_paths.contains(&parent) {
                    version.expanded_paths.push(parent);
                }
            }
            version.selected_path = selected_path.to_string();
            Ok(())
        })
    }

    pub fn set_visible_selected_path(
        &mut self,
        version_id: VersionId,
        path: Option<&str>,
    ) -> Result<()> {
        self.replace_version(version_id, |version| {
            if let Some(path) = path.filter(|p| version.entry(p).is_none()) {
                return Err(Error::UnknownPath {
                    path: path.to_string(),
                    version_id,
                });
            }
            version.visible_selected_path = path.map(str::to_string);
            Ok(())
        })
    }

    pub fn toggle_expanded_path(&mut self, version_id: VersionId, path: &str) -> Result<()> {
        self.replace_version(version_id, |version| {
            if let Some(i) = version.expanded_paths.iter().position(|p| p == path) {
                version.expanded_paths.remove(i);
            } else {
                version.expanded_paths.push(path.to_string());
            }
            Ok(())
        })
    }

    /// Expands every directory plus the root.
    pub fn expand_tree(&mut self, version_id: VersionId) -> Result<()> {
        self.replace_version(version_id, |version| {
            let mut expanded: Vec<String> = version
                .entries
                .iter()
                .filter(|e| e.entry_type == VersionEntryType::Directory)
                .map(|e| e.path.clone())
                .collect();
            expanded.push(ROOT_PATH.to_string());
            version.expanded_paths = expanded;
            Ok(())
        })
    }

    /// Collapses everything except the root.
    pub fn collapse_tree(&mut self, version_id: VersionId) -> Result<()> {
        self.replace_version(version_id, |version| {
            version.expanded_paths = vec![ROOT_PATH.to_string()];
            Ok(())
        })
    }

    // ---- versions list ----

    pub fn load_versions_list(&mut self, addon_id: u64, versions: &[ExternalVersionsListItem]) {
        self.by_addon_id
            .insert(addon_id, VersionsMap::from_external(versions));
    }

    pub fn versions_map(&self, addon_id: u64) -> Option<&VersionsMap> {
        self.by_addon_id.get(&addon_id)
    }

    // ---- compare info ----

    pub fn begin_fetch_diff(&mut self, key: CompareInfoKey) {
        self.compare_info.insert(key, LoadState::Loading);
    }

    pub fn abort_fetch_diff(&mut self, key: CompareInfoKey) {
        self.compare_info.insert(key, LoadState::Failed);
    }

    /// Stores the diff carried by `version` for `key`.
    ///
    /// The head version must be loaded and contain its selected entry; the
    /// entry provides the mime type of the compared file.
    pub fn load_diff(&mut self, key: CompareInfoKey, version: &ExternalVersion) -> Result<()> {
        let head = self.loaded_version(key.head_version_id)?;
        let entry = head
            .entry(&head.selected_path)
            .ok_or_else(|| Error::EntryMissing {
                path: head.selected_path.clone(),
                version_id: key.head_version_id,
            })?;

        let info = CompareInfo {
            diff: version.file.diff.as_ref().map(|diff| {
                DiffInfo::from_external(diff, key.base_version_id, key.head_version_id)
            }),
            mime_type: entry.mime_type.clone(),
        };
        self.compare_info.insert(key, LoadState::Loaded(info));
        Ok(())
    }

    pub fn compare_info(&self, key: &CompareInfoKey) -> Option<&LoadState<CompareInfo>> {
        self.compare_info.get(key)
    }

    pub fn is_compare_info_loading(&self, key: &CompareInfoKey) -> bool {
        self.compare_info(key).is_some_and(LoadState::is_loading)
    }

    // ---- current version ----

    pub fn set_current_version_id(&mut self, version_id: VersionId) {
        self.current_version = CurrentVersion::Set(version_id);
    }

    pub fn unset_current_version_id(&mut self) {
        self.current_version = CurrentVersion::Unset;
    }

    pub fn current_version(&self) -> CurrentVersion {
        self.current_version
    }

    pub fn current_version_info(&self) -> Option<&Version> {
        match self.current_version {
            CurrentVersion::Set(version_id) => self.version_info(version_id),
            CurrentVersion::Pending | CurrentVersion::Unset => None,
        }
    }

    // ---- navigation ----

    /// Resolves a "next/previous change" request against the loaded state.
    ///
    /// Navigating from the version's selected path needs both the version and
    /// its entry status map; a missing one is an error, not a silent no-op.
    pub fn go_to_relative_diff(
        &self,
        request: &GoToRelativeDiff<'_>,
        finder: &dyn RelativePathFinder,
    ) -> Result<NavigationOutcome> {
        let version = self.loaded_version(request.version_id)?;
        let entry_status_map = self
            .entry_status_map(request.version_id, request.compared_to_version_id)
            .ok_or_else(|| Error::EntryStatusMapMissing {
                key: EntryStatusMapKey::new(request.version_id, request.compared_to_version_id),
            })?;

        let result = relative_diff(
            &RelativeDiffRequest {
                current_anchor: request.current_anchor,
                diff: request.diff,
                current_path: &version.selected_path,
                entry_status_map,
                path_list: request.path_list,
                position: request.position,
            },
            finder,
        );
        Ok(result.into_outcome(request.position))
    }
}
