use linemark_types::VersionEntryStatus;

use crate::models::external::ExternalVersionEntry;
use crate::models::{EntryStatusMap, VersionEntry};

/// Path of the implicit root node of a version's file tree.
pub const ROOT_PATH: &str = "~root~";

/// Statuses that decide a subtree's badge, strongest first.
///
/// Renamed and copied are deliberately absent: a subtree holding only those
/// reports whatever status its first entry has.
const STATUS_PRIORITY: [VersionEntryStatus; 3] = [
    VersionEntryStatus::Added,
    VersionEntryStatus::Modified,
    VersionEntryStatus::Deleted,
];

/// Projects the status reported for each entry into a per-path map.
/// Entries without a status are recorded as unchanged.
pub fn create_entry_status_map<'a, I>(entries: I) -> EntryStatusMap
where
    I: IntoIterator<Item = &'a ExternalVersionEntry>,
{
    entries
        .into_iter()
        .map(|entry| (entry.path.clone(), entry.status.unwrap_or_default()))
        .collect()
}

/// The status a directory (or file) badge should show for `path`.
///
/// Looks at every entry whose path starts with `path`, including the entry
/// itself, and returns the first status of [`STATUS_PRIORITY`] present among
/// them. Falls back to the first matched entry's status, and to `None` when no
/// entry matched. `entries` must already be in listing order.
pub fn most_relevant_status(
    entries: &[VersionEntry],
    status_map: &EntryStatusMap,
    path: &str,
) -> Option<VersionEntryStatus> {
    let statuses: Vec<VersionEntryStatus> = entries
        .iter()
        .filter(|e| e.path.starts_with(path))
        .map(|e| status_map.status(&e.path))
        .collect();

    STATUS_PRIORITY
        .into_iter()
        .find(|p| statuses.contains(p))
        .or_else(|| statuses.first().copied())
}

/// [`ROOT_PATH`] followed by every ancestor folder of `path`, nearest last.
///
/// `"lib/ui/panel.js"` yields `["~root~", "lib/ui", "lib"]`.
pub fn parent_folders(path: &str) -> Vec<String> {
    let mut parents = vec![ROOT_PATH.to_string()];
    let mut folders: Vec<&str> = path.split('/').collect();

    while folders.len() > 1 {
        folders.pop();
        parents.push(folders.join("/"));
    }

    parents
}

#[cfg(test)]
mod tests {
    use linemark_types::VersionEntryType;

    use super::*;

    fn entry(path: &str) -> VersionEntry {
        VersionEntry {
            depth: path.matches('/').count() as u32,
            filename: path.rsplit('/').next().unwrap_or(path).to_string(),
            mime_type: "text/plain".to_string(),
            modified: String::new(),
            path: path.to_string(),
            sha256: String::new(),
            entry_type: VersionEntryType::Text,
        }
    }

    fn fixture(items: &[(&str, VersionEntryStatus)]) -> (Vec<VersionEntry>, EntryStatusMap) {
        let entries = items.iter().map(|(path, _)| entry(path)).collect();
        let map = items
            .iter()
            .map(|(path, status)| (path.to_string(), *status))
            .collect();
        (entries, map)
    }

    #[test]
    fn added_wins_over_modified() {
        let (entries, map) = fixture(&[
            ("a", VersionEntryStatus::Modified),
            ("a/b", VersionEntryStatus::Added),
        ]);
        assert_eq!(
            most_relevant_status(&entries, &map, "a"),
            Some(VersionEntryStatus::Added)
        );
    }

    #[test]
    fn modified_wins_over_deleted() {
        let (entries, map) = fixture(&[
            ("lib", VersionEntryStatus::Unchanged),
            ("lib/a.js", VersionEntryStatus::Deleted),
            ("lib/b.js", VersionEntryStatus::Modified),
        ]);
        assert_eq!(
            most_relevant_status(&entries, &map, "lib"),
            Some(VersionEntryStatus::Modified)
        );
    }

    #[test]
    fn unchanged_subtree_reports_unchanged() {
        let (entries, map) = fixture(&[
            ("lib", VersionEntryStatus::Unchanged),
            ("lib/a.js", VersionEntryStatus::Unchanged),
        ]);
        assert_eq!(
            most_relevant_status(&entries, &map, "lib"),
            Some(VersionEntryStatus::Unchanged)
        );
    }

    #[test]
    fn empty_subtree_reports_nothing() {
        let (entries, map) = fixture(&[("lib/a.js", VersionEntryStatus::Added)]);
        assert_eq!(most_relevant_status(&entries, &map, "src"), None);
    }

    // Renamed/copied are not part of the priority scan, so the first entry's
    // status wins even when it is weaker.
    #[test]
    fn renamed_is_outside_the_priority_scan() {
        let (entries, map) = fixture(&[
            ("lib", VersionEntryStatus::Unchanged),
            ("lib/a.js", VersionEntryStatus::Renamed),
            ("lib/b.js", VersionEntryStatus::Copied),
        ]);
        assert_eq!(
            most_relevant_status(&entries, &map, "lib"),
            Some(VersionEntryStatus::Unchanged)
        );
    }

    #[test]
    fn status_map_defaults_missing_statuses() {
        let external = ExternalVersionEntry {
            depth: 0,
            filename: "a.js".to_string(),
            mime_category: VersionEntryType::Text,
            mimetype: "application/javascript".to_string(),
            modified: String::new(),
            path: "a.js".to_string(),
            sha256: String::new(),
            size: None,
            status: None,
        };
        let map = create_entry_status_map([&external]);
        assert_eq!(map.get("a.js"), Some(VersionEntryStatus::Unchanged));
        assert_eq!(map.len(), 1);
    }

    #[test]
    fn parent_folders_lists_ancestors() {
        assert_eq!(parent_folders("lib/ui/panel.js"), [ROOT_PATH, "lib/ui", "lib"]);
        assert_eq!(parent_folders("manifest.json"), [ROOT_PATH]);
    }
}
