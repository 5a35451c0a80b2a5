//! Response shapes of the review API, as delivered by the fetching collaborator.
//!
//! Only the fields the core reads are declared; everything else in the payload
//! is ignored during deserialization.

use indexmap::IndexMap;
use serde::Deserialize;

use linemark_types::{
    ChangeType, VersionChannel, VersionEntryStatus, VersionEntryType, VersionId,
};

use super::LocalizedStringMap;

#[derive(Clone, Debug, Deserialize)]
pub struct ExternalVersionEntry {
    pub depth: u32,
    pub filename: String,
    pub mime_category: VersionEntryType,
    pub mimetype: String,
    pub modified: String,
    pub path: String,
    pub sha256: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub status: Option<VersionEntryStatus>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExternalChange {
    pub content: String,
    pub new_line_number: i64,
    pub old_line_number: i64,
    #[serde(rename = "type")]
    pub change_type: ChangeType,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExternalHunk {
    pub changes: Vec<ExternalChange>,
    pub header: String,
    pub new_lines: u32,
    pub new_start: u32,
    pub old_lines: u32,
    pub old_start: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExternalDiff {
    pub hunks: Vec<ExternalHunk>,
    pub is_binary: bool,
    #[serde(default)]
    pub lines_added: u32,
    #[serde(default)]
    pub lines_deleted: u32,
    pub mode: String,
    #[serde(default = "default_true")]
    pub new_ending_new_line: bool,
    #[serde(default = "default_true")]
    pub old_ending_new_line: bool,
    pub old_path: String,
    pub path: String,
}

fn default_true() -> bool {
    true
}

/// The `file` object of a version response. Depending on the endpoint it
/// carries either the selected file's `content` or its `diff`.
#[derive(Clone, Debug, Deserialize)]
pub struct ExternalVersionFile {
    pub created: String,
    #[serde(default)]
    pub download_url: Option<String>,
    /// Keyed by path, in depth-first order.
    pub entries: IndexMap<String, ExternalVersionEntry>,
    pub id: u64,
    pub selected_file: String,
    pub size: u64,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub diff: Option<ExternalDiff>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExternalVersionAddon {
    pub icon_url: String,
    pub id: u64,
    pub name: LocalizedStringMap,
    pub slug: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExternalVersion {
    pub addon: ExternalVersionAddon,
    pub id: VersionId,
    pub reviewed: String,
    pub validation_url_json: String,
    pub version: String,
    pub file: ExternalVersionFile,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ExternalVersionsListItem {
    pub channel: VersionChannel,
    pub id: VersionId,
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERSION_JSON: &str = r#"{
        "addon": {"icon_url": "https://example.org/i.png", "id": 7, "name": {"en-US": "Tabs"}, "slug": "tabs"},
        "id": 12,
        "reviewed": "2019-01-01T00:00:00Z",
        "validation_url_json": "https://example.org/validation.json",
        "version": "1.2",
        "url": "ignored",
        "file": {
            "created": "2019-01-01T00:00:00Z",
            "download_url": null,
            "entries": {
                "manifest.json": {"depth": 0, "filename": "manifest.json", "mime_category": "text",
                    "mimetype": "application/json", "modified": "x", "path": "manifest.json",
                    "sha256": "abc", "size": 12, "status": "M"},
                "lib": {"depth": 0, "filename": "lib", "mime_category": "directory",
                    "mimetype": "", "modified": "x", "path": "lib", "sha256": "", "size": null, "status": ""},
                "lib/a.js": {"depth": 1, "filename": "a.js", "mime_category": "text",
                    "mimetype": "application/javascript", "modified": "x", "path": "lib/a.js", "sha256": "def"}
            },
            "id": 99,
            "selected_file": "manifest.json",
            "size": 300,
            "diff": {
                "hunks": [{"changes": [
                    {"content": "a", "new_line_number": 1, "old_line_number": 1, "type": "normal"},
                    {"content": "b", "new_line_number": 2, "old_line_number": -1, "type": "insert"}
                ], "header": "@@ -1,1 +1,2 @@", "new_lines": 2, "new_start": 1, "old_lines": 1, "old_start": 1}],
                "is_binary": false, "mode": "M", "old_path": "manifest.json", "path": "manifest.json"
            }
        }
    }"#;

    #[test]
    fn deserializes_version_with_diff() {
        let version: ExternalVersion = serde_json::from_str(VERSION_JSON).unwrap();
        assert_eq!(version.id, VersionId::new(12));
        let paths: Vec<&str> = version.file.entries.keys().map(String::as_str).collect();
        assert_eq!(paths, ["manifest.json", "lib", "lib/a.js"]);
        assert_eq!(
            version.file.entries["manifest.json"].status,
            Some(VersionEntryStatus::Modified)
        );
        assert_eq!(version.file.entries["lib/a.js"].status, None);
        let diff = version.file.diff.unwrap();
        assert_eq!(diff.hunks[0].changes[1].old_line_number, -1);
        assert!(diff.new_ending_new_line);
    }
}
