use std::path::{Path, PathBuf};

use linemark_core::models::DiffInfo;
use linemark_core::models::external::{ExternalDiff, ExternalVersion};
use linemark_types::VersionId;
use serde_json::{Value, json};
use tempfile::TempDir;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

type Result<T> = std::result::Result<T, Error>;

/// Builds the JSON payload the review API returns for one version.
#[derive(Clone, Debug)]
pub struct VersionBuilder {
    id: u64,
    addon_id: u64,
    version: String,
    selected_file: Option<String>,
    entries: Vec<(String, Value)>,
    content: Option<String>,
    diff: Option<Value>,
}

impl VersionBuilder {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            addon_id: 1,
            version: format!("1.0.{id}"),
            selected_file: None,
            entries: Vec::new(),
            content: None,
            diff: None,
        }
    }

    pub fn addon(mut self, addon_id: u64) -> Self {
        self.addon_id = addon_id;
        self
    }

    pub fn directory(self, path: &str) -> Self {
        self.entry(path, "directory", "", "")
    }

    /// A text file; `status` is the API's one-letter code (`""` for unchanged).
    pub fn file(self, path: &str, status: &str) -> Self {
        self.entry(path, "text", "application/javascript", status)
    }

    pub fn entry(mut self, path: &str, mime_category: &str, mimetype: &str, status: &str) -> Self {
        let filename = path.rsplit('/').next().unwrap_or(path);
        self.entries.push((
            path.to_string(),
            json!({
                "depth": path.matches('/').count(),
                "filename": filename,
                "mime_category": mime_category,
                "mimetype": mimetype,
                "modified": "2019-01-01T00:00:00Z",
                "path": path,
                "sha256": format!("sha-{path}"),
                "size": null,
                "status": status,
            }),
        ));
        self
    }

    /// Defaults to the first entry added.
    pub fn selected(mut self, path: &str) -> Self {
        self.selected_file = Some(path.to_string());
        self
    }

    pub fn content(mut self, content: &str) -> Self {
        self.content = Some(content.to_string());
        self
    }

    pub fn diff(mut self, diff: DiffBuilder) -> Self {
        self.diff = Some(diff.to_json());
        self
    }

    pub fn version_id(&self) -> VersionId {
        VersionId::new(self.id)
    }

    pub fn to_json(&self) -> Value {
        let selected_file = self
            .selected_file
            .clone()
            .or_else(|| self.entries.first().map(|(path, _)| path.clone()))
            .unwrap_or_default();
        let entries: serde_json::Map<String, Value> = self.entries.iter().cloned().collect();

        let mut file = json!({
            "created": "2019-01-01T00:00:00Z",
            "download_url": null,
            "entries": entries,
            "id": self.id * 100,
            "selected_file": selected_file,
            "size": 0,
        });
        if let Some(content) = &self.content {
            file["content"] = json!(content);
        }
        if let Some(diff) = &self.diff {
            file["diff"] = diff.clone();
        }

        json!({
            "addon": {
                "icon_url": "https://example.org/icon.png",
                "id": self.addon_id,
                "name": {"en-US": "Test Add-on"},
                "slug": "test-addon",
            },
            "id": self.id,
            "reviewed": "2019-01-02T00:00:00Z",
            "validation_url_json": format!("https://example.org/validation/{}.json", self.id),
            "version": self.version,
            "file": file,
        })
    }

    pub fn build(&self) -> Result<ExternalVersion> {
        Ok(serde_json::from_value(self.to_json())?)
    }

    pub fn paths(&self) -> Vec<String> {
        self.entries.iter().map(|(path, _)| path.clone()).collect()
    }
}

/// Builds the `diff` object of a compare payload.
#[derive(Clone, Debug)]
pub struct DiffBuilder {
    path: String,
    mode: String,
    hunks: Vec<HunkBuilder>,
}

impl DiffBuilder {
    pub fn new(path: &str) -> Self {
        Self {
            path: path.to_string(),
            mode: "M".to_string(),
            hunks: Vec::new(),
        }
    }

    pub fn mode(mut self, mode: &str) -> Self {
        self.mode = mode.to_string();
        self
    }

    pub fn hunk(mut self, hunk: HunkBuilder) -> Self {
        self.hunks.push(hunk);
        self
    }

    pub fn to_json(&self) -> Value {
        json!({
            "hunks": self.hunks.iter().map(HunkBuilder::to_json).collect::<Vec<_>>(),
            "is_binary": false,
            "lines_added": 0,
            "lines_deleted": 0,
            "mode": self.mode,
            "new_ending_new_line": true,
            "old_ending_new_line": true,
            "old_path": self.path,
            "path": self.path,
        })
    }

    pub fn build_external(&self) -> Result<ExternalDiff> {
        Ok(serde_json::from_value(self.to_json())?)
    }

    pub fn build(&self, base: u64, head: u64) -> Result<DiffInfo> {
        Ok(DiffInfo::from_external(
            &self.build_external()?,
            VersionId::new(base),
            VersionId::new(head),
        ))
    }
}

/// Changes of one hunk, in file order. The missing side of inserts and
/// deletes is sent as `-1`, like the API does.
#[derive(Clone, Debug, Default)]
pub struct HunkBuilder {
    changes: Vec<Value>,
}

impl HunkBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normal(self, old: i64, new: i64) -> Self {
        self.change("normal", old, new)
    }

    pub fn insert(self, new: i64) -> Self {
        self.change("insert", -1, new)
    }

    pub fn delete(self, old: i64) -> Self {
        self.change("delete", old, -1)
    }

    fn change(mut self, change_type: &str, old: i64, new: i64) -> Self {
        self.changes.push(json!({
            "content": format!("{change_type} {old} {new}"),
            "new_line_number": new,
            "old_line_number": old,
            "type": change_type,
        }));
        self
    }

    fn to_json(&self) -> Value {
        let count = self.changes.len();
        json!({
            "changes": self.changes,
            "header": format!("@@ -1,{count} +1,{count} @@"),
            "new_lines": count,
            "new_start": 1,
            "old_lines": count,
            "old_start": 1,
        })
    }
}

/// A temporary directory holding payload files for loader tests.
pub struct Fixture {
    _dir: TempDir,
}

impl Fixture {
    pub fn new() -> Result<Self> {
        Ok(Self {
            _dir: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self._dir.path()
    }

    pub fn write_file(&self, path: &str, content: &str) -> Result<PathBuf> {
        let file_path = self._dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&file_path, content)?;
        Ok(file_path)
    }

    pub fn write_json(&self, path: &str, value: &Value) -> Result<PathBuf> {
        self.write_file(path, &serde_json::to_string_pretty(value)?)
    }
}
