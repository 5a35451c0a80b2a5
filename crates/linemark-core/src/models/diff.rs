use serde::Serialize;

use linemark_types::{ChangeType, VersionId};

use super::external::{ExternalChange, ExternalDiff, ExternalHunk};

/// Git-style classification of a whole-file diff.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiffType {
    Add,
    Copy,
    Delete,
    Modify,
    Rename,
}

impl DiffType {
    /// Maps the API's single-letter mode; unknown modes are treated as modifications.
    pub fn from_mode(mode: &str) -> Self {
        match mode {
            "A" => Self::Add,
            "C" => Self::Copy,
            "D" => Self::Delete,
            "R" => Self::Rename,
            _ => Self::Modify,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeInfo {
    #[serde(rename = "type")]
    pub change_type: ChangeType,
    pub old_line_number: u32,
    pub new_line_number: u32,
    pub content: String,
}

impl ChangeInfo {
    pub fn is_normal(&self) -> bool {
        self.change_type == ChangeType::Normal
    }

    pub fn is_insert(&self) -> bool {
        self.change_type == ChangeType::Insert
    }

    pub fn is_delete(&self) -> bool {
        self.change_type == ChangeType::Delete
    }

    /// The line this change is displayed at: the new side for inserts, the old side otherwise.
    pub fn line_number(&self) -> u32 {
        if self.is_insert() {
            self.new_line_number
        } else {
            self.old_line_number
        }
    }

    /// Diff-scoped anchor for this change (`N12`, `I40`, `D7`).
    ///
    /// These keys are a separate namespace from code line anchors.
    pub fn key(&self) -> String {
        match self.change_type {
            ChangeType::Normal => format!("N{}", self.old_line_number),
            ChangeType::Insert => format!("I{}", self.line_number()),
            ChangeType::Delete => format!("D{}", self.line_number()),
        }
    }
}

impl From<&ExternalChange> for ChangeInfo {
    fn from(change: &ExternalChange) -> Self {
        Self {
            change_type: change.change_type,
            old_line_number: clamp_line_number(change.old_line_number),
            new_line_number: clamp_line_number(change.new_line_number),
            content: change.content.clone(),
        }
    }
}

/// The API reports the missing side of an insert/delete as a negative number.
fn clamp_line_number(n: i64) -> u32 {
    u32::try_from(n).unwrap_or_default()
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HunkInfo {
    pub old_start: u32,
    pub old_lines: u32,
    pub new_start: u32,
    pub new_lines: u32,
    /// The `@@ ... @@` header line
    pub header: String,
    pub changes: Vec<ChangeInfo>,
}

impl From<&ExternalHunk> for HunkInfo {
    fn from(hunk: &ExternalHunk) -> Self {
        Self {
            old_start: hunk.old_start,
            old_lines: hunk.old_lines,
            new_start: hunk.new_start,
            new_lines: hunk.new_lines,
            header: hunk.header.clone(),
            changes: hunk.changes.iter().map(ChangeInfo::from).collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiffInfo {
    pub hunks: Vec<HunkInfo>,
    pub old_path: String,
    pub new_path: String,
    pub old_revision: String,
    pub new_revision: String,
    pub is_binary: bool,
    pub mode: String,
    #[serde(rename = "type")]
    pub diff_type: DiffType,
    pub old_ending_new_line: bool,
    pub new_ending_new_line: bool,
}

impl DiffInfo {
    pub fn from_external(
        diff: &ExternalDiff,
        base_version_id: VersionId,
        head_version_id: VersionId,
    ) -> Self {
        Self {
            hunks: diff.hunks.iter().map(HunkInfo::from).collect(),
            old_path: diff.old_path.clone(),
            new_path: diff.path.clone(),
            old_revision: base_version_id.to_string(),
            new_revision: head_version_id.to_string(),
            is_binary: diff.is_binary,
            mode: diff.mode.clone(),
            diff_type: DiffType::from_mode(&diff.mode),
            old_ending_new_line: diff.old_ending_new_line,
            new_ending_new_line: diff.new_ending_new_line,
        }
    }

    pub fn changes(&self) -> impl Iterator<Item = &ChangeInfo> {
        self.hunks.iter().flat_map(|hunk| hunk.changes.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn change(change_type: ChangeType, old: u32, new: u32) -> ChangeInfo {
        ChangeInfo {
            change_type,
            old_line_number: old,
            new_line_number: new,
            content: String::new(),
        }
    }

    #[test]
    fn change_keys_use_the_displayed_side() {
        assert_eq!(change(ChangeType::Normal, 3, 5).key(), "N3");
        assert_eq!(change(ChangeType::Insert, 0, 5).key(), "I5");
        assert_eq!(change(ChangeType::Delete, 4, 0).key(), "D4");
    }

    #[test]
    fn unknown_mode_is_a_modification() {
        assert_eq!(DiffType::from_mode("A"), DiffType::Add);
        assert_eq!(DiffType::from_mode("R"), DiffType::Rename);
        assert_eq!(DiffType::from_mode("T"), DiffType::Modify);
    }

    #[test]
    fn negative_line_numbers_clamp_to_zero() {
        let external = ExternalChange {
            content: "+x".to_string(),
            new_line_number: 8,
            old_line_number: -1,
            change_type: ChangeType::Insert,
        };
        let change = ChangeInfo::from(&external);
        assert_eq!(change.old_line_number, 0);
        assert_eq!(change.line_number(), 8);
    }
}
