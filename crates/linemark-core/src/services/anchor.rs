//! Stable, deep-linkable anchors for lines of code.
//!
//! A code line anchor id is `L<line>` (no leading zeros); the URL fragment
//! form prefixes it with `#`. Line `0` is reserved for linter messages that
//! are not attached to any line.

use std::collections::HashMap;

use crate::models::DiffInfo;

/// Line number standing for "no specific line" (global linter messages).
pub const GLOBAL_LINTER_ANCHOR_LINE: u32 = 0;

const ANCHOR_PREFIX: char = 'L';

pub fn line_to_anchor_id(line: u32) -> String {
    format!("{ANCHOR_PREFIX}{line}")
}

/// Fragment form of [`line_to_anchor_id`], e.g. `#L42`.
pub fn line_to_anchor(line: u32) -> String {
    format!("#{}", line_to_anchor_id(line))
}

pub fn global_linter_anchor_id() -> String {
    line_to_anchor_id(GLOBAL_LINTER_ANCHOR_LINE)
}

/// Inverse of [`line_to_anchor_id`]. Accepts the fragment form too.
///
/// Returns `None` for anything that is not exactly an anchor this module
/// produces, so a page hash pointing elsewhere is simply ignored.
pub fn anchor_id_to_line(id: &str) -> Option<u32> {
    let id = id.strip_prefix('#').unwrap_or(id);
    let digits = id.strip_prefix(ANCHOR_PREFIX)?;

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    // "L007" would otherwise alias "L7".
    if digits.len() > 1 && digits.starts_with('0') {
        return None;
    }

    digits.parse().ok()
}

/// Whether the anchor `id` is the one the current location points at.
///
/// `location_hash` is the fragment of the current location, including `#`.
pub fn is_line_selected(id: &str, location_hash: &str) -> bool {
    location_hash.strip_prefix('#') == Some(id)
}

/// Builds line fragments for a file that may be displayed as a diff.
///
/// Lines rendered by a non-delete change link to that change's diff key;
/// every other line links to its plain code line anchor.
#[derive(Clone, Debug, Default)]
pub struct CodeLineAnchorGetter {
    change_keys: HashMap<u32, String>,
}

impl CodeLineAnchorGetter {
    pub fn new(diff: Option<&DiffInfo>) -> Self {
        let mut change_keys = HashMap::new();
        if let Some(diff) = diff {
            for change in diff.changes().filter(|c| !c.is_delete()) {
                change_keys
                    .entry(change.new_line_number)
                    .or_insert_with(|| change.key());
            }
        }
        Self { change_keys }
    }

    pub fn anchor(&self, line: u32) -> String {
        match self.change_keys.get(&line) {
            Some(key) => format!("#{key}"),
            None => line_to_anchor(line),
        }
    }
}
