use serde::Serialize;

use linemark_types::{RelativePathPosition, ScrollTarget};

use super::relative_path::RelativePathFinder;
use crate::models::{DiffInfo, EntryStatusMap};

/// One anchor per changed region of `diff`, in file order.
///
/// A changed region is a maximal run of insert/delete changes within a hunk;
/// its anchor is the change key of the run's first change.
pub fn diff_anchors(diff: &DiffInfo) -> Vec<String> {
    let mut anchors = Vec::new();

    for hunk in &diff.hunks {
        let mut seeking_change = true;
        for change in &hunk.changes {
            if change.is_normal() {
                seeking_change = true;
            } else if seeking_change {
                anchors.push(change.key());
                seeking_change = false;
            }
        }
    }

    anchors
}

/// First decimal number embedded in `s`, e.g. `12` for `"I12"`.
///
/// Zero counts as "no number": change keys are 1-based.
pub fn extract_number(s: &str) -> Option<u32> {
    let start = s.find(|c: char| c.is_ascii_digit())?;
    let digits = &s[start..];
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    digits[..end].parse().ok().filter(|n| *n != 0)
}

/// The changed-region anchor next to `current_anchor` in `position`'s direction.
///
/// - No current anchor: the first region.
/// - A current anchor that is itself a region anchor: its neighbour, or `None`
///   past either end.
/// - Any other anchor: the nearest region whose number is on the requested
///   side of (or equal to) the current anchor's number.
pub fn relative_diff_anchor(
    diff: &DiffInfo,
    current_anchor: Option<&str>,
    position: RelativePathPosition,
) -> Option<String> {
    let anchors = diff_anchors(diff);
    if anchors.is_empty() {
        return None;
    }

    let current_anchor = match current_anchor {
        Some(anchor) if !anchor.is_empty() => anchor,
        _ => return anchors.into_iter().next(),
    };

    if let Some(current_index) = anchors.iter().position(|a| a == current_anchor) {
        let new_index = match position {
            RelativePathPosition::Previous => current_index.checked_sub(1)?,
            RelativePathPosition::Next => current_index + 1,
        };
        return anchors.get(new_index).cloned();
    }

    let current_number = extract_number(current_anchor)?;
    let qualifies = |anchor: &&String| {
        extract_number(anchor).is_some_and(|n| match position {
            RelativePathPosition::Previous => n <= current_number,
            RelativePathPosition::Next => n >= current_number,
        })
    };

    match position {
        RelativePathPosition::Previous => anchors.iter().rev().find(qualifies).cloned(),
        RelativePathPosition::Next => anchors.iter().find(qualifies).cloned(),
    }
}

/// Anchor to scroll to right after a file was opened by cross-file navigation.
pub fn scroll_target_anchor(diff: &DiffInfo, target: ScrollTarget) -> Option<String> {
    let anchors = diff_anchors(diff);
    match target {
        ScrollTarget::FirstDiff => anchors.into_iter().next(),
        ScrollTarget::LastDiff => anchors.into_iter().next_back(),
    }
}

/// A consistent snapshot of everything one "jump to changed region" needs.
#[derive(Clone, Copy, Debug)]
pub struct RelativeDiffRequest<'a> {
    pub current_anchor: Option<&'a str>,
    pub diff: Option<&'a DiffInfo>,
    pub current_path: &'a str,
    pub entry_status_map: &'a EntryStatusMap,
    pub path_list: &'a [String],
    pub position: RelativePathPosition,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct RelativeDiffResult {
    pub anchor: Option<String>,
    pub path: Option<String>,
}

/// What the caller should do in response to a navigation request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum NavigationOutcome {
    /// Scroll within the current file to this fragment.
    Anchor { fragment: String },
    /// Load another file, then scroll to its first or last changed region.
    #[serde(rename_all = "camelCase")]
    File {
        path: String,
        scroll_to: ScrollTarget,
    },
    /// Nothing left in that direction; the control should be disabled.
    Exhausted,
}

impl RelativeDiffResult {
    pub fn into_outcome(self, position: RelativePathPosition) -> NavigationOutcome {
        match (self.anchor, self.path) {
            (Some(anchor), _) => NavigationOutcome::Anchor {
                fragment: format!("#{anchor}"),
            },
            (None, Some(path)) => NavigationOutcome::File {
                path,
                scroll_to: position.scroll_target(),
            },
            (None, None) => NavigationOutcome::Exhausted,
        }
    }
}

/// Stays in the current file when it has another changed region in the
/// requested direction; otherwise asks `finder` (exactly once) for the next
/// file with a pending change.
pub fn relative_diff(
    request: &RelativeDiffRequest<'_>,
    finder: &dyn RelativePathFinder,
) -> RelativeDiffResult {
    let anchor = request
        .diff
        .and_then(|diff| relative_diff_anchor(diff, request.current_anchor, request.position));

    if anchor.is_some() {
        return RelativeDiffResult { anchor, path: None };
    }

    log::debug!(
        "no {:?} region in {}, looking at other files",
        request.position,
        request.current_path
    );
    let path = finder.find_relative_path(
        request.current_path,
        request.path_list,
        request.entry_status_map,
        request.position,
    );

    RelativeDiffResult { anchor: None, path }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use linemark_types::ChangeType;

    use super::*;
    use crate::models::{ChangeInfo, DiffType, HunkInfo};

    fn change(change_type: ChangeType, line: u32) -> ChangeInfo {
        let (old, new) = match change_type {
            ChangeType::Normal => (line, line),
            ChangeType::Insert => (0, line),
            ChangeType::Delete => (line, 0),
        };
        ChangeInfo {
            change_type,
            old_line_number: old,
            new_line_number: new,
            content: String::new(),
        }
    }

    fn hunk(changes: Vec<ChangeInfo>) -> HunkInfo {
        HunkInfo {
            old_start: 1,
            old_lines: changes.len() as u32,
            new_start: 1,
            new_lines: changes.len() as u32,
            header: String::new(),
            changes,
        }
    }

    fn diff(hunks: Vec<HunkInfo>) -> DiffInfo {
        DiffInfo {
            hunks,
            old_path: "a.js".to_string(),
            new_path: "a.js".to_string(),
            old_revision: "1".to_string(),
            new_revision: "2".to_string(),
            is_binary: false,
            mode: "M".to_string(),
            diff_type: DiffType::Modify,
            old_ending_new_line: true,
            new_ending_new_line: true,
        }
    }

    /// Changed regions at I2, D5 (first hunk) and I20 (second hunk).
    fn three_region_diff() -> DiffInfo {
        diff(vec![
            hunk(vec![
                change(ChangeType::Normal, 1),
                change(ChangeType::Insert, 2),
                change(ChangeType::Insert, 3),
                change(ChangeType::Normal, 4),
                change(ChangeType::Delete, 5),
            ]),
            hunk(vec![
                change(ChangeType::Normal, 19),
                change(ChangeType::Insert, 20),
                change(ChangeType::Delete, 21),
                change(ChangeType::Normal, 22),
            ]),
        ])
    }

    #[test]
    fn one_anchor_per_changed_run() {
        let d = diff(vec![hunk(vec![
            change(ChangeType::Normal, 1),
            change(ChangeType::Insert, 2),
            change(ChangeType::Insert, 3),
            change(ChangeType::Normal, 4),
            change(ChangeType::Delete, 5),
        ])]);
        assert_eq!(diff_anchors(&d), ["I2", "D5"]);
    }

    #[test]
    fn runs_do_not_span_hunks() {
        let d = diff(vec![
            hunk(vec![change(ChangeType::Insert, 2)]),
            hunk(vec![change(ChangeType::Insert, 9)]),
        ]);
        assert_eq!(diff_anchors(&d), ["I2", "I9"]);
    }

    #[test]
    fn no_current_anchor_returns_first_region() {
        let d = three_region_diff();
        for position in [RelativePathPosition::Next, RelativePathPosition::Previous] {
            assert_eq!(relative_diff_anchor(&d, None, position).as_deref(), Some("I2"));
            assert_eq!(relative_diff_anchor(&d, Some(""), position).as_deref(), Some("I2"));
        }
    }

    #[test]
    fn known_anchor_moves_to_neighbour() {
        let d = three_region_diff();
        assert_eq!(
            relative_diff_anchor(&d, Some("D5"), RelativePathPosition::Next).as_deref(),
            Some("I20")
        );
        assert_eq!(
            relative_diff_anchor(&d, Some("D5"), RelativePathPosition::Previous).as_deref(),
            Some("I2")
        );
    }

    #[test]
    fn known_anchor_at_the_boundary_returns_none() {
        let d = three_region_diff();
        assert_eq!(relative_diff_anchor(&d, Some("I20"), RelativePathPosition::Next), None);
        assert_eq!(relative_diff_anchor(&d, Some("I2"), RelativePathPosition::Previous), None);
    }

    #[test]
    fn unknown_anchor_uses_its_number() {
        let d = three_region_diff();
        // L10 sits between D5 and I20.
        assert_eq!(
            relative_diff_anchor(&d, Some("L10"), RelativePathPosition::Next).as_deref(),
            Some("I20")
        );
        assert_eq!(
            relative_diff_anchor(&d, Some("L10"), RelativePathPosition::Previous).as_deref(),
            Some("D5")
        );
        // I3 is inside the first region but not its start.
        assert_eq!(
            relative_diff_anchor(&d, Some("I3"), RelativePathPosition::Previous).as_deref(),
            Some("I2")
        );
        assert_eq!(relative_diff_anchor(&d, Some("N30"), RelativePathPosition::Next), None);
    }

    #[test]
    fn anchor_without_number_returns_none() {
        let d = three_region_diff();
        assert_eq!(relative_diff_anchor(&d, Some("top"), RelativePathPosition::Next), None);
    }

    #[test]
    fn diff_without_regions_returns_none() {
        let d = diff(vec![hunk(vec![change(ChangeType::Normal, 1)])]);
        assert_eq!(relative_diff_anchor(&d, None, RelativePathPosition::Next), None);
    }

    #[test]
    fn extracts_first_number() {
        assert_eq!(extract_number("I12"), Some(12));
        assert_eq!(extract_number("#L7-messages"), Some(7));
        assert_eq!(extract_number("N0"), None);
        assert_eq!(extract_number("none"), None);
    }

    #[test]
    fn scroll_targets_pick_first_and_last_regions() {
        let d = three_region_diff();
        assert_eq!(scroll_target_anchor(&d, ScrollTarget::FirstDiff).as_deref(), Some("I2"));
        assert_eq!(scroll_target_anchor(&d, ScrollTarget::LastDiff).as_deref(), Some("I20"));
    }

    struct RecordingFinder {
        calls: RefCell<Vec<(String, RelativePathPosition)>>,
        answer: Option<String>,
    }

    impl RelativePathFinder for RecordingFinder {
        fn find_relative_path(
            &self,
            current_path: &str,
            _path_list: &[String],
            _status_map: &EntryStatusMap,
            position: RelativePathPosition,
        ) -> Option<String> {
            self.calls
                .borrow_mut()
                .push((current_path.to_string(), position));
            self.answer.clone()
        }
    }

    fn request<'a>(
        diff: Option<&'a DiffInfo>,
        current_anchor: Option<&'a str>,
        map: &'a EntryStatusMap,
        position: RelativePathPosition,
    ) -> RelativeDiffRequest<'a> {
        RelativeDiffRequest {
            current_anchor,
            diff,
            current_path: "a.js",
            entry_status_map: map,
            path_list: &[],
            position,
        }
    }

    #[test]
    fn stays_in_file_without_asking_for_paths() {
        let d = three_region_diff();
        let map = EntryStatusMap::default();
        let finder = RecordingFinder {
            calls: RefCell::new(Vec::new()),
            answer: Some("b.js".to_string()),
        };
        let result = relative_diff(
            &request(Some(&d), Some("I2"), &map, RelativePathPosition::Next),
            &finder,
        );
        assert_eq!(result.anchor.as_deref(), Some("D5"));
        assert_eq!(result.path, None);
        assert!(finder.calls.borrow().is_empty());
    }

    #[test]
    fn falls_back_to_path_finder_exactly_once() {
        let d = three_region_diff();
        let map = EntryStatusMap::default();
        let finder = RecordingFinder {
            calls: RefCell::new(Vec::new()),
            answer: Some("b.js".to_string()),
        };
        let result = relative_diff(
            &request(Some(&d), Some("I2"), &map, RelativePathPosition::Previous),
            &finder,
        );
        assert_eq!(result.anchor, None);
        assert_eq!(result.path.as_deref(), Some("b.js"));
        assert_eq!(
            *finder.calls.borrow(),
            [("a.js".to_string(), RelativePathPosition::Previous)]
        );
    }

    #[test]
    fn missing_diff_goes_straight_to_path_finder() {
        let map = EntryStatusMap::default();
        let finder = RecordingFinder {
            calls: RefCell::new(Vec::new()),
            answer: None,
        };
        let result = relative_diff(&request(None, None, &map, RelativePathPosition::Next), &finder);
        assert_eq!(result, RelativeDiffResult::default());
        assert_eq!(finder.calls.borrow().len(), 1);
        assert_eq!(
            result.into_outcome(RelativePathPosition::Next),
            NavigationOutcome::Exhausted
        );
    }

    #[test]
    fn outcomes_carry_scroll_targets() {
        let to_file = RelativeDiffResult {
            anchor: None,
            path: Some("b.js".to_string()),
        };
        assert_eq!(
            to_file.into_outcome(RelativePathPosition::Previous),
            NavigationOutcome::File {
                path: "b.js".to_string(),
                scroll_to: ScrollTarget::LastDiff,
            }
        );
        let in_file = RelativeDiffResult {
            anchor: Some("I2".to_string()),
            path: None,
        };
        assert_eq!(
            in_file.into_outcome(RelativePathPosition::Next),
            NavigationOutcome::Anchor {
                fragment: "#I2".to_string()
            }
        );
    }
}
