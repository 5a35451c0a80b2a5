use anyhow::{Context, Result};
use serde::Serialize;

use comment_overlay::{CommentKey, CommentsState, ExternalComment, LinterMessage, LinterMessageMap};
use linemark_core::models::DiffInfo;
use linemark_core::models::external::{ExternalDiff, ExternalVersion};
use linemark_core::services::anchor::{
    CodeLineAnchorGetter, GLOBAL_LINTER_ANCHOR_LINE, anchor_id_to_line, line_to_anchor,
    line_to_anchor_id,
};
use linemark_core::services::code_view::linter_messages_id;
use linemark_core::services::relative_diff::diff_anchors;
use linemark_core::services::{
    CodeLines, CodeViewOptions, GoToRelativeDiff, NavigationOutcome, OrderedPathFinder,
    SlowPageAlert, VersionsState,
};
use linemark_types::{RelativePathPosition, VersionEntryStatus, VersionId};
use row_host::{RowHost, RowHostConfig, RowMeasurement, RowWindow};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnchorOutput {
    pub line: u32,
    pub anchor_id: String,
    pub fragment: String,
}

pub fn anchor(line: u32) -> AnchorOutput {
    AnchorOutput {
        line,
        anchor_id: line_to_anchor_id(line),
        fragment: line_to_anchor(line),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineOutput {
    pub anchor: String,
    pub line: Option<u32>,
    pub is_global: bool,
}

pub fn line(anchor: &str) -> LineOutput {
    let line = anchor_id_to_line(anchor);
    LineOutput {
        anchor: anchor.to_string(),
        line,
        is_global: line == Some(GLOBAL_LINTER_ANCHOR_LINE),
    }
}

pub fn anchors(diff: &ExternalDiff, base: VersionId, head: VersionId) -> Vec<String> {
    diff_anchors(&DiffInfo::from_external(diff, base, head))
}

pub struct NavigateInput<'a> {
    pub version: &'a ExternalVersion,
    pub diff: Option<&'a ExternalDiff>,
    pub base: VersionId,
    pub anchor: Option<&'a str>,
    pub position: RelativePathPosition,
}

/// Where "next/previous change" leads from the version's selected file.
pub fn navigate(input: &NavigateInput<'_>) -> Result<NavigationOutcome> {
    let version_id = input.version.id;
    let mut state = VersionsState::new();
    state.load_version_info(input.version);
    state.load_entry_status_map(input.version, Some(input.base));

    let diff = input
        .diff
        .map(|diff| DiffInfo::from_external(diff, input.base, version_id));
    let path_list = state
        .version_info(version_id)
        .map(|version| version.file_paths())
        .unwrap_or_default();

    let outcome = state.go_to_relative_diff(
        &GoToRelativeDiff {
            version_id,
            compared_to_version_id: Some(input.base),
            current_anchor: input.anchor,
            diff: diff.as_ref(),
            path_list: &path_list,
            position: input.position,
        },
        &OrderedPathFinder,
    )?;
    Ok(outcome)
}

#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub path: String,
    pub status: Option<VersionEntryStatus>,
}

pub fn status(version: &ExternalVersion, base: Option<VersionId>, path: &str) -> StatusOutput {
    let mut state = VersionsState::new();
    state.load_version_info(version);
    state.load_entry_status_map(version, base);
    StatusOutput {
        path: path.to_string(),
        status: state.most_relevant_entry_status(version.id, base, path),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WindowOutput {
    pub window: RowWindow,
    pub total_height: f64,
    pub pending_measurements: Vec<usize>,
}

pub struct WindowInput<'a> {
    pub rows: usize,
    pub scroll_top: f64,
    pub viewport: f64,
    /// Measured heights of the first rows, in row order.
    pub heights: &'a [f64],
    pub width: Option<f64>,
}

pub fn window(config: RowHostConfig, input: &WindowInput<'_>) -> Result<WindowOutput> {
    let mut host = RowHost::new(config, input.rows);
    if let Some(width) = input.width {
        host.set_width(width);
    }
    for (index, height) in input.heights.iter().copied().enumerate() {
        host.report_measurement(RowMeasurement { index, height })
            .with_context(|| format!("{} heights given for {} rows", input.heights.len(), input.rows))?;
    }

    let window = host.window(input.scroll_top, input.viewport);
    Ok(WindowOutput {
        total_height: host.total_height(),
        pending_measurements: host.pending_measurements(&window),
        window,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRow<'a> {
    pub line: u32,
    pub anchor_id: String,
    /// Fragment the line number links to; a diff change key when the file is shown as a diff.
    pub link: String,
    pub code: &'a str,
    pub is_selected: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub messages_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub messages: Vec<LinterMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub comment_ids: Vec<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewOutput<'a> {
    pub path: String,
    pub line_count: usize,
    pub was_trimmed: bool,
    pub should_highlight: bool,
    pub slow_alert: Option<SlowPageAlert>,
    pub global_messages: Vec<LinterMessage>,
    pub window: RowWindow,
    pub total_height: f64,
    pub rows: Vec<ViewRow<'a>>,
}

pub struct ViewInput<'a> {
    pub version: &'a ExternalVersion,
    pub diff: Option<&'a ExternalDiff>,
    pub base: Option<VersionId>,
    pub linter: &'a [LinterMessage],
    pub comments: &'a [ExternalComment],
    pub location_hash: &'a str,
    /// Defaults to the selected line, or the top of the file.
    pub scroll_top: Option<f64>,
    pub viewport: f64,
}

/// Mounted rows of the version's selected file with their overlays.
pub fn view<'a>(
    input: &ViewInput<'a>,
    options: CodeViewOptions,
    host_config: RowHostConfig,
) -> Result<ViewOutput<'a>> {
    let version = input.version;
    let path = version.file.selected_file.as_str();
    let content = version
        .file
        .content
        .as_deref()
        .with_context(|| format!("version {} carries no content for {path}", version.id))?;

    let lines = CodeLines::new(content, options);
    let mut host = RowHost::new(host_config, lines.len());
    let scroll_top = match input.scroll_top {
        Some(top) => top,
        None => lines
            .selected_index(input.location_hash)
            .and_then(|index| host.scroll_offset_for(index))
            .unwrap_or_default(),
    };
    let window = host.window(scroll_top, input.viewport);

    let diff = input.diff.map(|diff| {
        DiffInfo::from_external(diff, input.base.unwrap_or(version.id), version.id)
    });
    let links = CodeLineAnchorGetter::new(diff.as_ref());
    let messages = LinterMessageMap::for_path(input.linter, path);
    let mut comments = CommentsState::new();
    comments.set_comments(version.id, input.comments)?;

    let mut rows = Vec::with_capacity(window.mounted.len());
    for index in window.mounted.clone() {
        let Some(row) = lines.row(index, input.location_hash) else {
            continue;
        };
        let line_messages = messages.messages_for_line(row.line).to_vec();
        let key = CommentKey::new(Some(path), Some(row.line))?;
        rows.push(ViewRow {
            line: row.line,
            link: links.anchor(row.line),
            anchor_id: row.anchor_id,
            code: row.code,
            is_selected: row.is_selected,
            messages_id: (!line_messages.is_empty()).then(|| linter_messages_id(row.line)),
            messages: line_messages,
            comment_ids: comments
                .comment_info(version.id, &key)
                .map(|info| info.comment_ids.clone())
                .unwrap_or_default(),
        });
    }

    Ok(ViewOutput {
        path: path.to_string(),
        line_count: lines.len(),
        was_trimmed: lines.was_trimmed(),
        should_highlight: lines.should_highlight(),
        slow_alert: lines.slow_alert(),
        global_messages: messages.global,
        total_height: host.total_height(),
        window,
        rows,
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentKeyOutput {
    pub key: String,
}

pub fn comment_key(file: Option<&str>, line: Option<u32>) -> Result<CommentKeyOutput> {
    let key = CommentKey::new(file, line)?;
    Ok(CommentKeyOutput {
        key: key.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use comment_overlay::LinterMessageType;
    use linemark_types::ScrollTarget;
    use test_fixtures::{DiffBuilder, HunkBuilder, VersionBuilder};

    use super::*;

    fn version() -> VersionBuilder {
        VersionBuilder::new(8)
            .directory("src")
            .file("src/a.js", "M")
            .file("src/b.js", "")
            .file("src/c.js", "A")
            .selected("src/a.js")
    }

    fn a_js_diff() -> DiffBuilder {
        DiffBuilder::new("src/a.js").hunk(HunkBuilder::new().normal(1, 1).insert(2).normal(2, 3))
    }

    #[test]
    fn anchor_and_line_are_inverse() {
        let out = anchor(42);
        assert_eq!(out.anchor_id, "L42");
        assert_eq!(out.fragment, "#L42");
        assert_eq!(line(&out.fragment).line, Some(42));
        assert!(line("L0").is_global);
        assert_eq!(line("L042").line, None);
    }

    #[test]
    fn navigate_within_then_across_files() {
        let version = version().build().unwrap();
        let diff = a_js_diff().build_external().unwrap();

        let first = navigate(&NavigateInput {
            version: &version,
            diff: Some(&diff),
            base: VersionId::new(7),
            anchor: None,
            position: RelativePathPosition::Next,
        })
        .unwrap();
        assert_eq!(
            first,
            NavigationOutcome::Anchor {
                fragment: "#I2".to_string()
            }
        );

        let next = navigate(&NavigateInput {
            version: &version,
            diff: Some(&diff),
            base: VersionId::new(7),
            anchor: Some("I2"),
            position: RelativePathPosition::Next,
        })
        .unwrap();
        assert_eq!(
            next,
            NavigationOutcome::File {
                path: "src/c.js".to_string(),
                scroll_to: ScrollTarget::FirstDiff,
            }
        );
    }

    #[test]
    fn status_of_directory() {
        let version = version().build().unwrap();
        let out = status(&version, Some(VersionId::new(7)), "src");
        assert_eq!(out.status, Some(VersionEntryStatus::Added));
    }

    #[test]
    fn window_applies_measurements() {
        let out = window(
            RowHostConfig::default().with_overscan(1),
            &WindowInput {
                rows: 10,
                scroll_top: 0.0,
                viewport: 40.0,
                heights: &[40.0],
                width: Some(800.0),
            },
        )
        .unwrap();
        assert_eq!(out.window.visible, 0..1);
        assert_eq!(out.window.mounted, 0..2);
        assert_eq!(out.pending_measurements, [1]);
        assert_eq!(out.total_height, 40.0 + 9.0 * 19.0);
    }

    #[test]
    fn window_rejects_extra_heights() {
        let result = window(
            RowHostConfig::default(),
            &WindowInput {
                rows: 1,
                scroll_top: 0.0,
                viewport: 40.0,
                heights: &[10.0, 10.0],
                width: None,
            },
        );
        assert!(result.is_err());
    }

    #[test]
    fn view_combines_rows_and_overlays() {
        let version = version()
            .content("one\ntwo\nthree")
            .build()
            .unwrap();
        let diff = a_js_diff().build_external().unwrap();
        let linter = vec![
            LinterMessage {
                uid: "m1".to_string(),
                file: Some("src/a.js".to_string()),
                line: Some(2),
                message: "Unsafe assignment".to_string(),
                description: Vec::new(),
                message_type: LinterMessageType::Warning,
            },
            LinterMessage {
                uid: "m2".to_string(),
                file: Some("src/a.js".to_string()),
                line: None,
                message: "File is minified".to_string(),
                description: Vec::new(),
                message_type: LinterMessageType::Notice,
            },
        ];
        let comments: Vec<ExternalComment> = serde_json::from_value(serde_json::json!([{
            "id": 5,
            "comment": "why?",
            "filename": "src/a.js",
            "lineno": 3,
            "user": {"id": 1, "name": null, "url": null, "username": "r"},
            "version": {"id": 8}
        }]))
        .unwrap();

        let out = view(
            &ViewInput {
                version: &version,
                diff: Some(&diff),
                base: Some(VersionId::new(7)),
                linter: &linter,
                comments: &comments,
                location_hash: "#L2",
                scroll_top: None,
                viewport: 600.0,
            },
            CodeViewOptions::default(),
            RowHostConfig::default(),
        )
        .unwrap();

        assert_eq!(out.line_count, 3);
        assert_eq!(out.rows.len(), 3);
        assert_eq!(out.global_messages.len(), 1);

        let second = &out.rows[1];
        assert!(second.is_selected);
        assert_eq!(second.link, "#I2");
        assert_eq!(second.messages_id.as_deref(), Some("line-2-messages"));
        assert_eq!(out.rows[0].link, "#N1");
        assert_eq!(out.rows[2].comment_ids, [5]);
    }

    #[test]
    fn view_needs_content() {
        let version = version().build().unwrap();
        let result = view(
            &ViewInput {
                version: &version,
                diff: None,
                base: None,
                linter: &[],
                comments: &[],
                location_hash: "",
                scroll_top: None,
                viewport: 100.0,
            },
            CodeViewOptions::default(),
            RowHostConfig::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn comment_key_validates() {
        assert_eq!(
            comment_key(Some("a.js"), Some(3)).unwrap().key,
            "fileName:a.js;line:3"
        );
        assert!(comment_key(None, Some(3)).is_err());
    }
}
