//! Row model of the plain (non-diff) code viewer.

use serde::Serialize;

use super::anchor::{is_line_selected, line_to_anchor_id};

/// Line count from which a file is considered slow to render.
pub const SLOW_LOADING_LINE_COUNT: usize = 1000;

/// Overscan of the code viewer's row host. Larger than the default so fast
/// scrolling through code does not flash empty rows.
pub const CODE_VIEW_OVERSCAN: usize = 100;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct CodeViewOptions {
    pub slow_loading_line_count: usize,
    /// The user asked to render slow files in full.
    pub allow_slow_pages: bool,
}

impl Default for CodeViewOptions {
    fn default() -> Self {
        Self {
            slow_loading_line_count: SLOW_LOADING_LINE_COUNT,
            allow_slow_pages: false,
        }
    }
}

/// Splits file content into display lines. A trailing newline yields a final
/// empty line; `\r\n` endings are accepted.
pub fn get_lines(content: &str) -> Vec<&str> {
    content
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .collect()
}

/// Element id of the inline linter message row below `line`.
pub fn linter_messages_id(line: u32) -> String {
    format!("line-{line}-messages")
}

/// Banner shown above a file that reached the slow-loading threshold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SlowPageAlert {
    /// Rendered in full because slow pages are allowed.
    LoadingSlowly,
    /// Cut to the threshold and shown without highlighting.
    Shortened,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeRow<'a> {
    pub line: u32,
    pub anchor_id: String,
    pub code: &'a str,
    pub is_selected: bool,
}

/// The lines of one file as the viewer will render them.
#[derive(Clone, Debug)]
pub struct CodeLines<'a> {
    lines: Vec<&'a str>,
    was_trimmed: bool,
    slow_alert: Option<SlowPageAlert>,
}

impl<'a> CodeLines<'a> {
    pub fn new(content: &'a str, options: CodeViewOptions) -> Self {
        let mut lines = get_lines(content);
        let mut was_trimmed = false;
        let mut slow_alert = None;

        if lines.len() >= options.slow_loading_line_count {
            if options.allow_slow_pages {
                slow_alert = Some(SlowPageAlert::LoadingSlowly);
            } else {
                log::debug!(
                    "trimming {} lines to {}",
                    lines.len(),
                    options.slow_loading_line_count
                );
                lines.truncate(options.slow_loading_line_count);
                was_trimmed = true;
                slow_alert = Some(SlowPageAlert::Shortened);
            }
        }

        Self {
            lines,
            was_trimmed,
            slow_alert,
        }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn was_trimmed(&self) -> bool {
        self.was_trimmed
    }

    /// Highlighting is skipped for trimmed files.
    pub fn should_highlight(&self) -> bool {
        !self.was_trimmed
    }

    pub fn slow_alert(&self) -> Option<SlowPageAlert> {
        self.slow_alert
    }

    /// The row at 0-based `index`, resolved against the current location hash.
    pub fn row(&self, index: usize, location_hash: &str) -> Option<CodeRow<'a>> {
        let code = *self.lines.get(index)?;
        let line = u32::try_from(index + 1).ok()?;
        let anchor_id = line_to_anchor_id(line);
        let is_selected = is_line_selected(&anchor_id, location_hash);
        Some(CodeRow {
            line,
            anchor_id,
            code,
            is_selected,
        })
    }

    pub fn rows<'s>(&'s self, location_hash: &'s str) -> impl Iterator<Item = CodeRow<'a>> + 's {
        (0..self.lines.len()).filter_map(move |i| self.row(i, location_hash))
    }

    /// 0-based index of the row the location hash points at, if any.
    pub fn selected_index(&self, location_hash: &str) -> Option<usize> {
        self.rows(location_hash)
            .position(|row| row.is_selected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_newlines_keeping_trailing_line() {
        assert_eq!(get_lines("a\r\nb\nc\n"), ["a", "b", "c", ""]);
        assert_eq!(get_lines(""), [""]);
    }

    fn content(lines: usize) -> String {
        (1..=lines)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn short_files_are_untouched() {
        let text = content(999);
        let lines = CodeLines::new(&text, CodeViewOptions::default());
        assert_eq!(lines.len(), 999);
        assert!(lines.should_highlight());
        assert_eq!(lines.slow_alert(), None);
    }

    #[test]
    fn slow_files_are_trimmed_and_not_highlighted() {
        let text = content(1500);
        let lines = CodeLines::new(&text, CodeViewOptions::default());
        assert_eq!(lines.len(), SLOW_LOADING_LINE_COUNT);
        assert!(lines.was_trimmed());
        assert!(!lines.should_highlight());
        assert_eq!(lines.slow_alert(), Some(SlowPageAlert::Shortened));
    }

    #[test]
    fn slow_files_render_in_full_when_allowed() {
        let text = content(1000);
        let options = CodeViewOptions {
            allow_slow_pages: true,
            ..CodeViewOptions::default()
        };
        let lines = CodeLines::new(&text, options);
        assert_eq!(lines.len(), 1000);
        assert!(lines.should_highlight());
        assert_eq!(lines.slow_alert(), Some(SlowPageAlert::LoadingSlowly));
    }

    #[test]
    fn rows_resolve_anchor_and_selection() {
        let text = content(3);
        let lines = CodeLines::new(&text, CodeViewOptions::default());
        let rows: Vec<CodeRow<'_>> = lines.rows("#L2").collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1].line, 2);
        assert_eq!(rows[1].anchor_id, "L2");
        assert_eq!(rows[1].code, "line 2");
        assert!(rows[1].is_selected);
        assert!(!rows[0].is_selected);
        assert_eq!(lines.selected_index("#L2"), Some(1));
        assert_eq!(lines.selected_index("#I2"), None);
        assert!(lines.row(3, "").is_none());
    }

    #[test]
    fn linter_row_ids() {
        assert_eq!(linter_messages_id(7), "line-7-messages");
    }
}
