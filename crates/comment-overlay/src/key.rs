use serde::Serialize;

use crate::{Error, Result};

/// Identifies the place a comment thread is attached to.
///
/// - no file, no line: the whole version
/// - file, no line: the whole file
/// - file and line: one line of that file
///
/// A line without a file has no meaning and cannot be constructed.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentKey {
    file_name: Option<String>,
    line: Option<u32>,
}

impl CommentKey {
    pub fn new(file_name: Option<&str>, line: Option<u32>) -> Result<Self> {
        let key = Self {
            file_name: file_name.map(str::to_string),
            line,
        };
        if key.line.is_some() && key.file_name.is_none() {
            return Err(Error::LineWithoutFile {
                key: key.to_string(),
            });
        }
        Ok(key)
    }

    /// Key of a comment as the API reports it: an empty file name or a zero
    /// line number means "not set".
    pub fn from_api(file_name: Option<&str>, line: Option<u32>) -> Result<Self> {
        Self::new(
            file_name.filter(|f| !f.is_empty()),
            line.filter(|l| *l != 0),
        )
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn line(&self) -> Option<u32> {
        self.line
    }
}

impl std::fmt::Display for CommentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("fileName:")?;
        match &self.file_name {
            Some(name) => f.write_str(name)?,
            None => f.write_str("null")?,
        }
        f.write_str(";line:")?;
        match self.line {
            Some(line) => write!(f, "{line}"),
            None => f.write_str("null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_all_valid_shapes() {
        assert_eq!(
            CommentKey::new(None, None).unwrap().to_string(),
            "fileName:null;line:null"
        );
        assert_eq!(
            CommentKey::new(Some("lib/a.js"), None).unwrap().to_string(),
            "fileName:lib/a.js;line:null"
        );
        assert_eq!(
            CommentKey::new(Some("lib/a.js"), Some(12)).unwrap().to_string(),
            "fileName:lib/a.js;line:12"
        );
    }

    #[test]
    fn line_without_file_is_rejected() {
        let err = CommentKey::new(None, Some(3)).unwrap_err();
        assert!(matches!(err, Error::LineWithoutFile { ref key } if key == "fileName:null;line:3"));
    }

    #[test]
    fn api_blanks_count_as_unset() {
        let key = CommentKey::from_api(Some(""), Some(0)).unwrap();
        assert_eq!(key, CommentKey::new(None, None).unwrap());
    }
}
