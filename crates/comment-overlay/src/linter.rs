use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LinterMessageType {
    Error,
    Warning,
    Notice,
}

/// One finding of the add-on validator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinterMessage {
    pub uid: String,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
    pub message: String,
    #[serde(default)]
    pub description: Vec<String>,
    #[serde(rename = "type")]
    pub message_type: LinterMessageType,
}

/// Linter messages of one file, split into messages about the whole file
/// and messages attached to a line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinterMessageMap {
    pub global: Vec<LinterMessage>,
    pub by_line: BTreeMap<u32, Vec<LinterMessage>>,
}

impl LinterMessageMap {
    /// Collects the messages reported for `path`. A missing line or line `0`
    /// makes a message global.
    pub fn for_path<'a, I>(messages: I, path: &str) -> Self
    where
        I: IntoIterator<Item = &'a LinterMessage>,
    {
        let mut map = Self::default();
        for message in messages
            .into_iter()
            .filter(|m| m.file.as_deref() == Some(path))
        {
            match message.line.filter(|line| *line != 0) {
                Some(line) => map.by_line.entry(line).or_default().push(message.clone()),
                None => map.global.push(message.clone()),
            }
        }
        map
    }

    pub fn messages_for_line(&self, line: u32) -> &[LinterMessage] {
        self.by_line.get(&line).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.global.is_empty() && self.by_line.is_empty()
    }
}
