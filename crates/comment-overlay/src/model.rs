use serde::{Deserialize, Serialize};

use linemark_types::VersionId;

/// A comment as returned by the review API.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalComment {
    pub id: u64,
    pub comment: Option<String>,
    pub filename: Option<String>,
    pub lineno: Option<u32>,
    pub user: ExternalCommentUser,
    pub version: ExternalCommentVersion,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExternalCommentUser {
    pub id: u64,
    pub name: Option<String>,
    pub url: Option<String>,
    pub username: String,
}

/// Only the id of the embedded version is read.
#[derive(Debug, Clone, Deserialize)]
pub struct ExternalCommentVersion {
    pub id: VersionId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: u64,
    pub content: Option<String>,
    pub filename: Option<String>,
    pub lineno: Option<u32>,
    pub user_id: u64,
    pub user_name: Option<String>,
    pub user_url: Option<String>,
    pub user_username: String,
    pub version_id: VersionId,
    /// Delete was requested and is in flight.
    pub begin_delete: bool,
    /// The user is being asked to confirm a delete.
    pub consider_delete: bool,
}

impl From<&ExternalComment> for Comment {
    fn from(comment: &ExternalComment) -> Self {
        Self {
            id: comment.id,
            content: comment.comment.clone(),
            filename: comment.filename.clone(),
            lineno: comment.lineno,
            user_id: comment.user.id,
            user_name: comment.user.name.clone(),
            user_url: comment.user.url.clone(),
            user_username: comment.user.username.clone(),
            version_id: comment.version.id,
            begin_delete: false,
            consider_delete: false,
        }
    }
}

/// Editing state and comment ids of one [`CommentKey`](crate::CommentKey).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentInfo {
    pub begin_new_comment: bool,
    pub pending_comment_text: Option<String>,
    pub saving_comment: bool,
    pub comment_ids: Vec<u64>,
}
