mod key;
mod linter;
pub(crate) mod model;
mod state;

pub use key::CommentKey;
pub use linemark_types::VersionId;
pub use linter::{LinterMessage, LinterMessageMap, LinterMessageType};
pub use model::{Comment, CommentInfo, ExternalComment, ExternalCommentUser, ExternalCommentVersion};
pub use state::CommentsState;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Cannot create key \"{key}\" because fileName is empty")]
    LineWithoutFile { key: String },
    #[error("Comment not found: {comment_id}")]
    CommentNotFound { comment_id: u64 },
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
