use std::collections::HashMap;

use linemark_types::VersionId;

use crate::model::{Comment, CommentInfo, ExternalComment};
use crate::{CommentKey, Error, Result};

/// Comments of the version being reviewed, indexed by id and by key.
///
/// Holds one version at a time: any per-version transition for a different
/// version first drops everything recorded for the previous one.
#[derive(Debug, Clone, Default)]
pub struct CommentsState {
    by_key: HashMap<CommentKey, CommentInfo>,
    by_id: HashMap<u64, Comment>,
    for_version_id: Option<VersionId>,
    is_loading: bool,
}

impl CommentsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_version_id(&self) -> Option<VersionId> {
        self.for_version_id
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// Switches to `version_id`, discarding comments of any other version.
    pub fn for_version(&mut self, version_id: VersionId) {
        if self.for_version_id != Some(version_id) {
            if let Some(previous) = self.for_version_id {
                log::debug!("dropping comments of version {previous} for {version_id}");
            }
            self.by_id.clear();
            self.by_key.clear();
        }
        self.for_version_id = Some(version_id);
    }

    pub fn begin_fetch(&mut self, version_id: VersionId) {
        self.for_version(version_id);
        self.is_loading = true;
    }

    pub fn abort_fetch(&mut self, version_id: VersionId) {
        self.for_version(version_id);
        self.is_loading = false;
    }

    /// Records `comments` (fetched or freshly saved) for `version_id`.
    ///
    /// Fails without touching the state if any comment has a line but no file.
    pub fn set_comments(&mut self, version_id: VersionId, comments: &[ExternalComment]) -> Result<()> {
        let keyed = comments
            .iter()
            .map(|c| Ok((CommentKey::from_api(c.filename.as_deref(), c.lineno)?, c)))
            .collect::<Result<Vec<_>>>()?;

        self.for_version(version_id);
        for (key, comment) in keyed {
            self.by_id.insert(comment.id, Comment::from(comment));
            let info = self.by_key.entry(key).or_default();
            if !info.comment_ids.contains(&comment.id) {
                info.comment_ids.push(comment.id);
            }
        }
        self.is_loading = false;
        Ok(())
    }

    fn update_info(&mut self, version_id: VersionId, key: &CommentKey, update: impl FnOnce(&mut CommentInfo)) {
        self.for_version(version_id);
        let mut info = self.by_key.get(key).cloned().unwrap_or_default();
        update(&mut info);
        self.by_key.insert(key.clone(), info);
    }

    /// Opens an empty comment form at `key`.
    pub fn begin_comment(&mut self, version_id: VersionId, key: &CommentKey) {
        self.update_info(version_id, key, |info| {
            info.begin_new_comment = true;
            info.pending_comment_text = None;
            info.saving_comment = false;
        });
    }

    pub fn begin_save_comment(
        &mut self,
        version_id: VersionId,
        key: &CommentKey,
        pending_comment_text: Option<String>,
    ) {
        self.update_info(version_id, key, |info| {
            info.pending_comment_text = pending_comment_text;
            info.saving_comment = true;
        });
    }

    /// Keeps the pending text so the user can retry.
    pub fn abort_save_comment(&mut self, version_id: VersionId, key: &CommentKey) {
        self.update_info(version_id, key, |info| {
            info.saving_comment = false;
        });
    }

    pub fn finish_comment(&mut self, version_id: VersionId, key: &CommentKey) {
        self.update_info(version_id, key, |info| {
            info.begin_new_comment = false;
            info.pending_comment_text = None;
            info.saving_comment = false;
        });
    }

    fn adjust_comment(&mut self, comment_id: u64, begin_delete: bool, consider_delete: bool) -> Result<()> {
        let comment = self
            .by_id
            .get(&comment_id)
            .ok_or(Error::CommentNotFound { comment_id })?;
        let adjusted = Comment {
            begin_delete,
            consider_delete,
            ..comment.clone()
        };
        self.by_id.insert(comment_id, adjusted);
        Ok(())
    }

    pub fn consider_delete_comment(&mut self, comment_id: u64) -> Result<()> {
        self.adjust_comment(comment_id, false, true)
    }

    pub fn begin_delete_comment(&mut self, comment_id: u64) -> Result<()> {
        self.adjust_comment(comment_id, true, false)
    }

    pub fn abort_delete_comment(&mut self, comment_id: u64) -> Result<()> {
        self.adjust_comment(comment_id, false, false)
    }

    /// Forgets a deleted comment everywhere it is referenced.
    pub fn unset_comment(&mut self, comment_id: u64) {
        self.by_id.remove(&comment_id);
        for info in self.by_key.values_mut() {
            info.comment_ids.retain(|id| *id != comment_id);
        }
    }

    /// `None` when the state holds another version or nothing is recorded at `key`.
    pub fn comment_info(&self, version_id: VersionId, key: &CommentKey) -> Option<&CommentInfo> {
        if self.for_version_id != Some(version_id) {
            return None;
        }
        self.by_key.get(key)
    }

    pub fn comment(&self, comment_id: u64) -> Option<&Comment> {
        self.by_id.get(&comment_id)
    }

    /// `None` when the state holds another version.
    pub fn version_has_comments(&self, version_id: VersionId) -> Option<bool> {
        if self.for_version_id != Some(version_id) {
            return None;
        }
        Some(!self.by_id.is_empty())
    }

    /// Comments attached at `key`, in the order they were recorded.
    pub fn comments_at(&self, version_id: VersionId, key: &CommentKey) -> Vec<&Comment> {
        self.comment_info(version_id, key)
            .map(|info| {
                info.comment_ids
                    .iter()
                    .filter_map(|id| self.by_id.get(id))
                    .collect()
            })
            .unwrap_or_default()
    }
}
