//! Driving port for creating, changing, and removing posts.
//!
//! Implementations validate drafts before any write and confirm the target
//! exists before mutating it.

use async_trait::async_trait;

use crate::domain::{Error, Post, PostDraft, PostId, PostPatch};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsCommand: Send + Sync {
    async fn create_post(&self, draft: PostDraft) -> Result<Post, Error>;

    /// Replace every mutable field of an existing post.
    async fn replace_post(&self, id: &PostId, draft: PostDraft) -> Result<Post, Error>;

    /// Merge the present fields onto an existing post and re-validate.
    async fn patch_post(&self, id: &PostId, patch: PostPatch) -> Result<Post, Error>;

    async fn delete_post(&self, id: &PostId) -> Result<(), Error>;
}
