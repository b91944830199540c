//! Driven port for page-addressed post persistence.

use async_trait::async_trait;

use super::define_port_error;
use crate::domain::{Post, PostFields, PostId};

define_port_error! {
    /// Failures surfaced by a [`PostRepository`].
    pub enum PostRepositoryError {
        /// Caller supplied arguments the repository cannot act on.
        InvalidArgument { message: String } => "invalid repository argument: {message}",
        /// No post is stored under the key.
        NotFound { id: String } => "post {id} not found",
        /// A conditional write lost a race with another writer.
        Conflict { id: String } => "post {id} changed concurrently",
        /// The store failed for a reason other than absence.
        Storage { message: String } => "post storage failed: {message}",
    }
}

/// Result of a delete that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Removed(Post),
    /// Nothing was stored under the key when the delete ran.
    Absent,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// One page of posts in store scan order.
    ///
    /// `page` and `limit` are 1-based and must be at least one. Pages past the
    /// end of the table are empty, not errors.
    async fn list(&self, page: u32, limit: u32) -> Result<Vec<Post>, PostRepositoryError>;

    async fn find_by_id(&self, id: &PostId) -> Result<Post, PostRepositoryError>;

    /// Store a new post under a freshly generated id.
    async fn create(&self, fields: PostFields) -> Result<Post, PostRepositoryError>;

    /// Replace title, content, and author of an existing post.
    async fn update(&self, id: &PostId, fields: PostFields) -> Result<Post, PostRepositoryError>;

    async fn delete(&self, id: &PostId) -> Result<DeleteOutcome, PostRepositoryError>;
}
