//! Driven port over the raw key-value store holding posts.
//!
//! The store only knows how to scan forward in batches and address single
//! records by key. Page arithmetic lives in the repository built on top.

use std::num::NonZeroU32;

use async_trait::async_trait;
use pagination::Cursor;

use super::define_port_error;
use crate::domain::{Post, PostFields, PostId};

define_port_error! {
    /// Failures reported by a [`PostStore`] adapter.
    pub enum PostStoreError {
        /// The store could not be reached.
        Connection { message: String } => "post store connection failed: {message}",
        /// The store rejected or failed a request.
        Query { message: String } => "post store query failed: {message}",
        /// A conditional write found the key in the wrong state.
        ConditionFailed { id: String } => "conditional write failed for post {id}",
        /// A record or cursor could not be converted.
        Serialization { message: String } => "post store serialization failed: {message}",
        /// A call did not finish within the configured deadline.
        Timeout { operation: String } => "post store {operation} timed out",
    }
}

/// One batch of a forward scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanBatch {
    pub items: Vec<Post>,
    /// Resume point for the next call. `None` once the table is exhausted.
    pub next_cursor: Option<Cursor>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Read up to `limit` records starting after `cursor`.
    ///
    /// A batch may hold fewer than `limit` records while still returning a
    /// cursor. Callers keep scanning until the cursor is `None`.
    async fn scan(
        &self,
        limit: NonZeroU32,
        cursor: Option<Cursor>,
    ) -> Result<ScanBatch, PostStoreError>;

    async fn get_item(&self, id: &PostId) -> Result<Option<Post>, PostStoreError>;

    /// Insert `post`, failing with [`PostStoreError::ConditionFailed`] when
    /// the key is already taken.
    async fn put_item(&self, post: &Post) -> Result<(), PostStoreError>;

    /// Replace the mutable fields of an existing record and return it as
    /// stored. Fails with [`PostStoreError::ConditionFailed`] when the key is
    /// absent.
    async fn update_item(&self, id: &PostId, fields: &PostFields) -> Result<Post, PostStoreError>;

    /// Remove a record, returning it if it existed.
    async fn delete_item(&self, id: &PostId) -> Result<Option<Post>, PostStoreError>;
}
