//! Page-addressed post repository over a forward-only scanning store.
//!
//! The store cannot skip records, so listing page `p` of size `l` scans from
//! the start of the table until `p * l` records have been accumulated or the
//! table is exhausted, then slices the requested window out of the buffer.
//! The cost of a page grows linearly with its number.

use std::collections::HashSet;
use std::future::Future;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pagination::{Cursor, PageRequest};
use tracing::{debug, warn};

use crate::domain::ports::{
    DeleteOutcome, PostRepository, PostRepositoryError, PostStore, PostStoreError, ScanBatch,
};
use crate::domain::{Post, PostFields, PostId};

/// Tuning for [`ScanPostRepository`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanSettings {
    /// Records requested per scan call. `None` uses the page limit.
    pub batch_size: Option<NonZeroU32>,
    /// Deadline applied to every individual store call.
    pub store_timeout: Duration,
}

impl ScanSettings {
    pub const DEFAULT_STORE_TIMEOUT: Duration = Duration::from_secs(5);
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            batch_size: None,
            store_timeout: Self::DEFAULT_STORE_TIMEOUT,
        }
    }
}

#[derive(Clone)]
pub struct ScanPostRepository<S> {
    store: Arc<S>,
    settings: ScanSettings,
}

impl<S> ScanPostRepository<S> {
    pub fn new(store: Arc<S>, settings: ScanSettings) -> Self {
        Self { store, settings }
    }
}

fn map_store_error(error: PostStoreError) -> PostRepositoryError {
    match error {
        PostStoreError::ConditionFailed { id } => PostRepositoryError::conflict(id),
        other => {
            debug!(error = %other, "post store call failed");
            PostRepositoryError::storage(other.to_string())
        }
    }
}

impl<S> ScanPostRepository<S>
where
    S: PostStore,
{
    /// Await a store call under the configured deadline.
    async fn call<T>(
        &self,
        operation: &'static str,
        fut: impl Future<Output = Result<T, PostStoreError>>,
    ) -> Result<T, PostRepositoryError> {
        match tokio::time::timeout(self.settings.store_timeout, fut).await {
            Ok(result) => result.map_err(map_store_error),
            Err(_) => {
                warn!(operation, timeout = ?self.settings.store_timeout, "post store call timed out");
                Err(map_store_error(PostStoreError::timeout(operation)))
            }
        }
    }
}

#[async_trait]
impl<S> PostRepository for ScanPostRepository<S>
where
    S: PostStore,
{
    async fn list(&self, page: u32, limit: u32) -> Result<Vec<Post>, PostRepositoryError> {
        let request = PageRequest::new(page, limit)
            .map_err(|err| PostRepositoryError::invalid_argument(err.to_string()))?;
        let window = request.window();
        let batch_size = self.settings.batch_size.unwrap_or(request.limit());

        let mut accumulated: Vec<Post> = Vec::new();
        let mut cursor: Option<Cursor> = None;
        let mut seen: HashSet<Cursor> = HashSet::new();
        let mut scans = 0_u32;
        loop {
            let ScanBatch { items, next_cursor } = self
                .call("scan", self.store.scan(batch_size, cursor.take()))
                .await?;
            scans += 1;
            accumulated.extend(items);

            let Some(next) = next_cursor else { break };
            if window.is_filled_by(accumulated.len()) {
                break;
            }
            // A store that hands back any earlier cursor would loop forever.
            if !seen.insert(next.clone()) {
                warn!(scans, cursor = %next, "post store repeated a scan cursor");
                return Err(PostRepositoryError::storage("scan cursor repeated"));
            }
            cursor = Some(next);
        }

        debug!(
            page,
            limit,
            scans,
            accumulated = accumulated.len(),
            "assembled post page from scan"
        );
        Ok(window.take_from(accumulated))
    }

    async fn find_by_id(&self, id: &PostId) -> Result<Post, PostRepositoryError> {
        self.call("get_item", self.store.get_item(id))
            .await?
            .ok_or_else(|| PostRepositoryError::not_found(id.to_string()))
    }

    async fn create(&self, fields: PostFields) -> Result<Post, PostRepositoryError> {
        let post = Post::new(PostId::generate(), fields);
        self.call("put_item", self.store.put_item(&post)).await?;
        debug!(post_id = %post.id, "stored new post");
        Ok(post)
    }

    async fn update(&self, id: &PostId, fields: PostFields) -> Result<Post, PostRepositoryError> {
        self.call("update_item", self.store.update_item(id, &fields))
            .await
    }

    async fn delete(&self, id: &PostId) -> Result<DeleteOutcome, PostRepositoryError> {
        let removed = self
            .call("delete_item", self.store.delete_item(id))
            .await?;
        Ok(removed.map_or(DeleteOutcome::Absent, DeleteOutcome::Removed))
    }
}

#[cfg(test)]
#[path = "scan_post_repository_tests.rs"]
mod tests;
