//! Process-local [`PostStore`] backed by an ordered map.
//!
//! Scans walk keys in ascending order and the cursor carries the last key
//! returned, so a scan resumes correctly even if records are inserted or
//! removed between calls.

use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::ops::Bound;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use pagination::Cursor;
use serde::{Deserialize, Serialize};

use crate::domain::ports::{PostStore, PostStoreError, ScanBatch};
use crate::domain::{Post, PostFields, PostId};

#[derive(Debug, Serialize, Deserialize)]
struct ResumeKey {
    after: PostId,
}

#[derive(Debug, Default)]
pub struct InMemoryPostStore {
    items: RwLock<BTreeMap<PostId, Post>>,
}

impl InMemoryPostStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `posts`, keyed by their ids.
    pub fn with_posts(posts: impl IntoIterator<Item = Post>) -> Self {
        let items = posts.into_iter().map(|post| (post.id.clone(), post)).collect();
        Self {
            items: RwLock::new(items),
        }
    }

    pub fn len(&self) -> Result<usize, PostStoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, PostStoreError> {
        Ok(self.read()?.is_empty())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, BTreeMap<PostId, Post>>, PostStoreError> {
        self.items
            .read()
            .map_err(|_| PostStoreError::connection("in-memory post store lock poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, BTreeMap<PostId, Post>>, PostStoreError> {
        self.items
            .write()
            .map_err(|_| PostStoreError::connection("in-memory post store lock poisoned"))
    }
}

#[async_trait]
impl PostStore for InMemoryPostStore {
    async fn scan(
        &self,
        limit: NonZeroU32,
        cursor: Option<Cursor>,
    ) -> Result<ScanBatch, PostStoreError> {
        let lower = match cursor {
            Some(cursor) => {
                let key: ResumeKey = cursor
                    .decode()
                    .map_err(|err| PostStoreError::serialization(format!("invalid scan cursor: {err}")))?;
                Bound::Excluded(key.after)
            }
            None => Bound::Unbounded,
        };
        let batch_len = usize::try_from(limit.get()).unwrap_or(usize::MAX);

        let items = self.read()?;
        let mut remaining = items.range((lower, Bound::Unbounded)).map(|(_, post)| post);
        let batch: Vec<Post> = remaining.by_ref().take(batch_len).cloned().collect();
        let next_cursor = match (remaining.next(), batch.last()) {
            (Some(_), Some(last)) => Some(
                Cursor::encode(&ResumeKey {
                    after: last.id.clone(),
                })
                .map_err(|err| PostStoreError::serialization(err.to_string()))?,
            ),
            _ => None,
        };

        Ok(ScanBatch {
            items: batch,
            next_cursor,
        })
    }

    async fn get_item(&self, id: &PostId) -> Result<Option<Post>, PostStoreError> {
        Ok(self.read()?.get(id).cloned())
    }

    async fn put_item(&self, post: &Post) -> Result<(), PostStoreError> {
        let mut items = self.write()?;
        if items.contains_key(&post.id) {
            return Err(PostStoreError::condition_failed(post.id.to_string()));
        }
        items.insert(post.id.clone(), post.clone());
        Ok(())
    }

    async fn update_item(&self, id: &PostId, fields: &PostFields) -> Result<Post, PostStoreError> {
        let mut items = self.write()?;
        let post = items
            .get_mut(id)
            .ok_or_else(|| PostStoreError::condition_failed(id.to_string()))?;
        post.title = fields.title().to_owned();
        post.content = fields.content().to_owned();
        post.author = fields.author().to_owned();
        Ok(post.clone())
    }

    async fn delete_item(&self, id: &PostId) -> Result<Option<Post>, PostStoreError> {
        Ok(self.write()?.remove(id))
    }
}
