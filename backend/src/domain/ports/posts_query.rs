//! Driving port for reading posts.

use async_trait::async_trait;

use crate::domain::{Error, Post, PostId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PostsQuery: Send + Sync {
    /// Posts on the given 1-based page.
    async fn list_posts(&self, page: u32, limit: u32) -> Result<Vec<Post>, Error>;

    async fn fetch_post(&self, id: &PostId) -> Result<Post, Error>;
}
