//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and only see the
//! driving ports, so they can be exercised with mocks and no storage.

use std::sync::Arc;

use crate::domain::ports::{PostsCommand, PostsQuery};

#[derive(Clone)]
pub struct HttpState {
    pub posts_query: Arc<dyn PostsQuery>,
    pub posts: Arc<dyn PostsCommand>,
}

impl HttpState {
    pub fn new(posts_query: Arc<dyn PostsQuery>, posts: Arc<dyn PostsCommand>) -> Self {
        Self { posts_query, posts }
    }

    /// State backed by one service implementing both posts ports.
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: PostsQuery + PostsCommand + 'static,
    {
        let posts_query: Arc<dyn PostsQuery> = service.clone();
        Self::new(posts_query, service)
    }
}
