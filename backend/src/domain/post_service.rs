//! Post service implementing the driving ports.
//!
//! Every write is validated before the repository sees it, and every mutation
//! of an existing post reads it first. The repository's conditional writes
//! close the gap between that read and the write: a post that disappears in
//! between surfaces as not found instead of being recreated.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::warn;

use crate::domain::ports::{
    DeleteOutcome, PostRepository, PostRepositoryError, PostsCommand, PostsQuery,
};
use crate::domain::{Error, Post, PostDraft, PostFields, PostId, PostPatch, ValidationErrors};

const RESOURCE: &str = "Post";
const STORAGE_UNAVAILABLE: &str = "Post storage is temporarily unavailable. Please retry.";

#[derive(Clone)]
pub struct PostService<R> {
    repository: Arc<R>,
}

impl<R> PostService<R> {
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> PostService<R>
where
    R: PostRepository,
{
    fn map_repository_error(id: Option<&PostId>, error: PostRepositoryError) -> Error {
        match error {
            PostRepositoryError::InvalidArgument { message } => Error::invalid_request(message),
            PostRepositoryError::NotFound { id: missing } => {
                Error::resource_not_found(RESOURCE, missing)
            }
            PostRepositoryError::Conflict { id: raced } => match id {
                // The post vanished between the existence check and the write.
                Some(id) => {
                    warn!(post_id = %id, "post removed during mutation");
                    Error::resource_not_found(RESOURCE, id)
                }
                None => Error::internal(format!("generated post id {raced} already in use")),
            },
            // The cause stays server side; adapters put endpoints and SDK text in it.
            PostRepositoryError::Storage { message } => {
                warn!(
                    post_id = ?id.map(PostId::as_str),
                    cause = %message,
                    "post storage unavailable"
                );
                Error::service_unavailable(STORAGE_UNAVAILABLE)
                    .with_details(json!({ "cause": message }))
            }
        }
    }

    fn validation_failed(errors: &ValidationErrors) -> Error {
        let violations: Vec<_> = errors
            .violations()
            .iter()
            .map(|violation| {
                json!({
                    "field": violation.field.as_str(),
                    "rule": violation.rule.to_string(),
                })
            })
            .collect();
        Error::invalid_request(errors.to_string()).with_details(json!({ "violations": violations }))
    }

    fn validate(draft: PostDraft) -> Result<PostFields, Error> {
        draft.validate().map_err(|errors| Self::validation_failed(&errors))
    }

    async fn require_existing(&self, id: &PostId) -> Result<Post, Error> {
        self.repository
            .find_by_id(id)
            .await
            .map_err(|error| Self::map_repository_error(Some(id), error))
    }

    async fn write_update(&self, id: &PostId, fields: PostFields) -> Result<Post, Error> {
        self.repository
            .update(id, fields)
            .await
            .map_err(|error| Self::map_repository_error(Some(id), error))
    }
}

#[async_trait]
impl<R> PostsQuery for PostService<R>
where
    R: PostRepository,
{
    async fn list_posts(&self, page: u32, limit: u32) -> Result<Vec<Post>, Error> {
        self.repository
            .list(page, limit)
            .await
            .map_err(|error| Self::map_repository_error(None, error))
    }

    async fn fetch_post(&self, id: &PostId) -> Result<Post, Error> {
        self.require_existing(id).await
    }
}

#[async_trait]
impl<R> PostsCommand for PostService<R>
where
    R: PostRepository,
{
    async fn create_post(&self, draft: PostDraft) -> Result<Post, Error> {
        let fields = Self::validate(draft)?;
        self.repository
            .create(fields)
            .await
            .map_err(|error| Self::map_repository_error(None, error))
    }

    async fn replace_post(&self, id: &PostId, draft: PostDraft) -> Result<Post, Error> {
        let fields = Self::validate(draft)?;
        self.require_existing(id).await?;
        self.write_update(id, fields).await
    }

    async fn patch_post(&self, id: &PostId, patch: PostPatch) -> Result<Post, Error> {
        let current = self.require_existing(id).await?;
        let fields = Self::validate(patch.apply_to(&current))?;
        self.write_update(id, fields).await
    }

    async fn delete_post(&self, id: &PostId) -> Result<(), Error> {
        self.require_existing(id).await?;
        match self
            .repository
            .delete(id)
            .await
            .map_err(|error| Self::map_repository_error(Some(id), error))?
        {
            DeleteOutcome::Removed(_) => Ok(()),
            DeleteOutcome::Absent => {
                warn!(post_id = %id, "post removed before delete ran");
                Err(Error::resource_not_found(RESOURCE, id))
            }
        }
    }
}

#[cfg(test)]
#[path = "post_service_tests.rs"]
mod tests;
