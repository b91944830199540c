//! [`PostStore`] over a DynamoDB table.

use std::collections::HashMap;
use std::fmt;
use std::num::NonZeroU32;

use async_trait::async_trait;
use aws_sdk_dynamodb::Client;
use aws_sdk_dynamodb::error::{DisplayErrorContext, SdkError};
use aws_sdk_dynamodb::operation::put_item::PutItemError;
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use pagination::Cursor;
use tracing::{debug, info};

use super::item::{
    AUTHOR, CONTENT, ID, TITLE, cursor_from_key, item_to_post, key, key_from_cursor, post_to_item,
};
use crate::domain::ports::{PostStore, PostStoreError, ScanBatch};
use crate::domain::{Post, PostFields, PostId};

/// Connection parameters for [`DynamoPostStore::connect`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DynamoSettings {
    pub table_name: String,
    /// Override for local DynamoDB or other compatible endpoints.
    pub endpoint: Option<String>,
    /// Region override. Falls back to the SDK default chain when `None`.
    pub region: Option<String>,
}

pub struct DynamoPostStore {
    client: Client,
    table_name: String,
}

impl DynamoPostStore {
    /// Build a client from the ambient AWS configuration plus overrides.
    pub async fn connect(settings: &DynamoSettings) -> Self {
        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = &settings.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        let config = loader.load().await;

        let mut builder = aws_sdk_dynamodb::config::Builder::from(&config);
        if let Some(endpoint) = &settings.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        let client = Client::from_conf(builder.build());

        info!(
            table = %settings.table_name,
            endpoint = settings.endpoint.as_deref().unwrap_or("default"),
            "connected to DynamoDB for posts"
        );
        Self::with_client(client, settings.table_name.clone())
    }

    pub fn with_client(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }

    fn field_values(fields: &PostFields) -> HashMap<String, AttributeValue> {
        HashMap::from([
            (":title".to_owned(), AttributeValue::S(fields.title().to_owned())),
            (":content".to_owned(), AttributeValue::S(fields.content().to_owned())),
            (":author".to_owned(), AttributeValue::S(fields.author().to_owned())),
        ])
    }
}

fn map_sdk_error<E, R>(operation: &str, error: &SdkError<E, R>) -> PostStoreError
where
    E: std::error::Error + 'static,
    R: fmt::Debug,
{
    let message = format!("DynamoDB {operation} failed: {}", DisplayErrorContext(error));
    debug!(operation, error = %message, "dynamodb call failed");
    match error {
        SdkError::TimeoutError(_) | SdkError::DispatchFailure(_) => {
            PostStoreError::connection(message)
        }
        _ => PostStoreError::query(message),
    }
}

#[async_trait]
impl PostStore for DynamoPostStore {
    async fn scan(
        &self,
        limit: NonZeroU32,
        cursor: Option<Cursor>,
    ) -> Result<ScanBatch, PostStoreError> {
        let start_key = cursor.as_ref().map(key_from_cursor).transpose()?;
        let output = self
            .client
            .scan()
            .table_name(&self.table_name)
            .limit(i32::try_from(limit.get()).unwrap_or(i32::MAX))
            .set_exclusive_start_key(start_key)
            .send()
            .await
            .map_err(|err| map_sdk_error("scan", &err))?;

        let items = output
            .items
            .unwrap_or_default()
            .iter()
            .map(item_to_post)
            .collect::<Result<Vec<_>, _>>()?;
        let next_cursor = output
            .last_evaluated_key
            .as_ref()
            .filter(|key| !key.is_empty())
            .map(cursor_from_key)
            .transpose()?;
        debug!(count = items.len(), more = next_cursor.is_some(), "scanned posts");
        Ok(ScanBatch { items, next_cursor })
    }

    async fn get_item(&self, id: &PostId) -> Result<Option<Post>, PostStoreError> {
        let output = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .set_key(Some(key(id)))
            .send()
            .await
            .map_err(|err| map_sdk_error("get_item", &err))?;
        output.item.as_ref().map(item_to_post).transpose()
    }

    async fn put_item(&self, post: &Post) -> Result<(), PostStoreError> {
        let result = self
            .client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(post_to_item(post)))
            .condition_expression("attribute_not_exists(#id)")
            .expression_attribute_names("#id", ID)
            .send()
            .await;
        match result {
            Ok(_) => Ok(()),
            Err(err) => match err.as_service_error() {
                Some(PutItemError::ConditionalCheckFailedException(_)) => {
                    Err(PostStoreError::condition_failed(post.id.to_string()))
                }
                _ => Err(map_sdk_error("put_item", &err)),
            },
        }
    }

    async fn update_item(&self, id: &PostId, fields: &PostFields) -> Result<Post, PostStoreError> {
        let result = self
            .client
            .update_item()
            .table_name(&self.table_name)
            .set_key(Some(key(id)))
            .update_expression("SET #title = :title, #content = :content, #author = :author")
            .condition_expression("attribute_exists(#id)")
            .expression_attribute_names("#id", ID)
            .expression_attribute_names("#title", TITLE)
            .expression_attribute_names("#content", CONTENT)
            .expression_attribute_names("#author", AUTHOR)
            .set_expression_attribute_values(Some(Self::field_values(fields)))
            .return_values(ReturnValue::AllNew)
            .send()
            .await;
        let output = match result {
            Ok(output) => output,
            Err(err) => {
                return match err.as_service_error() {
                    Some(UpdateItemError::ConditionalCheckFailedException(_)) => {
                        Err(PostStoreError::condition_failed(id.to_string()))
                    }
                    _ => Err(map_sdk_error("update_item", &err)),
                };
            }
        };
        let attributes = output.attributes.ok_or_else(|| {
            PostStoreError::serialization("update_item returned no attributes")
        })?;
        item_to_post(&attributes)
    }

    async fn delete_item(&self, id: &PostId) -> Result<Option<Post>, PostStoreError> {
        let output = self
            .client
            .delete_item()
            .table_name(&self.table_name)
            .set_key(Some(key(id)))
            .return_values(ReturnValue::AllOld)
            .send()
            .await
            .map_err(|err| map_sdk_error("delete_item", &err))?;
        output.attributes.as_ref().map(item_to_post).transpose()
    }
}
