//! Conversion between posts and DynamoDB attribute maps.

use std::collections::{BTreeMap, HashMap};

use aws_sdk_dynamodb::types::AttributeValue;
use pagination::Cursor;

use crate::domain::ports::PostStoreError;
use crate::domain::{Post, PostId};

pub(super) const ID: &str = "ID";
pub(super) const TITLE: &str = "Title";
pub(super) const CONTENT: &str = "Content";
pub(super) const AUTHOR: &str = "Author";

pub(super) type Item = HashMap<String, AttributeValue>;

pub(super) fn key(id: &PostId) -> Item {
    HashMap::from([(ID.to_owned(), AttributeValue::S(id.to_string()))])
}

pub(super) fn post_to_item(post: &Post) -> Item {
    HashMap::from([
        (ID.to_owned(), AttributeValue::S(post.id.to_string())),
        (TITLE.to_owned(), AttributeValue::S(post.title.clone())),
        (CONTENT.to_owned(), AttributeValue::S(post.content.clone())),
        (AUTHOR.to_owned(), AttributeValue::S(post.author.clone())),
    ])
}

fn string_attribute(item: &Item, name: &str) -> Result<String, PostStoreError> {
    match item.get(name) {
        Some(AttributeValue::S(value)) => Ok(value.clone()),
        Some(_) => Err(PostStoreError::serialization(format!(
            "attribute {name} is not a string"
        ))),
        None => Err(PostStoreError::serialization(format!(
            "attribute {name} is missing"
        ))),
    }
}

pub(super) fn item_to_post(item: &Item) -> Result<Post, PostStoreError> {
    let id = PostId::new(string_attribute(item, ID)?)
        .map_err(|err| PostStoreError::serialization(err.to_string()))?;
    Ok(Post {
        id,
        title: string_attribute(item, TITLE)?,
        content: string_attribute(item, CONTENT)?,
        author: string_attribute(item, AUTHOR)?,
    })
}

/// Wrap a `LastEvaluatedKey` as an opaque cursor.
///
/// Only string key attributes are supported, which covers the `ID` key of
/// the posts table.
pub(super) fn cursor_from_key(key: &Item) -> Result<Cursor, PostStoreError> {
    let strings = key
        .iter()
        .map(|(name, value)| match value {
            AttributeValue::S(text) => Ok((name.clone(), text.clone())),
            _ => Err(PostStoreError::serialization(format!(
                "scan key attribute {name} is not a string"
            ))),
        })
        .collect::<Result<BTreeMap<_, _>, _>>()?;
    Cursor::encode(&strings).map_err(|err| PostStoreError::serialization(err.to_string()))
}

pub(super) fn key_from_cursor(cursor: &Cursor) -> Result<Item, PostStoreError> {
    let strings: BTreeMap<String, String> = cursor
        .decode()
        .map_err(|err| PostStoreError::serialization(format!("invalid scan cursor: {err}")))?;
    Ok(strings
        .into_iter()
        .map(|(name, text)| (name, AttributeValue::S(text)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Post {
        Post {
            id: PostId::new("p-1").expect("valid id"),
            title: "Title".to_owned(),
            content: "body".to_owned(),
            author: "ada".to_owned(),
        }
    }

    #[test]
    fn items_use_capitalised_attribute_names() {
        let item = post_to_item(&sample());
        assert_eq!(item.get("ID"), Some(&AttributeValue::S("p-1".to_owned())));
        assert_eq!(item.get("Author"), Some(&AttributeValue::S("ada".to_owned())));
        assert_eq!(item_to_post(&item).expect("decodes"), sample());
    }

    #[test]
    fn missing_attribute_is_a_serialization_error() {
        let mut item = post_to_item(&sample());
        item.remove(CONTENT);
        let err = item_to_post(&item).expect_err("content missing");
        assert_eq!(err, PostStoreError::serialization("attribute Content is missing"));
    }

    #[test]
    fn non_string_id_is_rejected() {
        let mut item = post_to_item(&sample());
        item.insert(ID.to_owned(), AttributeValue::N("7".to_owned()));
        assert!(item_to_post(&item).is_err());
    }

    #[test]
    fn scan_key_survives_the_cursor() {
        let start = key(&sample().id);
        let cursor = cursor_from_key(&start).expect("encodes");
        assert_eq!(key_from_cursor(&cursor).expect("decodes"), start);
    }

    #[test]
    fn numeric_scan_keys_are_unsupported() {
        let start = HashMap::from([(ID.to_owned(), AttributeValue::N("1".to_owned()))]);
        assert!(cursor_from_key(&start).is_err());
    }
}
