//! DynamoDB-backed post store.
//!
//! Posts live in a single table keyed by the string attribute `ID`, with
//! `Title`, `Content`, and `Author` string attributes alongside.

mod item;
mod post_store;

pub use post_store::{DynamoPostStore, DynamoSettings};
