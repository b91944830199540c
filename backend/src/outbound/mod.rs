//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: the scan-based [`PostRepository`] and an in-memory
//!   [`PostStore`]
//! - **dynamo**: a DynamoDB-backed [`PostStore`] (feature `dynamo`)
//!
//! Adapters translate between domain types and storage representations. They
//! contain no business rules.
//!
//! [`PostRepository`]: crate::domain::ports::PostRepository
//! [`PostStore`]: crate::domain::ports::PostStore

#[cfg(feature = "dynamo")]
pub mod dynamo;
pub mod persistence;
