//! Post persistence adapters.
//!
//! [`ScanPostRepository`] emulates page-addressed listing on top of any
//! [`PostStore`](crate::domain::ports::PostStore). [`InMemoryPostStore`] is a
//! process-local store for development and tests.

mod in_memory_post_store;
mod scan_post_repository;

pub use in_memory_post_store::InMemoryPostStore;
pub use scan_post_repository::{ScanPostRepository, ScanSettings};
