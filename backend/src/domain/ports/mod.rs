//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports ([`PostsQuery`], [`PostsCommand`]) are what inbound adapters
//! call. Driven ports ([`PostRepository`], [`PostStore`]) are what the domain
//! needs from persistence. Each driven port has its own error enum so adapters
//! translate failures into predictable variants.

mod macros;
pub(crate) use macros::define_port_error;

mod post_repository;
mod post_store;
mod posts_command;
mod posts_query;

#[cfg(test)]
pub use post_repository::MockPostRepository;
pub use post_repository::{DeleteOutcome, PostRepository, PostRepositoryError};
#[cfg(test)]
pub use post_store::MockPostStore;
pub use post_store::{PostStore, PostStoreError, ScanBatch};
#[cfg(test)]
pub use posts_command::MockPostsCommand;
pub use posts_command::PostsCommand;
#[cfg(test)]
pub use posts_query::MockPostsQuery;
pub use posts_query::PostsQuery;
