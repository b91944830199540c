//! Builders for the post store and the HTTP state wired on top of it.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use blog_backend::domain::PostService;
use blog_backend::domain::ports::PostStore;
use blog_backend::inbound::http::state::HttpState;
#[cfg(feature = "dynamo")]
use blog_backend::outbound::dynamo::DynamoPostStore;
use blog_backend::outbound::persistence::{InMemoryPostStore, ScanPostRepository, ScanSettings};

use super::config::{ServerConfig, StoreConfig};

fn state_for_store<S>(store: Arc<S>, scan: ScanSettings) -> web::Data<HttpState>
where
    S: PostStore + 'static,
{
    let repository = Arc::new(ScanPostRepository::new(store, scan));
    let service = Arc::new(PostService::new(repository));
    web::Data::new(HttpState::from_service(service))
}

/// Connect the configured store and build the posts state shared by every
/// worker.
pub(crate) async fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    match &config.store {
        StoreConfig::Memory => {
            info!("using in-memory post store");
            state_for_store(Arc::new(InMemoryPostStore::new()), config.scan)
        }
        #[cfg(feature = "dynamo")]
        StoreConfig::Dynamo(settings) => {
            let store = DynamoPostStore::connect(settings).await;
            state_for_store(Arc::new(store), config.scan)
        }
    }
}
