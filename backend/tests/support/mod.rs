//! Shared helpers for HTTP integration tests.

use std::sync::Arc;

use actix_http::Request;
use actix_web::body::MessageBody;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{test, web};

use blog_backend::domain::PostService;
use blog_backend::inbound::http::app::{AppDependencies, build_app};
use blog_backend::inbound::http::health::HealthState;
use blog_backend::inbound::http::state::HttpState;
use blog_backend::middleware::{Cors, RequestLog};
use blog_backend::outbound::persistence::{InMemoryPostStore, ScanPostRepository, ScanSettings};

pub const ALLOWED_ORIGIN: &str = "https://blog.example";

/// Initialise the full application over `store`, allowing only
/// [`ALLOWED_ORIGIN`].
pub async fn init_app(
    store: Arc<InMemoryPostStore>,
) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error> {
    let repository = Arc::new(ScanPostRepository::new(store, ScanSettings::default()));
    let service = Arc::new(PostService::new(repository));
    test::init_service(build_app(AppDependencies {
        health_state: web::Data::new(HealthState::new()),
        http_state: web::Data::new(HttpState::from_service(service)),
        cors: Cors::new([ALLOWED_ORIGIN]),
        log_body_limit: RequestLog::DEFAULT_BODY_LIMIT,
    }))
    .await
}

pub fn stored_count(store: &InMemoryPostStore) -> usize {
    store.len().expect("store lock")
}
