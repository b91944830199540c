//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_web::dev::Server;
use actix_web::{HttpServer, web};
use tracing::info;

use blog_backend::inbound::http::app::{AppDependencies, build_app};
use blog_backend::inbound::http::health::HealthState;
use state_builders::build_http_state;

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// The returned [`Server`] must be awaited to drive the listener. Readiness is
/// flagged once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let http_state = build_http_state(&config).await;
    let ServerConfig {
        bind_addr,
        store: _,
        scan: _,
        cors,
        log_body_limit,
    } = config;

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            cors: cors.clone(),
            log_body_limit,
        })
    })
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "blog backend listening");
    health_state.mark_ready();
    Ok(server)
}
