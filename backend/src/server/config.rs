//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use blog_backend::middleware::Cors;
#[cfg(feature = "dynamo")]
use blog_backend::outbound::dynamo::DynamoSettings;
use blog_backend::outbound::persistence::ScanSettings;
use blog_backend::settings::{AppSettings, SettingsError, StoreBackend};

/// Post store selected at startup.
#[derive(Debug, Clone)]
pub enum StoreConfig {
    Memory,
    #[cfg(feature = "dynamo")]
    Dynamo(DynamoSettings),
}

/// Resolved configuration for creating the HTTP server.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: StoreConfig,
    pub(crate) scan: ScanSettings,
    pub(crate) cors: Cors,
    pub(crate) log_body_limit: usize,
}

impl ServerConfig {
    /// Resolve loaded settings into runtime values.
    ///
    /// # Errors
    /// Returns [`SettingsError`] for malformed values, or when the DynamoDB
    /// store is requested from a build without the `dynamo` feature.
    pub fn from_settings(settings: &AppSettings) -> Result<Self, SettingsError> {
        let store = match settings.store_backend()? {
            StoreBackend::Memory => StoreConfig::Memory,
            #[cfg(feature = "dynamo")]
            StoreBackend::Dynamo => StoreConfig::Dynamo(settings.dynamo_settings()),
            #[cfg(not(feature = "dynamo"))]
            StoreBackend::Dynamo => {
                return Err(SettingsError::Store {
                    value: "dynamo (built without the dynamo feature)".to_owned(),
                });
            }
        };
        Ok(Self {
            bind_addr: settings.bind_addr()?,
            store,
            scan: settings.scan_settings()?,
            cors: settings.cors(),
            log_body_limit: settings.log_body_limit(),
        })
    }
}
