//! Runtime settings loaded via OrthoConfig.
//!
//! Every field can be supplied as a `BLOG_*` environment variable, a CLI
//! flag, or a configuration file entry. Unset values fall back to the
//! defaults exposed by the accessors below.

use std::net::SocketAddr;
use std::num::NonZeroU32;
use std::str::FromStr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::middleware::{Cors, RequestLog};
#[cfg(feature = "dynamo")]
use crate::outbound::dynamo::DynamoSettings;
use crate::outbound::persistence::ScanSettings;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_TABLE_NAME: &str = "TestTable";
const DEFAULT_REGION: &str = "us-east-1";

/// Settings that failed to parse into their runtime types.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}")]
    BindAddr { value: String },
    #[error("unknown post store {value:?}; expected \"memory\" or \"dynamo\"")]
    Store { value: String },
    #[error("scan batch size must be at least 1")]
    ZeroBatchSize,
}

/// Backing store for posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Dynamo,
}

impl FromStr for StoreBackend {
    type Err = SettingsError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(Self::Memory),
            "dynamo" | "dynamodb" => Ok(Self::Dynamo),
            _ => Err(SettingsError::Store {
                value: value.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOG")]
pub struct AppSettings {
    /// Socket address the HTTP server binds to.
    #[ortho_config(default = DEFAULT_BIND_ADDR.to_owned())]
    pub bind_addr: String,
    /// `memory` or `dynamo`.
    pub store: Option<String>,
    /// DynamoDB table holding posts.
    pub table_name: Option<String>,
    /// DynamoDB endpoint override, e.g. a local DynamoDB container.
    pub dynamodb_endpoint: Option<String>,
    pub dynamodb_region: Option<String>,
    /// Records fetched per scan call. Defaults to the requested page size.
    pub scan_batch_size: Option<u32>,
    /// Deadline for each store call, in milliseconds.
    pub store_timeout_ms: Option<u64>,
    /// CORS allow-list, comma-separated in the environment. `*` or an empty
    /// list allows every origin.
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    /// Largest request body, in bytes, written to the request log.
    pub log_body_limit: Option<usize>,
}

impl AppSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        self.bind_addr
            .trim()
            .parse()
            .map_err(|_| SettingsError::BindAddr {
                value: self.bind_addr.clone(),
            })
    }

    pub fn store_backend(&self) -> Result<StoreBackend, SettingsError> {
        self.store
            .as_deref()
            .map_or(Ok(StoreBackend::Memory), StoreBackend::from_str)
    }

    pub fn table_name(&self) -> &str {
        self.table_name.as_deref().unwrap_or(DEFAULT_TABLE_NAME)
    }

    pub fn dynamodb_region(&self) -> &str {
        self.dynamodb_region.as_deref().unwrap_or(DEFAULT_REGION)
    }

    #[cfg(feature = "dynamo")]
    pub fn dynamo_settings(&self) -> DynamoSettings {
        DynamoSettings {
            table_name: self.table_name().to_owned(),
            endpoint: self.dynamodb_endpoint.clone(),
            region: Some(self.dynamodb_region().to_owned()),
        }
    }

    pub fn scan_settings(&self) -> Result<ScanSettings, SettingsError> {
        let batch_size = match self.scan_batch_size {
            Some(size) => Some(NonZeroU32::new(size).ok_or(SettingsError::ZeroBatchSize)?),
            None => None,
        };
        let store_timeout = self
            .store_timeout_ms
            .map_or(ScanSettings::DEFAULT_STORE_TIMEOUT, Duration::from_millis);
        Ok(ScanSettings {
            batch_size,
            store_timeout,
        })
    }

    pub fn cors(&self) -> Cors {
        if self.allowed_origins.iter().all(|origin| origin.trim().is_empty()) {
            return Cors::allow_any();
        }
        Cors::new(&self.allowed_origins)
    }

    pub fn log_body_limit(&self) -> usize {
        self.log_body_limit
            .unwrap_or(RequestLog::DEFAULT_BODY_LIMIT)
    }
}
