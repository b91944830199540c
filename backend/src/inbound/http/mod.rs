//! HTTP inbound adapter exposing the posts REST endpoints.

pub mod app;
pub mod error;
pub mod health;
pub mod posts;
pub mod state;
pub mod validation;

pub use error::ApiResult;
