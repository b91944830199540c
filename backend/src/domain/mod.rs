//! Domain primitives, ports, and services for the posts resource.
//!
//! Public surface:
//! - [`Post`], [`PostDraft`], [`PostFields`], [`PostPatch`]: the entity and
//!   its write-side shapes.
//! - [`Error`] and [`ErrorCode`]: transport-agnostic failures.
//! - [`PostService`]: implements the driving ports over a repository.
//! - [`TraceId`]: per-request correlation identifier.

pub mod error;
pub mod ports;
pub mod post;
mod post_service;
pub mod trace_id;

pub use self::error::{Error, ErrorCode};
pub use self::post::{
    EmptyPostId, FieldViolation, Post, PostDraft, PostField, PostFields, PostId, PostPatch,
    TITLE_MIN_LENGTH, ValidationErrors, ValidationRule,
};
pub use self::post_service::PostService;
pub use self::trace_id::TraceId;

/// Header carrying the request trace identifier on every response.
pub const TRACE_ID_HEADER: &str = "trace-id";
