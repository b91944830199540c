//! Domain-level error types.
//!
//! Errors here are transport agnostic. The HTTP adapter decides how each
//! [`ErrorCode`] is rendered, so services only pick a category and a message.

use std::fmt;

use serde_json::{Value, json};

use super::TraceId;

/// Failure category shared by every layer of the posts pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorCode {
    /// The request is malformed or fails validation.
    InvalidRequest,
    /// The caller is not permitted to make this request.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// The request body uses a media type the endpoint does not accept.
    UnsupportedMediaType,
    /// A backing store failed or timed out. Retrying may succeed.
    ServiceUnavailable,
    /// An unexpected error occurred inside the service.
    InternalError,
}

/// Error raised by services and middleware.
///
/// The trace identifier of the active request is captured on construction so
/// the rendered response can echo it back to the caller.
///
/// # Examples
/// ```
/// use blog_backend::domain::{Error, ErrorCode};
///
/// let err = Error::resource_not_found("Post", "42");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "Post with ID 42 not found");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Error {
    code: ErrorCode,
    message: String,
    details: Option<Value>,
    trace_id: Option<String>,
}

impl Error {
    /// Create an error tagged with the trace identifier in scope, if any.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
            trace_id: TraceId::current().map(|id| id.to_string()),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Structured context for logs and tests. Never serialized to clients.
    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_trace_id(mut self, trace_id: impl Into<String>) -> Self {
        self.trace_id = Some(trace_id.into());
        self
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidRequest, message)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::NotFound, message)
    }

    /// Not-found error naming the missing resource and its identifier.
    pub fn resource_not_found(resource: &str, id: impl fmt::Display) -> Self {
        let id = id.to_string();
        Self::not_found(format!("{resource} with ID {id} not found"))
            .with_details(json!({ "resource": resource, "id": id }))
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::UnsupportedMediaType, message)
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ServiceUnavailable, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Error::invalid_request("bad"), ErrorCode::InvalidRequest)]
    #[case(Error::forbidden("no"), ErrorCode::Forbidden)]
    #[case(Error::not_found("gone"), ErrorCode::NotFound)]
    #[case(Error::unsupported_media_type("xml"), ErrorCode::UnsupportedMediaType)]
    #[case(Error::service_unavailable("down"), ErrorCode::ServiceUnavailable)]
    #[case(Error::internal("boom"), ErrorCode::InternalError)]
    fn constructors_set_code(#[case] error: Error, #[case] expected: ErrorCode) {
        assert_eq!(error.code(), expected);
    }

    #[rstest]
    fn resource_not_found_names_resource_and_id() {
        let error = Error::resource_not_found("Post", "abc");
        assert_eq!(error.message(), "Post with ID abc not found");
        assert_eq!(
            error.details(),
            Some(&json!({ "resource": "Post", "id": "abc" }))
        );
    }

    #[rstest]
    fn trace_id_is_absent_outside_a_request() {
        assert!(Error::internal("boom").trace_id().is_none());
    }

    #[tokio::test]
    async fn trace_id_is_captured_inside_a_request() {
        let trace_id = TraceId::generate();
        let error = TraceId::scope(trace_id, async { Error::not_found("gone") }).await;
        assert_eq!(error.trace_id(), Some(trace_id.to_string().as_str()));
    }

    #[rstest]
    fn display_uses_message() {
        assert_eq!(Error::forbidden("Origin not allowed").to_string(), "Origin not allowed");
    }
}
