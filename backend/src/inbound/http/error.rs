//! HTTP adapter mapping for domain errors.
//!
//! Every error leaves the service as `{"error": <status text>, "description":
//! <message>}`. Internal errors keep their message in the logs and send a
//! fixed description instead.

use actix_web::error::JsonPayloadError;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use actix_web::{HttpRequest, HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Description sent in place of internal error messages.
pub const INTERNAL_ERROR_DESCRIPTION: &str = "A server error occurred. Please contact support.";

/// JSON error envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Canonical reason phrase of the status code.
    #[schema(example = "Not Found")]
    pub error: String,
    #[schema(example = "Post with ID 42 not found")]
    pub description: String,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ErrorBody {
    fn for_error(status: StatusCode, error: &Error) -> Self {
        let description = if error.code() == ErrorCode::InternalError {
            error!(
                message = error.message(),
                trace_id = error.trace_id().unwrap_or_default(),
                "internal error"
            );
            INTERNAL_ERROR_DESCRIPTION.to_owned()
        } else {
            error.message().to_owned()
        };
        Self {
            error: status.canonical_reason().unwrap_or("Unknown Status").to_owned(),
            description,
        }
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let mut builder = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            builder.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        match serde_json::to_string(&ErrorBody::for_error(status, self)) {
            Ok(body) => builder.content_type(ContentType::json()).body(body),
            Err(err) => {
                error!(error = %err, status = status.as_u16(), "failed to encode error body");
                builder.finish()
            }
        }
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "actix error promoted to domain error");
        Error::internal(err.to_string())
    }
}

/// Map JSON extractor failures onto the error envelope.
///
/// A missing or non-JSON content type is a 415. Every other failure,
/// including malformed JSON and oversized bodies, is a 400.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    let error = match &err {
        JsonPayloadError::ContentType => {
            Error::unsupported_media_type("Content-Type must be application/json")
        }
        other => Error::invalid_request(format!("invalid JSON body: {other}")),
    };
    error.into()
}

#[cfg(test)]
mod tests;
