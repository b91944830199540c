//! Request/response logging with a request-scoped trace identifier.
//!
//! Every request gets a fresh [`TraceId`] that stays in scope for the rest of
//! the pipeline and is echoed in the `trace-id` response header. The request
//! line, headers, and body are logged before dispatch. Status and latency are
//! logged once the response is ready.
//!
//! Credential headers are redacted. Bodies larger than the configured limit,
//! or without a declared length, are not buffered and are logged as elided.

use std::fmt;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Instant;

use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{
    AUTHORIZATION, CONTENT_LENGTH, COOKIE, HeaderMap, HeaderName, HeaderValue, PROXY_AUTHORIZATION,
    TRANSFER_ENCODING,
};
use actix_web::error::PayloadError;
use actix_web::web::{Bytes, BytesMut};
use actix_web::{Error, HttpMessage};
use futures_util::StreamExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{error, info, warn};

use crate::domain::{TRACE_ID_HEADER, TraceId};

const REDACTED: &str = "<redacted>";

fn is_sensitive(name: &HeaderName) -> bool {
    *name == AUTHORIZATION || *name == PROXY_AUTHORIZATION || *name == COOKIE
}

/// Logging stage. Wrap it outermost so every other stage runs inside the
/// trace scope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use blog_backend::middleware::RequestLog;
///
/// let app = App::new().wrap(RequestLog::new(RequestLog::DEFAULT_BODY_LIMIT));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequestLog {
    body_limit: usize,
}

impl RequestLog {
    pub const DEFAULT_BODY_LIMIT: usize = 16 * 1024;

    /// Log bodies whose declared length is at most `body_limit` bytes.
    pub fn new(body_limit: usize) -> Self {
        Self { body_limit }
    }
}

impl Default for RequestLog {
    fn default() -> Self {
        Self::new(Self::DEFAULT_BODY_LIMIT)
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestLog
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLogMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLogMiddleware {
            service: Rc::new(service),
            body_limit: self.body_limit,
        }))
    }
}

/// Service wrapper produced by [`RequestLog`].
pub struct RequestLogMiddleware<S> {
    service: Rc<S>,
    body_limit: usize,
}

/// What the request log records about a body.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LoggedBody {
    Empty,
    Captured(String),
    Elided { declared: Option<usize> },
    Unreadable,
}

impl fmt::Display for LoggedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Captured(body) => f.write_str(body),
            Self::Elided {
                declared: Some(len),
            } => write!(f, "<{len} bytes elided>"),
            Self::Elided { declared: None } => f.write_str("<streamed body elided>"),
            Self::Unreadable => f.write_str("<unreadable body>"),
        }
    }
}

struct HeaderSummary<'a>(&'a HeaderMap);

impl fmt::Display for HeaderSummary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&HeaderName> = self.0.keys().collect();
        names.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        names.dedup();
        for (index, name) in names.into_iter().enumerate() {
            if index > 0 {
                f.write_str(", ")?;
            }
            if is_sensitive(name) {
                write!(f, "{name}: {REDACTED}")?;
                continue;
            }
            let values: Vec<&str> = self
                .0
                .get_all(name)
                .map(|value| value.to_str().unwrap_or("<binary>"))
                .collect();
            write!(f, "{name}: {}", values.join(","))?;
        }
        Ok(())
    }
}

fn declared_length(headers: &HeaderMap) -> Option<usize> {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
}

/// Rebuild the request payload from buffered bytes. A read failure is
/// replayed after the bytes so the handler sees the same error.
fn replay(bytes: Bytes, failure: Option<PayloadError>) -> Payload {
    let (mut sender, mut payload) = actix_http::h1::Payload::create(failure.is_none());
    if !bytes.is_empty() {
        payload.unread_data(bytes);
    }
    if let Some(err) = failure {
        sender.set_error(err);
    }
    Payload::from(payload)
}

/// Buffer the body for logging and put it back for the handler.
async fn capture_body(req: &mut ServiceRequest, limit: usize) -> LoggedBody {
    let declared = declared_length(req.headers());
    let len = match declared {
        Some(0) => return LoggedBody::Empty,
        Some(len) if len <= limit => len,
        Some(_) => return LoggedBody::Elided { declared },
        None if req.headers().contains_key(TRANSFER_ENCODING) => {
            return LoggedBody::Elided { declared: None };
        }
        None => return LoggedBody::Empty,
    };

    let mut payload = req.take_payload();
    let mut buffer = BytesMut::with_capacity(len);
    let mut failure = None;
    while let Some(chunk) = payload.next().await {
        match chunk {
            Ok(bytes) => buffer.extend_from_slice(&bytes),
            Err(err) => {
                warn!(error = %err, "failed to read request body for logging");
                failure = Some(err);
                break;
            }
        }
    }
    let bytes = buffer.freeze();
    let logged = if failure.is_none() {
        LoggedBody::Captured(String::from_utf8_lossy(&bytes).into_owned())
    } else {
        LoggedBody::Unreadable
    };
    req.set_payload(replay(bytes, failure));
    logged
}

fn attach_trace_header<B>(res: &mut ServiceResponse<B>, trace_id: TraceId) {
    match HeaderValue::from_str(&trace_id.to_string()) {
        Ok(value) => {
            res.headers_mut()
                .insert(HeaderName::from_static(TRACE_ID_HEADER), value);
        }
        Err(err) => error!(error = %err, %trace_id, "failed to encode trace identifier header"),
    }
}

impl<S, B> Service<ServiceRequest> for RequestLogMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, mut req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let body_limit = self.body_limit;
        let trace_id = TraceId::generate();
        Box::pin(TraceId::scope(trace_id, async move {
            let started = Instant::now();
            let method = req.method().clone();
            let path = req.path().to_owned();
            let body = capture_body(&mut req, body_limit).await;
            info!(
                %trace_id,
                %method,
                %path,
                headers = %HeaderSummary(req.headers()),
                %body,
                "request received"
            );

            match service.call(req).await {
                Ok(mut res) => {
                    attach_trace_header(&mut res, trace_id);
                    info!(
                        %trace_id,
                        %method,
                        %path,
                        status = res.status().as_u16(),
                        elapsed_ms = started.elapsed().as_millis(),
                        "response sent"
                    );
                    Ok(res)
                }
                Err(err) => {
                    warn!(
                        %trace_id,
                        %method,
                        %path,
                        status = err.as_response_error().status_code().as_u16(),
                        elapsed_ms = started.elapsed().as_millis(),
                        error = %err,
                        "request failed"
                    );
                    Err(err)
                }
            }
        }))
    }
}
