//! Last-resort recovery from handler panics.
//!
//! A panic raised while building or polling the inner service future is
//! caught, logged with the request line and headers, and turned into a
//! generic 500 error. The panic message is never sent to the client.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::FutureExt;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::error;

use crate::domain;

/// Request details captured before the inner service takes ownership.
#[derive(Debug)]
struct RequestContext {
    method: String,
    path: String,
    headers: String,
}

impl RequestContext {
    fn capture(req: &ServiceRequest) -> Self {
        let headers = req
            .headers()
            .keys()
            .map(|name| name.as_str())
            .collect::<Vec<_>>()
            .join(",");
        Self {
            method: req.method().to_string(),
            path: req.uri().to_string(),
            headers,
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.as_str()
    } else {
        "non-string panic payload"
    }
}

fn recovered(context: &RequestContext, payload: &(dyn Any + Send)) -> Error {
    error!(
        method = %context.method,
        path = %context.path,
        headers = %context.headers,
        panic = panic_message(payload),
        "recovered from panic while handling request"
    );
    domain::Error::internal("request handler panicked").into()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PanicRecovery;

impl<S, B> Transform<S, ServiceRequest> for PanicRecovery
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = PanicRecoveryMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(PanicRecoveryMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct PanicRecoveryMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for PanicRecoveryMiddleware<S>
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

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let context = RequestContext::capture(&req);
        let service = Rc::clone(&self.service);
        let fut = match panic::catch_unwind(AssertUnwindSafe(move || service.call(req))) {
            Ok(fut) => fut,
            Err(payload) => {
                return Box::pin(ready(Err(recovered(&context, payload.as_ref()))));
            }
        };
        Box::pin(async move {
            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(result) => result,
                Err(payload) => Err(recovered(&context, payload.as_ref())),
            }
        })
    }
}
