//! Cross-origin request negotiation.
//!
//! Requests without an `Origin` header pass straight through. A request from
//! an origin outside the allow-list is answered 403 without reaching the
//! handler. Preflight `OPTIONS` requests from allowed origins are answered
//! 200 here. Every other allowed request is forwarded and its response gets
//! the `Access-Control-Allow-*` headers, including error responses raised by
//! inner stages.

use std::rc::Rc;
use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::body::EitherBody;
use actix_web::error::InternalError;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    HeaderMap, HeaderValue, ORIGIN,
};
use actix_web::HttpResponse;
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;
use url::Url;

use crate::domain;

const ALLOWED_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type, Authorization";

/// Serialise an origin the way browsers send it: `scheme://host[:port]`,
/// lowercase host, default port dropped.
fn normalise_origin(raw: &str) -> Option<String> {
    let url = Url::parse(raw.trim()).ok()?;
    let origin = url.origin();
    origin.is_tuple().then(|| origin.ascii_serialization())
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum AllowedOrigins {
    Any,
    List(Vec<String>),
}

/// CORS stage configured with an origin allow-list.
///
/// An entry of `*` allows every origin. Other entries are compared after
/// normalisation, so `https://Example.com:443` matches
/// `https://example.com`.
///
/// # Examples
/// ```
/// use blog_backend::middleware::Cors;
///
/// let cors = Cors::new(["https://blog.example"]);
/// assert!(cors.allows("https://blog.example"));
/// assert!(!cors.allows("http://evil.test"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cors {
    origins: AllowedOrigins,
}

impl Cors {
    pub fn new<I, S>(origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Vec::new();
        for origin in origins {
            let origin = origin.as_ref().trim();
            if origin == "*" {
                return Self::allow_any();
            }
            if origin.is_empty() {
                continue;
            }
            list.push(normalise_origin(origin).unwrap_or_else(|| origin.to_owned()));
        }
        Self {
            origins: AllowedOrigins::List(list),
        }
    }

    pub fn allow_any() -> Self {
        Self {
            origins: AllowedOrigins::Any,
        }
    }

    pub fn allows(&self, origin: &str) -> bool {
        match &self.origins {
            AllowedOrigins::Any => true,
            AllowedOrigins::List(list) => {
                let candidate = normalise_origin(origin).unwrap_or_else(|| origin.trim().to_owned());
                list.iter().any(|allowed| *allowed == candidate)
            }
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for Cors
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = CorsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsMiddleware {
            service,
            policy: Rc::new(self.clone()),
        }))
    }
}

pub struct CorsMiddleware<S> {
    service: S,
    policy: Rc<Cors>,
}

fn apply_cors_headers(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}

impl<S, B> Service<ServiceRequest> for CorsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let Some(origin) = req.headers().get(ORIGIN).cloned() else {
            let fut = self.service.call(req);
            return Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) });
        };

        let allowed = origin
            .to_str()
            .is_ok_and(|value| self.policy.allows(value));
        if !allowed {
            warn!(origin = ?origin, path = %req.path(), "rejected request from disallowed origin");
            let res = req.error_response(domain::Error::forbidden("Origin not allowed"));
            return Box::pin(ready(Ok(res.map_into_right_body())));
        }

        if req.method() == Method::OPTIONS {
            let mut preflight = HttpResponse::Ok().finish();
            apply_cors_headers(preflight.headers_mut(), origin);
            let res = req.into_response(preflight);
            return Box::pin(ready(Ok(res.map_into_right_body())));
        }

        let fut = self.service.call(req);
        Box::pin(async move {
            match fut.await {
                Ok(mut res) => {
                    apply_cors_headers(res.headers_mut(), origin);
                    Ok(res.map_into_left_body())
                }
                Err(err) => {
                    let mut response = err.error_response();
                    apply_cors_headers(response.headers_mut(), origin);
                    Err(InternalError::from_response(err, response).into())
                }
            }
        })
    }
}
