//! Content-type guard for body-carrying verbs.
//!
//! `POST` and `PUT` must declare a JSON body. Anything else is answered 415
//! before the handler runs. Other verbs are not inspected. `PATCH` bodies are
//! checked by the JSON extractor instead.

use std::task::{Context, Poll};

use actix_web::Error;
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::Method;
use actix_web::http::header::{CONTENT_TYPE, HeaderMap};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::debug;

use crate::domain;

fn requires_json(method: &Method) -> bool {
    method == Method::POST || method == Method::PUT
}

fn declares_json(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains("application/json"))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ContentTypeGuard;

impl<S, B> Transform<S, ServiceRequest> for ContentTypeGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = ContentTypeGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(ContentTypeGuardMiddleware { service }))
    }
}

pub struct ContentTypeGuardMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for ContentTypeGuardMiddleware<S>
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
        if requires_json(req.method()) && !declares_json(req.headers()) {
            debug!(method = %req.method(), path = %req.path(), "rejected non-JSON body");
            let res = req.error_response(domain::Error::unsupported_media_type(
                "Content-Type must be application/json",
            ));
            return Box::pin(ready(Ok(res.map_into_right_body())));
        }
        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test, web};
    use rstest::rstest;

    #[rstest]
    #[case(Method::POST, Some("application/json"), StatusCode::OK)]
    #[case(Method::PUT, Some("application/json; charset=utf-8"), StatusCode::OK)]
    #[case(Method::POST, Some("Application/JSON"), StatusCode::OK)]
    #[case(Method::POST, Some("text/plain"), StatusCode::UNSUPPORTED_MEDIA_TYPE)]
    #[case(Method::PUT, None, StatusCode::UNSUPPORTED_MEDIA_TYPE)]
    #[case(Method::GET, None, StatusCode::OK)]
    #[case(Method::DELETE, Some("text/plain"), StatusCode::OK)]
    #[actix_web::test]
    async fn guards_mutating_verbs(
        #[case] method: Method,
        #[case] content_type: Option<&'static str>,
        #[case] expected: StatusCode,
    ) {
        let app = actix_test::init_service(
            App::new()
                .wrap(ContentTypeGuard)
                .default_service(web::to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let mut req = actix_test::TestRequest::default().method(method).uri("/posts");
        if let Some(content_type) = content_type {
            req = req.insert_header((CONTENT_TYPE, content_type));
        }
        let res = actix_test::call_service(&app, req.to_request()).await;
        assert_eq!(res.status(), expected);
    }

    #[actix_web::test]
    async fn rejection_carries_error_body() {
        let app = actix_test::init_service(
            App::new()
                .wrap(ContentTypeGuard)
                .default_service(web::to(|| async { HttpResponse::Ok().finish() })),
        )
        .await;
        let req = actix_test::TestRequest::post()
            .uri("/posts")
            .insert_header((CONTENT_TYPE, "text/xml"))
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["error"], "Unsupported Media Type");
        assert_eq!(body["description"], "Content-Type must be application/json");
    }
}
