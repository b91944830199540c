//! Application assembly: routes, shared state, and the middleware pipeline.

use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpRequest, HttpResponse, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::domain::Error;
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::posts::{
    create_post, delete_post, get_post, list_posts, patch_post, replace_post,
};
use crate::inbound::http::state::HttpState;
use crate::middleware::{ContentTypeGuard, Cors, PanicRecovery, RequestLog};

/// Everything one worker's `App` needs. Cloned once per worker.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub cors: Cors,
    pub log_body_limit: usize,
}

/// Fallback for requests no route accepts, so they get the JSON error body.
async fn route_not_found(req: HttpRequest) -> ApiResult<HttpResponse> {
    Err(Error::not_found(format!(
        "No route for {} {}",
        req.method(),
        req.path()
    )))
}

/// Build the application.
///
/// `wrap` registers middleware inside out, so the calls below list the
/// stages innermost first: panic recovery, content type, CORS, then the
/// request log on the outside.
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        cors,
        log_body_limit,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .service(list_posts)
        .service(get_post)
        .service(create_post)
        .service(replace_post)
        .service(patch_post)
        .service(delete_post)
        .service(ready)
        .service(live)
        .default_service(web::to(route_not_found));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.wrap(PanicRecovery)
        .wrap(ContentTypeGuard)
        .wrap(cors)
        .wrap(RequestLog::new(log_body_limit))
}
