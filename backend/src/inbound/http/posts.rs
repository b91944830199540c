//! Posts HTTP handlers.
//!
//! ```text
//! GET    /posts?page=&limit=
//! GET    /posts/{id}
//! POST   /posts
//! PUT    /posts/{id}
//! PATCH  /posts/{id}
//! DELETE /posts/{id}
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Post, PostDraft, PostPatch};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{ListQuery, parse_post_id};

/// Full post payload for create and replace. Missing fields count as empty.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(default)]
pub struct PostRequest {
    #[schema(example = "Hello, world")]
    pub title: String,
    pub content: String,
    pub author: String,
}

impl From<PostRequest> for PostDraft {
    fn from(value: PostRequest) -> Self {
        Self::new(value.title, value.content, value.author)
    }
}

/// Partial post payload. Only the fields present are changed.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct PostPatchRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub author: Option<String>,
}

impl From<PostPatchRequest> for PostPatch {
    fn from(value: PostPatchRequest) -> Self {
        Self {
            title: value.title,
            content: value.content,
            author: value.author,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub author: String,
}

impl From<Post> for PostResponse {
    fn from(value: Post) -> Self {
        Self {
            id: value.id.into(),
            title: value.title,
            content: value.content,
            author: value.author,
        }
    }
}

/// List posts one page at a time in store order.
#[utoipa::path(
    get,
    path = "/posts",
    params(ListQuery),
    responses(
        (status = 200, description = "Posts on the page, possibly none", body = [PostResponse]),
        (status = 503, description = "Post storage unavailable", body = ErrorBody)
    ),
    tags = ["posts"],
    operation_id = "listPosts"
)]
#[get("/posts")]
pub async fn list_posts(
    state: web::Data<HttpState>,
    req: HttpRequest,
) -> ApiResult<web::Json<Vec<PostResponse>>> {
    let query = ListQuery::from_query_string(req.query_string());
    let posts = state
        .posts_query
        .list_posts(query.page(), query.limit())
        .await?;
    Ok(web::Json(posts.into_iter().map(PostResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 200, description = "The post", body = PostResponse),
        (status = 404, description = "No such post", body = ErrorBody),
        (status = 503, description = "Post storage unavailable", body = ErrorBody)
    ),
    tags = ["posts"],
    operation_id = "getPost"
)]
#[get("/posts/{id}")]
pub async fn get_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<PostResponse>> {
    let id = parse_post_id(path.into_inner())?;
    let post = state.posts_query.fetch_post(&id).await?;
    Ok(web::Json(post.into()))
}

#[utoipa::path(
    post,
    path = "/posts",
    request_body = PostRequest,
    responses(
        (status = 201, description = "Created post with its generated id", body = PostResponse),
        (status = 400, description = "Invalid post", body = ErrorBody),
        (status = 415, description = "Body is not JSON", body = ErrorBody)
    ),
    tags = ["posts"],
    operation_id = "createPost"
)]
#[post("/posts")]
pub async fn create_post(
    state: web::Data<HttpState>,
    payload: web::Json<PostRequest>,
) -> ApiResult<HttpResponse> {
    let post = state.posts.create_post(payload.into_inner().into()).await?;
    Ok(HttpResponse::Created().json(PostResponse::from(post)))
}

/// Replace every field of a post.
#[utoipa::path(
    put,
    path = "/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    request_body = PostRequest,
    responses(
        (status = 200, description = "Post as stored", body = PostResponse),
        (status = 400, description = "Invalid post", body = ErrorBody),
        (status = 404, description = "No such post", body = ErrorBody),
        (status = 415, description = "Body is not JSON", body = ErrorBody)
    ),
    tags = ["posts"],
    operation_id = "replacePost"
)]
#[put("/posts/{id}")]
pub async fn replace_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<PostRequest>,
) -> ApiResult<web::Json<PostResponse>> {
    let id = parse_post_id(path.into_inner())?;
    let post = state
        .posts
        .replace_post(&id, payload.into_inner().into())
        .await?;
    Ok(web::Json(post.into()))
}

/// Change some fields of a post. The merged post is re-validated.
#[utoipa::path(
    patch,
    path = "/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    request_body = PostPatchRequest,
    responses(
        (status = 200, description = "Post as stored", body = PostResponse),
        (status = 400, description = "Merged post is invalid", body = ErrorBody),
        (status = 404, description = "No such post", body = ErrorBody)
    ),
    tags = ["posts"],
    operation_id = "patchPost"
)]
#[patch("/posts/{id}")]
pub async fn patch_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<PostPatchRequest>,
) -> ApiResult<web::Json<PostResponse>> {
    let id = parse_post_id(path.into_inner())?;
    let post = state
        .posts
        .patch_post(&id, payload.into_inner().into())
        .await?;
    Ok(web::Json(post.into()))
}

#[utoipa::path(
    delete,
    path = "/posts/{id}",
    params(("id" = String, Path, description = "Post identifier")),
    responses(
        (status = 204, description = "Post deleted"),
        (status = 404, description = "No such post", body = ErrorBody)
    ),
    tags = ["posts"],
    operation_id = "deletePost"
)]
#[delete("/posts/{id}")]
pub async fn delete_post(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let id = parse_post_id(path.into_inner())?;
    state.posts.delete_post(&id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
#[path = "posts_tests.rs"]
mod tests;
