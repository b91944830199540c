//! Tests for the post service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ErrorCode;
use crate::domain::ports::MockPostRepository;

fn make_service(repo: MockPostRepository) -> PostService<MockPostRepository> {
    PostService::new(Arc::new(repo))
}

fn stored() -> Post {
    Post {
        id: PostId::new("post-1").expect("valid id"),
        title: "Stored title".to_owned(),
        content: "stored body".to_owned(),
        author: "ada".to_owned(),
    }
}

fn fields(title: &str, content: &str, author: &str) -> PostFields {
    PostDraft::new(title, content, author)
        .validate()
        .expect("valid fields")
}

#[tokio::test]
async fn list_delegates_page_and_limit() {
    let mut repo = MockPostRepository::new();
    repo.expect_list()
        .with(eq(2), eq(5))
        .times(1)
        .return_once(|_, _| Ok(Vec::new()));

    let posts = make_service(repo).list_posts(2, 5).await.expect("empty page");
    assert!(posts.is_empty());
}

#[tokio::test]
async fn list_reports_invalid_arguments_as_bad_requests() {
    let mut repo = MockPostRepository::new();
    repo.expect_list()
        .times(1)
        .return_once(|_, _| Err(PostRepositoryError::invalid_argument("page must be at least 1")));

    let error = make_service(repo).list_posts(0, 10).await.expect_err("invalid page");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn fetch_absent_post_is_not_found() {
    let mut repo = MockPostRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|id| Err(PostRepositoryError::not_found(id.to_string())));

    let id = PostId::new("missing").expect("valid id");
    let error = make_service(repo).fetch_post(&id).await.expect_err("absent");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Post with ID missing not found");
}

#[tokio::test]
async fn fetch_during_store_outage_is_unavailable() {
    let mut repo = MockPostRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|_| {
            Err(PostRepositoryError::storage(
                "dispatch failure: http://10.1.2.3:8000 connection refused",
            ))
        });

    let id = PostId::new("post-1").expect("valid id");
    let error = make_service(repo).fetch_post(&id).await.expect_err("outage");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    assert_eq!(
        error.message(),
        "Post storage is temporarily unavailable. Please retry."
    );
    assert!(!error.message().contains("10.1.2.3"));
    let details = error.details().expect("cause kept for logs");
    assert_eq!(
        details["cause"],
        "dispatch failure: http://10.1.2.3:8000 connection refused"
    );
}

#[tokio::test]
async fn create_rejects_short_title_without_writing() {
    let mut repo = MockPostRepository::new();
    repo.expect_create().times(0);

    let error = make_service(repo)
        .create_post(PostDraft::new("Hi", "x", "y"))
        .await
        .expect_err("title too short");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert_eq!(error.message(), "Field 'title' failed validation: min=3");
    let details = error.details().expect("violations attached");
    assert_eq!(details["violations"][0]["field"], "title");
    assert_eq!(details["violations"][0]["rule"], "min=3");
}

#[tokio::test]
async fn create_returns_stored_post() {
    let mut repo = MockPostRepository::new();
    repo.expect_create()
        .withf(|written| written.title() == "Valid")
        .times(1)
        .return_once(|fields| Ok(Post::new(PostId::generate(), fields)));

    let post = make_service(repo)
        .create_post(PostDraft::new("Valid", "c", "a"))
        .await
        .expect("created");
    assert_eq!(post.to_draft(), PostDraft::new("Valid", "c", "a"));
    assert!(!post.id.as_str().is_empty());
}

#[tokio::test]
async fn replace_checks_existence_before_writing() {
    let stored = stored();
    let mut repo = MockPostRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|id| Err(PostRepositoryError::not_found(id.to_string())));
    repo.expect_update().times(0);

    let error = make_service(repo)
        .replace_post(&stored.id, PostDraft::new("Valid", "c", "a"))
        .await
        .expect_err("absent");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn replace_validates_before_reading() {
    let stored = stored();
    let mut repo = MockPostRepository::new();
    repo.expect_find_by_id().times(0);
    repo.expect_update().times(0);

    let error = make_service(repo)
        .replace_post(&stored.id, PostDraft::new("Valid", "", "a"))
        .await
        .expect_err("content required");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn replace_writes_new_fields() {
    let stored = stored();
    let mut repo = MockPostRepository::new();
    let existing = stored.clone();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(existing));
    repo.expect_update()
        .withf(|_, written| *written == fields("Updated", "new", "bob"))
        .times(1)
        .return_once(|id, fields| Ok(Post::new(id.clone(), fields)));

    let post = make_service(repo)
        .replace_post(&stored.id, PostDraft::new("Updated", "new", "bob"))
        .await
        .expect("updated");
    assert_eq!(post.id, stored.id);
    assert_eq!(post.title, "Updated");
}

#[tokio::test]
async fn replace_race_with_delete_is_not_found() {
    let stored = stored();
    let mut repo = MockPostRepository::new();
    let existing = stored.clone();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(existing));
    repo.expect_update()
        .times(1)
        .return_once(|id, _| Err(PostRepositoryError::conflict(id.to_string())));

    let error = make_service(repo)
        .replace_post(&stored.id, PostDraft::new("Updated", "new", "bob"))
        .await
        .expect_err("raced");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn patch_merges_present_fields() {
    let stored = stored();
    let mut repo = MockPostRepository::new();
    let existing = stored.clone();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(existing));
    repo.expect_update()
        .withf(|_, written| *written == fields("Stored title", "patched", "ada"))
        .times(1)
        .return_once(|id, fields| Ok(Post::new(id.clone(), fields)));

    let patch = PostPatch {
        content: Some("patched".to_owned()),
        ..PostPatch::default()
    };
    let post = make_service(repo)
        .patch_post(&stored.id, patch)
        .await
        .expect("patched");
    assert_eq!(post.content, "patched");
    assert_eq!(post.author, "ada");
}

#[tokio::test]
async fn patch_rejects_empty_title() {
    let stored = stored();
    let mut repo = MockPostRepository::new();
    let existing = stored.clone();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(existing));
    repo.expect_update().times(0);

    let patch = PostPatch {
        title: Some(String::new()),
        ..PostPatch::default()
    };
    let error = make_service(repo)
        .patch_post(&stored.id, patch)
        .await
        .expect_err("empty title");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn delete_absent_post_skips_removal() {
    let stored = stored();
    let mut repo = MockPostRepository::new();
    repo.expect_find_by_id()
        .times(1)
        .return_once(|id| Err(PostRepositoryError::not_found(id.to_string())));
    repo.expect_delete().times(0);

    let error = make_service(repo)
        .delete_post(&stored.id)
        .await
        .expect_err("absent");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(DeleteOutcome::Absent, Some(ErrorCode::NotFound))]
#[case(DeleteOutcome::Removed(stored()), None)]
#[tokio::test]
async fn delete_maps_outcome(
    #[case] outcome: DeleteOutcome,
    #[case] expected: Option<ErrorCode>,
) {
    let stored = stored();
    let mut repo = MockPostRepository::new();
    let existing = stored.clone();
    repo.expect_find_by_id()
        .times(1)
        .return_once(move |_| Ok(existing));
    repo.expect_delete().times(1).return_once(move |_| Ok(outcome));

    let result = make_service(repo).delete_post(&stored.id).await;
    assert_eq!(result.err().map(|error| error.code()), expected);
}
