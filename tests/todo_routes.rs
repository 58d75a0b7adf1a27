use std::{sync::Arc, time::Duration};

use axum::{
    body::{self, Body},
    http::{Request, StatusCode, header},
};
use chrono::DateTime;
use tower::ServiceExt;

use todo_server::{routes::router, state::AppState, test_helpers::test_state};

async fn send(state: &Arc<AppState>, request: Request<Body>) -> axum::response::Response {
    router(state.clone()).oneshot(request).await.unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

async fn post_form(
    state: &Arc<AppState>,
    uri: &str,
    form_body: &str,
) -> axum::response::Response {
    send(
        state,
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(form_body.to_string()))
            .unwrap(),
    )
    .await
}

async fn get(state: &Arc<AppState>, uri: &str) -> axum::response::Response {
    send(state, Request::builder().uri(uri).body(Body::empty()).unwrap()).await
}

async fn get_json(state: &Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = get(state, uri).await;
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

#[tokio::test]
async fn create_then_show_all() {
    let state = test_state().await;

    let response = post_form(&state, "/new", "title=Buy+milk&text=2%25").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(location.starts_with("/?notice="));

    let response = get(&state, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Buy milk"));
    assert!(page.contains("2%"));
}

#[tokio::test]
async fn new_form_renders_empty() {
    let state = test_state().await;

    let response = get(&state, "/new").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("name=\"title\""));
    assert!(page.contains("name=\"text\""));
    assert!(!page.contains("class=\"error\""));
}

#[tokio::test]
async fn empty_title_is_rejected() {
    let state = test_state().await;

    let response = post_form(&state, "/new", "title=&text=orphan+text").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Title is required"));
    // Submitted text survives the re-render
    assert!(page.contains("orphan text"));

    // Nothing was persisted
    let page = body_text(get(&state, "/").await).await;
    assert!(!page.contains("orphan text"));
}

#[tokio::test]
async fn empty_text_is_rejected_after_title() {
    let state = test_state().await;

    let response = post_form(&state, "/new", "title=Half+filled&text=").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = body_text(response).await;
    assert!(page.contains("Text is required"));
    assert!(!page.contains("Title is required"));

    let page = body_text(get(&state, "/").await).await;
    assert!(!page.contains("Half filled"));
}

#[tokio::test]
async fn title_is_checked_before_text() {
    let state = test_state().await;

    let response = post_form(&state, "/new", "title=&text=").await;
    let page = body_text(response).await;
    assert!(page.contains("Title is required"));
    assert!(!page.contains("Text is required"));
}

#[tokio::test]
async fn update_replaces_done_flags() {
    let state = test_state().await;

    post_form(&state, "/new", "title=First&text=one").await;
    post_form(&state, "/new", "title=Second&text=two").await;

    let (status, first) = get_json(&state, "/todos/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["title"].as_str(), Some("First"));
    assert_eq!(first["done"].as_bool(), Some(false));

    tokio::time::sleep(Duration::from_millis(10)).await;

    // Only item 1 checked
    let response = post_form(&state, "/update", "done.1=on").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (_, first) = get_json(&state, "/todos/1").await;
    let (_, second) = get_json(&state, "/todos/2").await;
    assert_eq!(first["done"].as_bool(), Some(true));
    assert_eq!(second["done"].as_bool(), Some(false));

    let pub_date = DateTime::parse_from_rfc3339(first["pub_date"].as_str().unwrap()).unwrap();
    let update_date =
        DateTime::parse_from_rfc3339(first["update_date"].as_str().unwrap()).unwrap();
    assert!(update_date > pub_date);

    // Unchecked ids are reset, including previously-done ones
    let response = post_form(&state, "/update", "done.2=on").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (_, first) = get_json(&state, "/todos/1").await;
    let (_, second) = get_json(&state, "/todos/2").await;
    assert_eq!(first["done"].as_bool(), Some(false));
    assert_eq!(second["done"].as_bool(), Some(true));
}

#[tokio::test]
async fn empty_update_marks_everything_undone() {
    let state = test_state().await;

    post_form(&state, "/new", "title=Only&text=item").await;
    post_form(&state, "/update", "done.1=on").await;

    let (_, item) = get_json(&state, "/todos/1").await;
    assert_eq!(item["done"].as_bool(), Some(true));

    let response = post_form(&state, "/update", "").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let (_, item) = get_json(&state, "/todos/1").await;
    assert_eq!(item["done"].as_bool(), Some(false));
}

#[tokio::test]
async fn get_todo_returns_all_fields() {
    let state = test_state().await;

    post_form(&state, "/new", "title=Inspect&text=me").await;

    let (status, item) = get_json(&state, "/todos/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["id"].as_i64(), Some(1));
    assert_eq!(item["title"].as_str(), Some("Inspect"));
    assert_eq!(item["text"].as_str(), Some("me"));
    assert_eq!(item["done"].as_bool(), Some(false));
    assert!(item["pub_date"].is_string());
    assert!(item["update_date"].is_string());
}

#[tokio::test]
async fn get_missing_todo_is_not_found() {
    let state = test_state().await;

    let (status, body) = get_json(&state, "/todos/999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn show_all_orders_newest_first() {
    let state = test_state().await;

    post_form(&state, "/new", "title=Older+entry&text=a").await;
    tokio::time::sleep(Duration::from_millis(10)).await;
    post_form(&state, "/new", "title=Newer+entry&text=b").await;

    let page = body_text(get(&state, "/").await).await;
    let newer = page.find("Newer entry").unwrap();
    let older = page.find("Older entry").unwrap();
    assert!(newer < older);

    // Read-only and idempotent
    let again = body_text(get(&state, "/").await).await;
    assert_eq!(page, again);
}

#[tokio::test]
async fn notice_banner_renders_after_redirect() {
    let state = test_state().await;

    post_form(&state, "/new", "title=Flash&text=me").await;
    let page = body_text(get(&state, "/?notice=Todo+item+was+successfully+created").await).await;
    assert!(page.contains("Todo item was successfully created"));
}

#[tokio::test]
async fn create_all_is_idempotent() {
    let state = test_state().await;

    let response = get(&state, "/create_all").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "create all");

    // Second run against an existing schema still answers the same
    let response = get(&state, "/create_all").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "create all");
}
