//! Posts API End-to-End Tests
//!
//! Drives the full router in-process:
//! - list returns every post in creation order
//! - create validates and returns 201
//! - show/update/destroy return 404 for unknown ids
//! - update checks existence before validating
//! - destroy reports the deleted title

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use postd::http_server::{build_router, PostsState, ServerConfig};
use postd::store::{MemoryStore, Post, PostFields, PostStore};

// =============================================================================
// Test Utilities
// =============================================================================

fn app_with_store(store: Arc<MemoryStore>) -> Router {
    build_router(&ServerConfig::default(), Arc::new(PostsState::new(store)))
}

fn app() -> Router {
    app_with_store(Arc::new(MemoryStore::new()))
}

fn seeded(posts: &[(&str, &str)]) -> (Router, Arc<MemoryStore>, Vec<Post>) {
    let store = Arc::new(MemoryStore::new());
    let created = posts
        .iter()
        .map(|(t, d)| store.insert(PostFields::new(*t, *d)).unwrap())
        .collect();
    (app_with_store(store.clone()), store, created)
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: Body) -> (StatusCode, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .header("accept", "application/json")
        .body(body)
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let body = match body {
        Some(v) => Body::from(serde_json::to_vec(&v).unwrap()),
        None => Body::empty(),
    };
    let (status, text) = send_raw(app, method, uri, body).await;
    let json = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap()
    };
    (status, json)
}

fn error_fields(body: &Value) -> Vec<String> {
    let mut fields: Vec<String> = body["errors"]
        .as_object()
        .expect("errors object")
        .keys()
        .cloned()
        .collect();
    fields.sort();
    fields
}

// =============================================================================
// List
// =============================================================================

#[tokio::test]
async fn test_list_with_seeded_data_returns_correct_count() {
    let (app, _, _) = seeded(&[("a", "1"), ("b", "2"), ("c", "3")]);

    let (status, body) = send(&app, Method::GET, "/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_list_returns_posts_in_creation_order() {
    let (app, _, _) = seeded(&[
        ("title1", "description1"),
        ("title2", "description2"),
        ("title3", "description3"),
    ]);

    let (status, body) = send(&app, Method::GET, "/posts", None).await;
    assert_eq!(status, StatusCode::OK);

    let data = body["data"].as_array().unwrap();
    for (i, post) in data.iter().enumerate() {
        assert_eq!(post["title"], format!("title{}", i + 1));
        assert_eq!(post["description"], format!("description{}", i + 1));
    }
}

#[tokio::test]
async fn test_list_empty() {
    let (status, body) = send(&app(), Method::GET, "/posts", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"data": []}));
}

// =============================================================================
// Create
// =============================================================================

#[tokio::test]
async fn test_create_with_invalid_data_returns_validation_errors() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/posts", Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&body), vec!["description", "title"]);
    assert_eq!(body["message"], "The given data was invalid.");

    let (status, body) = send(
        &app,
        Method::POST,
        "/posts",
        Some(json!({"title": null, "description": "descriptionCreateValidation"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&body), vec!["title"]);
    assert_eq!(body["errors"]["title"][0], "The title field is required.");
}

#[tokio::test]
async fn test_create_without_body_returns_validation_errors() {
    let (status, body) = send(&app(), Method::POST, "/posts", None).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&body), vec!["description", "title"]);
}

#[tokio::test]
async fn test_create_with_valid_data_returns_resource() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/posts",
        Some(json!({"title": "titleCreate", "description": "descriptionCreate"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["title"], "titleCreate");
    assert_eq!(body["data"]["description"], "descriptionCreate");
    assert_eq!(body["data"]["id"], 1);
    assert_eq!(body["data"]["created_at"], body["data"]["updated_at"]);
    assert!(body["data"]["created_at"].as_str().unwrap().ends_with('Z'));

    let (_, list) = send(&app, Method::GET, "/posts", None).await;
    assert_eq!(list["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_create_with_malformed_json_returns_validation_errors() {
    let app = app();

    let (status, text) = send_raw(&app, Method::POST, "/posts", Body::from("{\"title\": ")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(error_fields(&body), vec!["description", "title"]);

    let (_, list) = send(&app, Method::GET, "/posts", None).await;
    assert!(list["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_validation_errors_list_title_before_description() {
    let (status, text) = send_raw(&app(), Method::POST, "/posts", Body::from("{}")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let title = text.find("\"title\"").expect("title error");
    let description = text.find("\"description\"").expect("description error");
    assert!(title < description, "unexpected field order: {}", text);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_creates_get_distinct_ids() {
    let app = app();

    let mut handles = Vec::new();
    for i in 0..20 {
        let app = app.clone();
        handles.push(tokio::spawn(async move {
            let payload = json!({"title": format!("t{}", i), "description": "d"});
            send(&app, Method::POST, "/posts", Some(payload)).await
        }));
    }

    let mut ids = Vec::new();
    for handle in handles {
        let (status, body) = handle.await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        ids.push(body["data"]["id"].as_u64().unwrap());
    }
    ids.sort();
    assert_eq!(ids, (1..=20).collect::<Vec<u64>>());
}

#[tokio::test]
async fn test_update_with_malformed_json_returns_validation_errors() {
    let (app, store, posts) = seeded(&[("keep", "me")]);

    let uri = format!("/posts/{}", posts[0].id);
    let (status, text) = send_raw(&app, Method::PUT, &uri, Body::from("not json")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = serde_json::from_str(&text).unwrap();
    assert_eq!(error_fields(&body), vec!["description", "title"]);
    assert_eq!(store.find(posts[0].id).unwrap().unwrap(), posts[0]);
}

// =============================================================================
// Show
// =============================================================================

#[tokio::test]
async fn test_show_with_missing_resource_returns_not_found() {
    let (status, body) = send(&app(), Method::GET, "/posts/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 404);
}

#[tokio::test]
async fn test_show_with_non_numeric_id_returns_not_found() {
    let (status, _) = send(&app(), Method::GET, "/posts/first", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_show_returns_resource() {
    let (app, _, posts) = seeded(&[("titleShow", "descriptionShow")]);

    let uri = format!("/posts/{}", posts[0].id);
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "titleShow");
    assert_eq!(body["data"]["description"], "descriptionShow");
}

// =============================================================================
// Update
// =============================================================================

#[tokio::test]
async fn test_update_with_invalid_data_returns_validation_errors() {
    let (app, _, posts) = seeded(&[("title", "description")]);

    // missing record wins over the empty payload
    let (status, _) = send(&app, Method::PUT, "/posts/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = format!("/posts/{}", posts[0].id);
    let (status, body) = send(&app, Method::PUT, &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&body), vec!["description", "title"]);

    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"title": "titleUpdateError", "description": null})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error_fields(&body), vec!["description"]);
}

#[tokio::test]
async fn test_update_with_valid_data_returns_resource() {
    let (app, store, posts) = seeded(&[("title", "UpdateDesc")]);

    let uri = format!("/posts/{}", posts[0].id);
    let (status, body) = send(
        &app,
        Method::PUT,
        &uri,
        Some(json!({"title": "titleUpdate", "description": "descriptionUpdate"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["title"], "titleUpdate");
    assert_eq!(body["data"]["description"], "descriptionUpdate");

    let stored = store.find(posts[0].id).unwrap().unwrap();
    assert_eq!(stored.title, "titleUpdate");
    assert_eq!(stored.created_at, posts[0].created_at);
}

#[tokio::test]
async fn test_failed_update_leaves_record_untouched() {
    let (app, store, posts) = seeded(&[("keep", "me")]);

    let uri = format!("/posts/{}", posts[0].id);
    let (status, _) = send(&app, Method::PUT, &uri, Some(json!({"title": "changed"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(store.find(posts[0].id).unwrap().unwrap(), posts[0]);
}

// =============================================================================
// Destroy
// =============================================================================

#[tokio::test]
async fn test_destroy_with_missing_resource_returns_not_found() {
    let (status, _) = send(&app(), Method::DELETE, "/posts/2", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_destroy_returns_success_message() {
    let (app, _, posts) = seeded(&[("Delete Title", "whatever")]);

    let uri = format!("/posts/{}", posts[0].id);
    let (status, body) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"messages": ["Delete Title has been deleted"]}));

    let (status, _) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ids_not_reused_after_destroy() {
    let app = app();
    let payload = json!({"title": "t", "description": "d"});

    send(&app, Method::POST, "/posts", Some(payload.clone())).await;
    let (_, second) = send(&app, Method::POST, "/posts", Some(payload.clone())).await;
    assert_eq!(second["data"]["id"], 2);

    send(&app, Method::DELETE, "/posts/2", None).await;
    let (_, third) = send(&app, Method::POST, "/posts", Some(payload)).await;
    assert_eq!(third["data"]["id"], 3);
}

// =============================================================================
// Ambient
// =============================================================================

#[tokio::test]
async fn test_health() {
    let (status, body) = send(&app(), Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let request = Request::builder()
        .uri("/posts")
        .body(Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    let id = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id header")
        .to_str()
        .unwrap();
    assert!(uuid::Uuid::parse_str(id).is_ok());
}
