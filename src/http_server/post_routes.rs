//! Post HTTP Routes
//!
//! CRUD endpoints for the posts resource:
//!
//! | Method | Path          | Handler   |
//! |--------|---------------|-----------|
//! | GET    | `/posts`      | list      |
//! | POST   | `/posts`      | create    |
//! | GET    | `/posts/:id`  | show      |
//! | PUT    | `/posts/:id`  | update    |
//! | DELETE | `/posts/:id`  | destroy   |

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde_json::Value;

use crate::observability::{log_event, Event};
use crate::posts::{
    validate_post, ApiError, ApiResult, DataResponse, MessagesResponse, PostResource,
};
use crate::store::{Post, PostStore, StoreResult};

// ==================
// Shared State
// ==================

/// State shared across post handlers
pub struct PostsState {
    pub store: Arc<dyn PostStore>,
}

impl PostsState {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }
}

/// Create post routes
pub fn post_routes(state: Arc<PostsState>) -> Router {
    Router::new()
        .route("/posts", get(list_handler).post(create_handler))
        .route(
            "/posts/:id",
            get(show_handler).put(update_handler).delete(destroy_handler),
        )
        .with_state(state)
}

// ==================
// Helper Functions
// ==================

/// Ids that are not non-negative integers can never match a post.
fn parse_id(raw: &str) -> ApiResult<u64> {
    raw.parse::<u64>().map_err(|_| ApiError::NotFound)
}

/// Decode a JSON request body.
///
/// An empty or undecodable body reads as `{}`, so it fails field
/// validation instead of producing a separate error.
fn parse_body(body: &Bytes) -> Value {
    serde_json::from_slice(body).unwrap_or_else(|_| Value::Object(Default::default()))
}

/// Run a store call on the blocking pool.
///
/// File-backed writes fsync while holding the table lock, which must not
/// stall a runtime worker.
async fn with_store<T, F>(state: &PostsState, f: F) -> ApiResult<T>
where
    F: FnOnce(&dyn PostStore) -> StoreResult<T> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    let result = tokio::task::spawn_blocking(move || f(store.as_ref()))
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(result?)
}

async fn find_post(state: &PostsState, raw_id: &str) -> ApiResult<Post> {
    let id = parse_id(raw_id)?;
    with_store(state, move |store| store.find(id))
        .await?
        .ok_or(ApiError::NotFound)
}

// ==================
// Handlers
// ==================

async fn list_handler(
    State(state): State<Arc<PostsState>>,
) -> ApiResult<Json<DataResponse<Vec<PostResource>>>> {
    let posts = with_store(&state, |store| store.all()).await?;
    Ok(Json(DataResponse::collection(posts)))
}

async fn create_handler(
    State(state): State<Arc<PostsState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<DataResponse<PostResource>>)> {
    let fields = validate_post(&parse_body(&body))?;

    let post = with_store(&state, move |store| store.insert(fields)).await?;
    log_event(Event::PostCreated, &[("id", post.id.to_string().as_str())]);

    Ok((StatusCode::CREATED, Json(DataResponse::new(post.into()))))
}

async fn show_handler(
    State(state): State<Arc<PostsState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<DataResponse<PostResource>>> {
    let post = find_post(&state, &id).await?;
    Ok(Json(DataResponse::new(post.into())))
}

async fn update_handler(
    State(state): State<Arc<PostsState>>,
    Path(id): Path<String>,
    body: Bytes,
) -> ApiResult<Json<DataResponse<PostResource>>> {
    // existence is checked before the payload is looked at
    let existing = find_post(&state, &id).await?;

    let fields = validate_post(&parse_body(&body))?;

    let post = with_store(&state, move |store| store.update(existing.id, fields))
        .await?
        .ok_or(ApiError::NotFound)?;
    log_event(Event::PostUpdated, &[("id", post.id.to_string().as_str())]);

    Ok(Json(DataResponse::new(post.into())))
}

async fn destroy_handler(
    State(state): State<Arc<PostsState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MessagesResponse>> {
    let id = parse_id(&id)?;
    let post = with_store(&state, move |store| store.delete(id))
        .await?
        .ok_or(ApiError::NotFound)?;
    log_event(Event::PostDeleted, &[("id", post.id.to_string().as_str())]);

    Ok(Json(MessagesResponse::deleted(&post.title)))
}
