//! External JSON representation of posts

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::store::Post;

/// A post as returned by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostResource {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub created_at: String,
    pub updated_at: String,
}

/// RFC 3339, microsecond precision, `Z` suffix.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

impl From<&Post> for PostResource {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            description: post.description.clone(),
            created_at: format_timestamp(&post.created_at),
            updated_at: format_timestamp(&post.updated_at),
        }
    }
}

impl From<Post> for PostResource {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            created_at: format_timestamp(&post.created_at),
            updated_at: format_timestamp(&post.updated_at),
            title: post.title,
            description: post.description,
        }
    }
}

/// `{"data": ...}` envelope used by list, create, show and update.
#[derive(Debug, Clone, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

impl DataResponse<Vec<PostResource>> {
    pub fn collection(posts: Vec<Post>) -> Self {
        Self::new(posts.into_iter().map(PostResource::from).collect())
    }
}

/// `{"messages": [...]}` body returned by destroy.
#[derive(Debug, Clone, Serialize)]
pub struct MessagesResponse {
    pub messages: Vec<String>,
}

impl MessagesResponse {
    pub fn deleted(title: &str) -> Self {
        Self {
            messages: vec![format!("{} has been deleted", title)],
        }
    }
}
