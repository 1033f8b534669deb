//! # postd HTTP Server Module
//!
//! Axum server exposing the posts API.
//!
//! # Endpoints
//!
//! - `/health` - Health check
//! - `/posts` - List and create posts
//! - `/posts/:id` - Show, update and delete a post

pub mod config;
pub mod health_routes;
pub mod post_routes;
pub mod request_log;
pub mod server;

pub use config::{ConfigError, ServerConfig, StoreKind};
pub use post_routes::PostsState;
pub use server::{build_router, HttpServer};
