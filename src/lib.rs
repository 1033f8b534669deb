//! postd - a small, self-hostable posts service
//!
//! A JSON HTTP API with list, create, show, update and delete over a single
//! `posts` table.

pub mod cli;
pub mod http_server;
pub mod observability;
pub mod posts;
pub mod store;
