//! # Posts
//!
//! Validation, serialization and error mapping for the posts resource.
//! The HTTP handlers live in [`crate::http_server::post_routes`].

pub mod errors;
pub mod resource;
pub mod validator;

pub use errors::{ApiError, ApiResult, ErrorResponse, ValidationErrorResponse};
pub use resource::{format_timestamp, DataResponse, MessagesResponse, PostResource};
pub use validator::{validate_post, ValidationErrors, POST_FIELDS};
