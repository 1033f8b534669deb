//! # HTTP Server
//!
//! Combines the post and health routers, CORS and request logging into a
//! single Axum server.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{middleware, Router};
use tokio::net::TcpListener;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use super::config::ServerConfig;
use super::health_routes::health_routes;
use super::post_routes::{post_routes, PostsState};
use super::request_log::log_requests;
use crate::observability::{log_event, Event};
use crate::store::PostStore;

/// HTTP server for the posts API
pub struct HttpServer {
    config: ServerConfig,
    router: Router,
}

impl HttpServer {
    /// Server over the given store
    pub fn with_store(config: ServerConfig, store: Arc<dyn PostStore>) -> Self {
        let router = build_router(&config, Arc::new(PostsState::new(store)));
        Self { config, router }
    }

    pub fn socket_addr(&self) -> String {
        self.config.socket_addr()
    }

    /// Get the router (for testing)
    pub fn router(self) -> Router {
        self.router
    }

    /// Bind and serve until Ctrl+C or SIGTERM.
    pub async fn start(self) -> io::Result<()> {
        let addr: SocketAddr = self
            .config
            .socket_addr()
            .parse()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

        let listener = TcpListener::bind(addr).await?;
        let bound = listener.local_addr()?.to_string();
        log_event(Event::Serving, &[("addr", bound.as_str())]);

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        log_event(Event::ShutdownComplete, &[]);
        Ok(())
    }
}

/// Build the combined router with all endpoints
pub fn build_router(config: &ServerConfig, state: Arc<PostsState>) -> Router {
    Router::new()
        .merge(health_routes())
        .merge(post_routes(state))
        .layer(middleware::from_fn(log_requests))
        .layer(cors_layer(&config.cors_origins))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    // entries were checked by ServerConfig::validate
    let origins: Vec<_> = origins.iter().filter_map(|s| s.parse().ok()).collect();
    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if tokio::signal::ctrl_c().await.is_err() {
            // no handler installed: rely on SIGTERM or process kill
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => log_event(Event::ShutdownStart, &[("signal", "SIGINT")]),
        () = terminate => log_event(Event::ShutdownStart, &[("signal", "SIGTERM")]),
    }
}
