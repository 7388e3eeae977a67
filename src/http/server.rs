//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router (`/logs`, `/status`)
//! - Wire up request tracing
//! - Serve until the shutdown signal fires

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::assembly::LogAssembly;
use crate::config::ServerConfig;
use crate::http::{status::get_status, websocket::logs_handler};
use crate::lifecycle::Shutdown;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub assembly: LogAssembly,
    pub subscriber_queue: usize,
    pub shutdown: Shutdown,
}

/// HTTP server exposing the log stream.
pub struct HttpServer {
    router: Router,
    shutdown: Shutdown,
}

impl HttpServer {
    pub fn new(assembly: LogAssembly, config: &ServerConfig, shutdown: Shutdown) -> Self {
        let state = AppState {
            assembly,
            subscriber_queue: config.subscriber_queue,
            shutdown: shutdown.clone(),
        };
        Self {
            router: Self::build_router(state),
            shutdown,
        }
    }

    fn build_router(state: AppState) -> Router {
        Router::new()
            .route("/logs", get(logs_handler))
            .route("/status", get(get_status))
            .with_state(state)
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let shutdown = self.shutdown.clone();
        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
