//! Server execution logic.

use std::{future::Future, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    handler::{
        broadcast_drawing, broadcast_stroke_end, clear_whiteboard, get_whiteboard, health_check,
        save_stroke, websocket_handler,
    },
    signal::shutdown_signal,
    state::AppState,
};

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        // WebSocket エンドポイント
        .route("/ws", get(websocket_handler))
        // HTTP エンドポイント
        .route("/api/health", get(health_check))
        .route("/api/stroke", post(save_stroke))
        .route("/api/whiteboard/{pass}", get(get_whiteboard))
        .route("/api/clear-whiteboard", post(clear_whiteboard))
        // レガシー（永続化しない中継）
        .route("/api/drawing", post(broadcast_drawing))
        .route("/api/stroke-end", post(broadcast_stroke_end))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Whiteboard server
///
/// # Example
///
/// ```ignore
/// let server = Server::new(AppState::new(store, publisher, clock, chunk_size));
/// server.run("127.0.0.1", 8080).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Bind to `host:port` and serve until Ctrl+C / SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: &str, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Whiteboard server listening on {}", listener.local_addr()?);
        tracing::info!("Subscribe with: ws://{}/ws?pass=<pass>", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Serve on an already bound listener until `shutdown` completes.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F) -> std::io::Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(listener, router(self.state))
            .with_graceful_shutdown(shutdown)
            .await
    }
}
