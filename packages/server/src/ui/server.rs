//! Server execution logic.

use std::{future::Future, sync::Arc, time::Duration};

use axum::Router;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use super::{
    handler::relay_handler,
    signal::shutdown_signal,
    state::AppState,
};

const MIN_SWEEP_INTERVAL: Duration = Duration::from_millis(250);

/// Build the axum application. Every path and method lands on the relay
/// handler: WebSocket upgrades open a connection, anything else gets the
/// plaintext liveness line.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .fallback(relay_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Family check-in relay server
///
/// # Example
///
/// ```ignore
/// let state = Arc::new(AppState::new(repository, message_pusher, clock));
/// Server::new(state)
///     .with_typing_timeout(Some(Duration::from_secs(10)))
///     .run("0.0.0.0".to_string(), 3000)
///     .await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
    /// 入力中状態の有効期限（`None` で期限切れ処理なし）
    typing_timeout: Option<Duration>,
}

impl Server {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            typing_timeout: None,
        }
    }

    /// Expire typing entries older than `timeout`. Expiry is off unless this
    /// is called with a non-zero duration.
    pub fn with_typing_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.typing_timeout = timeout.filter(|t| !t.is_zero());
        self
    }

    /// Bind to `host:port` and serve until Ctrl+C / SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(
        self,
        host: String,
        port: u16,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Relay server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve_with_shutdown(listener, shutdown_signal()).await
    }

    /// Serve on an already bound listener until `shutdown` resolves
    pub async fn serve_with_shutdown<F>(
        self,
        listener: TcpListener,
        shutdown: F,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let sweeper = self.typing_timeout.map(|timeout| {
            tracing::info!("Typing entries expire after {:?}", timeout);
            spawn_typing_sweeper(self.state.clone(), timeout)
        });

        let app = build_router(self.state);
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await;

        if let Some(sweeper) = sweeper {
            sweeper.abort();
        }
        result?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

fn spawn_typing_sweeper(state: Arc<AppState>, timeout: Duration) -> tokio::task::JoinHandle<()> {
    let period = (timeout / 2).max(MIN_SWEEP_INTERVAL);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match state.typing_usecase.expire_stale(timeout).await {
                Ok(Some(typing_users)) => {
                    tracing::debug!("Expired stale typing entries; {} remain", typing_users.len());
                }
                Ok(None) => {}
                Err(e) => tracing::warn!("Failed to broadcast typing expiry: {}", e),
            }
        }
    })
}
