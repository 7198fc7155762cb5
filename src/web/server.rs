//! JSON API server.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::JsonApiConfig;
use crate::{MailingList, Result};

use super::handlers::AppState;
use super::router::create_router;

/// HTTP server for the JSON API.
pub struct JsonServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
}

impl JsonServer {
    /// Create a new JSON API server.
    ///
    /// Fails when the configured bind address does not parse.
    pub fn new(config: &JsonApiConfig, registry: MailingList) -> Result<Self> {
        let addr = config.socket_addr()?;

        Ok(Self {
            addr,
            app_state: Arc::new(AppState::new(registry)),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the server until the listener fails.
    pub async fn run(self) -> Result<()> {
        let router = create_router(self.app_state);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("JSON API server listening on http://{}", local_addr);

        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = create_router(self.app_state);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        tracing::info!("JSON API server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("JSON API server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
