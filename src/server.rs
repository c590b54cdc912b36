use std::net::SocketAddr;

use axum::ServiceExt;
use axum::extract::Request;
use tokio::net::TcpListener;
use tracing::{info, warn};

use crate::api::{self, AppState};
use crate::store::MemberStore;

/// HTTP server
pub struct Server {
    listener: TcpListener,
    local_addr: SocketAddr,
    state: AppState,
}

impl Server {
    /// Bind the HTTP server to the given address, serving `store`
    pub async fn bind(addr: &str, store: MemberStore) -> std::io::Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        info!("HTTP server bound to {}", local_addr);

        Ok(Self {
            listener,
            local_addr,
            state: AppState::new(store),
        })
    }

    /// Get local listening address
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Serve requests until ctrl-c is received
    pub async fn run(self) -> std::io::Result<()> {
        info!(
            "Server started, serving the {} family on {}",
            self.state.family_name(),
            self.local_addr
        );

        let app = api::app(self.state);
        axum::serve(
            self.listener,
            ServiceExt::<Request>::into_make_service(app),
        )
        .with_graceful_shutdown(shutdown_signal())
        .await?;

        info!("Server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received ctrl-c, shutting down"),
        Err(e) => warn!("Failed to listen for ctrl-c: {}", e),
    }
}
