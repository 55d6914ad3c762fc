//! Server lifecycle: bind, serve, drain on shutdown.

use std::future::Future;
use std::net::SocketAddr;

use anyhow::{Context, Result};
use axum::Router;
use tally_config::ServerConfig;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info};

/// A bound HTTP server. Owned by the entry point; consumed by serving.
pub struct Server {
    listener: TcpListener,
    router: Router,
    addr: SocketAddr,
}

impl Server {
    /// Binds `host:port` from `config` and builds the router.
    pub async fn bind(config: &ServerConfig) -> Result<Self> {
        let bind_addr = config.bind_addr();
        let listener = TcpListener::bind(bind_addr.as_str())
            .await
            .with_context(|| format!("failed to bind {bind_addr}"))?;
        let addr = listener.local_addr()?;

        info!(%addr, environment = %config.environment, "Server is running");

        Ok(Self {
            listener,
            router: crate::app(config),
            addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    /// Serves until `shutdown` resolves, then stops accepting connections and
    /// waits for in-flight requests to finish.
    pub async fn serve_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await
            .context("HTTP server failed")?;

        info!("HTTP server closed");
        Ok(())
    }

    /// Serves until Ctrl+C or SIGTERM.
    pub async fn run(self) -> Result<()> {
        self.serve_until(shutdown_signal()).await
    }
}

/// Resolves on the first of Ctrl+C or SIGTERM. A signal whose handler cannot
/// be installed is logged and never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("SIGINT signal received: closing HTTP server"),
            Err(e) => {
                error!(%e, "Failed to install Ctrl+C handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("SIGTERM signal received: closing HTTP server");
            }
            Err(e) => {
                error!(%e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
