//! Server startup and binding.
//!
//! Provides functionality to start the Axum server with configurable
//! host/port and an injectable rates provider.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use adapter_rates::{FeedError, RatesProvider};
use axum::Router;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::routes;

/// Server instance that can be started.
pub struct Server {
    /// Server configuration.
    config: Arc<ServerConfig>,
    /// The built router.
    router: Router,
}

impl Server {
    /// Creates a server, building its rates provider from the configuration.
    pub fn new(config: ServerConfig) -> Result<Self, FeedError> {
        let provider = RatesProvider::with_timeouts(
            config.rates_url.clone(),
            Duration::from_secs(config.refresh_interval_secs),
            Duration::from_secs(config.fetch_timeout_secs),
        )?;
        Ok(Self::with_provider(config, Arc::new(provider)))
    }

    /// Creates a server around an existing provider.
    ///
    /// Useful for tests that preload a schedule via
    /// [`RatesProvider::set_schedule`].
    pub fn with_provider(config: ServerConfig, rates: Arc<RatesProvider>) -> Self {
        let config = Arc::new(config);
        let router = routes::build_router(config.clone(), rates);

        Self { config, router }
    }

    /// Get the socket address the server will bind to.
    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.config.host, self.config.port)
            .parse()
            .expect("Invalid socket address")
    }

    /// Get the configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Run the server.
    ///
    /// Binds to the configured host/port and serves requests.
    pub async fn run(self) -> Result<(), std::io::Error> {
        let addr = self.socket_addr();
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, self.router).await
    }

    /// Run the server with a specific listener.
    ///
    /// Useful for testing with a listener bound to port 0.
    pub async fn run_with_listener(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!("Server listening on {}", addr);

        axum::serve(listener, self.router).await
    }

    /// Create a test server and return the bound address.
    #[cfg(test)]
    pub async fn spawn_test_server(
        config: ServerConfig,
        rates: Arc<RatesProvider>,
    ) -> (SocketAddr, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = Self::with_provider(config, rates);
        let handle = tokio::spawn(async move {
            server.run_with_listener(listener).await.ok();
        });

        // Give the server a moment to start
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;

        (addr, handle)
    }
}
