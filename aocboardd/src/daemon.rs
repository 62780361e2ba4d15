//! Daemon: Main runtime orchestrator.
//!
//! The Daemon ties together all components:
//! - Leaderboard Refresher (background fetch loop, sole cache writer)
//! - Credential Store (session cookie, reloadable)
//! - API Server (command endpoints, cache readers)
//!
//! # Lifecycle
//!
//! 1. Load configuration and the initial session cookie
//! 2. Start the refresh loop (first refresh runs immediately)
//! 3. Start API server
//! 4. Wait for SIGINT
//! 5. Cancel the loop and the server, then wait for the loop to finish

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use aocboard_connectors::{AocRestClient, LeaderboardSource};
use aocboard_store::{CredentialStore, LeaderboardCache};

use crate::api::{create_router, ApiState, CommandSettings};
use crate::config::Config;
use crate::error::{DaemonError, DaemonResult};
use crate::refresher::LeaderboardRefresher;

// =============================================================================
// Daemon
// =============================================================================

/// The main aocboard daemon.
pub struct Daemon {
    /// Configuration
    config: Config,
    /// Leaderboard cache
    cache: Arc<LeaderboardCache>,
    /// Session cookie holder
    credentials: Arc<CredentialStore>,
    /// Refresh loop
    refresher: Arc<LeaderboardRefresher>,
    /// Stops the refresh loop and the API server
    shutdown: CancellationToken,
}

impl Daemon {
    /// Create a daemon talking to the real event API.
    ///
    /// Fails if the session cookie variable is not set.
    pub fn new(config: Config) -> DaemonResult<Self> {
        let credentials = Arc::new(CredentialStore::from_env(&config.leaderboard.session_env_var)?);
        let client = AocRestClient::new(config.leaderboard.year, config.leaderboard.leaderboard_id)
            .with_base_url(&config.leaderboard.base_url)
            .with_timeout(config.leaderboard.request_timeout);

        Ok(Self::with_components(config, Arc::new(client), credentials))
    }

    /// Create a daemon with provided components.
    pub fn with_components(
        config: Config,
        source: Arc<dyn LeaderboardSource>,
        credentials: Arc<CredentialStore>,
    ) -> Self {
        let cache = Arc::new(LeaderboardCache::new());
        let refresher = Arc::new(LeaderboardRefresher::new(
            source,
            cache.clone(),
            credentials.clone(),
            config.leaderboard.refresh_interval,
        ));

        Self {
            config,
            cache,
            credentials,
            refresher,
            shutdown: CancellationToken::new(),
        }
    }

    /// Run the daemon.
    ///
    /// This method blocks until shutdown is requested (SIGINT).
    pub async fn run(self) -> DaemonResult<()> {
        info!(
            version = env!("CARGO_PKG_VERSION"),
            environment = %self.config.environment,
            year = self.config.leaderboard.year,
            leaderboard_id = self.config.leaderboard.leaderboard_id,
            "Starting aocboard daemon"
        );

        // 1. Start refresh loop
        let refresh_task = self.refresher.clone().start(self.shutdown.clone());

        // 2. Start API server
        let api_addr = match self.start_api_server().await {
            Ok(addr) => addr,
            Err(e) => {
                self.shutdown.cancel();
                let _ = refresh_task.await;
                return Err(e);
            }
        };
        info!(%api_addr, "API server started");

        // 3. Wait for shutdown signal
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for shutdown signal");
        }
        info!("Received shutdown signal");

        // 4. Graceful shutdown
        self.shutdown.cancel();
        if let Err(e) = refresh_task.await {
            error!(error = %e, "Refresh task ended abnormally");
        }
        info!("Shutdown complete");

        Ok(())
    }

    /// Start the API server.
    ///
    /// Returns the bound address; the server stops when the daemon shuts down.
    pub async fn start_api_server(&self) -> DaemonResult<SocketAddr> {
        let state = Arc::new(ApiState {
            cache: self.cache.clone(),
            credentials: self.credentials.clone(),
            refresher: self.refresher.clone(),
            settings: CommandSettings {
                base_url: self.config.leaderboard.base_url.clone(),
                leaderboard_link: self.config.leaderboard.leaderboard_link(),
                join_code: self.config.leaderboard.join_code.clone(),
                admin_token: self.config.api.admin_token.clone(),
            },
        });

        let router = create_router(state);
        let addr = format!("{}:{}", self.config.api.host, self.config.api.port);

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| DaemonError::Server(format!("Failed to bind to {}: {}", addr, e)))?;

        let local_addr = listener
            .local_addr()
            .map_err(|e| DaemonError::Server(format!("Failed to get local address: {}", e)))?;

        // Spawn the server task
        let shutdown = self.shutdown.clone();
        tokio::spawn(async move {
            let serve = axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown.cancelled().await });
            if let Err(e) = serve.await {
                error!(error = %e, "API server error");
            }
        });

        Ok(local_addr)
    }

    /// Leaderboard cache shared with the API.
    pub fn cache(&self) -> &Arc<LeaderboardCache> {
        &self.cache
    }

    /// Refresh loop.
    pub fn refresher(&self) -> &Arc<LeaderboardRefresher> {
        &self.refresher
    }

    /// Token cancelling the loop and the API server.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}

// =============================================================================
// Tests
// =============================================================================
