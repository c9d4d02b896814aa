//! Startup orchestration.
//!
//! # Responsibilities
//! - Build the session store, access gate and table source from settings
//! - Bind the listener
//! - Start the logout sweeper when protection and auto-logout are both on
//! - Stop the sweeper and wait for it once the server exits

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::Settings;
use crate::db::SqliteTables;
use crate::http::{AppState, HttpServer};
use crate::lifecycle::Shutdown;
use crate::session::Sweeper;

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("failed to bind {address}: {source}")]
    Bind { address: String, source: io::Error },
    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

/// A bound, not yet running viewer.
pub struct Application {
    settings: Settings,
    state: AppState,
    listener: TcpListener,
    shutdown: Shutdown,
}

impl Application {
    /// Build all subsystems and bind the configured address.
    pub async fn bind(settings: Settings) -> Result<Self, StartupError> {
        let tables = Arc::new(SqliteTables::new(settings.database_path.clone()));
        let state = AppState::new(&settings, tables);

        let address = settings.bind_address();
        let listener = match TcpListener::bind(address.as_str()).await {
            Ok(listener) => listener,
            Err(source) => return Err(StartupError::Bind { address, source }),
        };

        Ok(Self {
            settings,
            state,
            listener,
            shutdown: Shutdown::new(),
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Handle that stops [`Application::run`] when triggered.
    pub fn shutdown_handle(&self) -> Shutdown {
        self.shutdown.clone()
    }

    /// Serve until shutdown, then stop background tasks.
    pub async fn run(self) -> Result<(), StartupError> {
        let Application {
            settings,
            state,
            listener,
            shutdown,
        } = self;

        let sweeper = match settings.sweep_interval() {
            Some(interval) => {
                let sweeper = Sweeper::new(state.sessions.clone(), interval);
                Some(tokio::spawn(sweeper.run(shutdown.subscribe())))
            }
            None => {
                tracing::info!(
                    protection = settings.protection,
                    auto_logout = settings.auto_logout.is_some(),
                    "Session sweeper disabled"
                );
                None
            }
        };

        let result = HttpServer::new(state)
            .run(listener, shutdown.subscribe())
            .await
            .map_err(StartupError::Serve);

        // The server may also stop on its own error; make sure the sweeper follows.
        shutdown.trigger();
        if let Some(handle) = sweeper {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Session sweeper task failed");
            }
        }

        result
    }
}
