//! Admin dashboard server library logic.

pub mod config;
pub mod error;
pub mod repository;

use admin_db::{DbError, DocumentStore, Record};
use axum::{routing::get, Router};
use config::{Config, LoggingConfig};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

pub use error::StartupError;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Document store, connected before the listener starts.
    pub store: Arc<dyn DocumentStore>,
}

impl AppState {
    /// Wraps an already-connected store.
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Lists every dashboard user.
    ///
    /// Not routed yet; see [`repository::find_all_users`].
    pub async fn list_users(&self) -> Result<Vec<Record>, DbError> {
        repository::find_all_users(self.store.as_ref()).await
    }
}

/// Health check handler.
///
/// Does not touch the store, so it answers even if the database goes away
/// after startup.
async fn health() -> &'static str {
    "Ok"
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Installs the global tracing subscriber.
pub fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));

    if logging.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

/// Connects to the store, then serves HTTP until SIGINT or SIGTERM.
///
/// # Errors
///
/// Returns `StartupError::Database` if the store cannot be reached, in which
/// case the listener is never bound.
pub async fn run(config: Config) -> Result<(), StartupError> {
    let connection = admin_db::connect(&config.database.connect_settings()).await?;
    let state = AppState::new(Arc::new(connection));

    let addr = config.server.addr();
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;

    tracing::info!(%addr, "server is running");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)
}

/// Waits for a SIGINT (Ctrl+C) or SIGTERM signal for graceful shutdown.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => { tracing::info!("received SIGINT, initiating graceful shutdown"); }
        () = terminate => { tracing::info!("received SIGTERM, initiating graceful shutdown"); }
    }
}
