//! Errors that stop the server from starting.

use admin_db::DbError;
use std::net::SocketAddr;
use thiserror::Error;

/// Reasons startup can fail.
///
/// Returned to the entry point, which decides whether to exit or retry.
#[derive(Debug, Error)]
pub enum StartupError {
    /// The document store was unreachable or rejected the liveness probe.
    #[error("database unavailable: {0}")]
    Database(#[from] DbError),

    /// The listener could not bind.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Address that was requested.
        addr: SocketAddr,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The HTTP server stopped with an error.
    #[error("server error: {0}")]
    Serve(#[source] std::io::Error),
}
