//! Error types for the store layer.

use std::time::Duration;

/// Errors that can occur while connecting to or reading from the store.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// The connection string could not be parsed into client options.
    #[error("invalid MongoDB connection string: {0}")]
    InvalidUri(#[source] mongodb::error::Error),

    /// The client could not be built from the parsed options.
    #[error("failed to create MongoDB client: {0}")]
    Connect(#[source] mongodb::error::Error),

    /// The liveness probe did not get a response.
    #[error("MongoDB ping failed: {0}")]
    Ping(#[source] mongodb::error::Error),

    /// A query or cursor read failed.
    #[error("MongoDB query failed: {0}")]
    Query(#[from] mongodb::error::Error),

    /// The operation did not finish before its deadline.
    #[error("store operation timed out after {0:?}")]
    Timeout(Duration),
}
