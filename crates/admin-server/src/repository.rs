//! Read access to dashboard users.
//!
//! A user is an untyped document. Records are expected to carry at least an
//! `_id`, but nothing here checks for it; documents pass through exactly as
//! stored.

use admin_db::{fetch_all, DbError, DocumentStore, Record};
use std::time::Duration;

/// Logical database holding dashboard data.
pub const USERS_DATABASE: &str = "dashboard";

/// Collection holding user documents.
pub const USERS_COLLECTION: &str = "users";

/// Deadline for a single user listing, measured from the call.
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Returns every user document in store-native order.
///
/// # Errors
///
/// Returns `DbError::Timeout` if the listing takes longer than
/// [`QUERY_TIMEOUT`], or the store's own error unchanged.
pub async fn find_all_users(store: &dyn DocumentStore) -> Result<Vec<Record>, DbError> {
    let users = fetch_all(store, USERS_DATABASE, USERS_COLLECTION, QUERY_TIMEOUT).await?;
    tracing::debug!(count = users.len(), "fetched users");
    Ok(users)
}
