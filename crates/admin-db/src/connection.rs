//! Connection establishment and collection resolution.

use std::time::Duration;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};

use crate::error::DbError;
use crate::store::Record;

/// Connection string used when `MONGO_URI` is not configured.
pub const DEFAULT_MONGO_URI: &str = "mongodb://localhost:27017";

/// Database the liveness probe runs against.
const PING_DATABASE: &str = "admin";

/// Settings for establishing the store connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectSettings {
    /// MongoDB connection string.
    pub uri: String,

    /// Upper bound for opening a socket and for selecting a server.
    pub connect_timeout: Duration,
}

impl Default for ConnectSettings {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGO_URI.to_string(),
            connect_timeout: Duration::from_secs(10),
        }
    }
}

/// Process-wide handle to the document store.
///
/// Cloning is cheap; every clone shares the driver's internal pool.
#[derive(Debug, Clone)]
pub struct MongoConnection {
    client: Client,
}

impl MongoConnection {
    /// Returns a handle scoped to `collection` in the logical database `database`.
    pub fn collection(&self, database: &str, collection: &str) -> Collection<Record> {
        self.client.database(database).collection::<Record>(collection)
    }

    /// Runs the liveness probe against the connected deployment.
    ///
    /// # Errors
    ///
    /// Returns `DbError::Ping` if the server does not answer.
    pub async fn ping(&self) -> Result<(), DbError> {
        self.client
            .database(PING_DATABASE)
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(DbError::Ping)?;
        Ok(())
    }
}

/// Connects to the store and verifies it is reachable.
///
/// The driver connects lazily, so the `ping` is what actually proves the
/// deployment is up. Both the socket connect and the server selection are
/// bounded by `settings.connect_timeout`.
///
/// # Errors
///
/// Returns `DbError::InvalidUri` if the connection string is malformed,
/// `DbError::Connect` if the client cannot be built, and `DbError::Ping`
/// if the liveness probe fails.
pub async fn connect(settings: &ConnectSettings) -> Result<MongoConnection, DbError> {
    let mut options = ClientOptions::parse(&settings.uri)
        .await
        .map_err(DbError::InvalidUri)?;
    options.connect_timeout = Some(settings.connect_timeout);
    options.server_selection_timeout = Some(settings.connect_timeout);

    let hosts: Vec<String> = options.hosts.iter().map(ToString::to_string).collect();
    let client = Client::with_options(options).map_err(DbError::Connect)?;

    let connection = MongoConnection { client };
    connection.ping().await?;

    tracing::info!(?hosts, "MongoDB connected");
    Ok(connection)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_settings_target_localhost() {
        let settings = ConnectSettings::default();
        assert_eq!(settings.uri, "mongodb://localhost:27017");
        assert_eq!(settings.connect_timeout, Duration::from_secs(10));
    }

    #[tokio::test]
    async fn malformed_uri_is_rejected_before_connecting() {
        let settings = ConnectSettings {
            uri: "not-a-connection-string".to_string(),
            ..ConnectSettings::default()
        };

        let err = connect(&settings).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidUri(_)), "got {err:?}");
    }
}
