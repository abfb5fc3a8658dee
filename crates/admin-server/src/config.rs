//! Server configuration loading from `.env.<environment>` files and the
//! process environment.

use admin_db::{ConnectSettings, DEFAULT_MONGO_URI};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment label used when `ADMIN_ENV` is not set.
pub const DEFAULT_ENVIRONMENT: &str = "development";

/// Top-level server configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Server network settings.
    pub server: ServerConfig,

    /// Document store settings.
    pub database: DatabaseConfig,

    /// Logging settings.
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host address to bind to.
    pub host: IpAddr,

    /// Port to listen on.
    pub port: u16,
}

/// Document store configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// MongoDB connection string.
    pub uri: String,

    /// Connect and server-selection timeout, in milliseconds.
    pub connect_timeout_ms: u64,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "admin_server=debug,info").
    pub level: String,

    /// Whether to output logs in JSON format.
    pub json: bool,
}

impl ServerConfig {
    /// Socket address the listener binds to.
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl DatabaseConfig {
    /// Settings handed to [`admin_db::connect`].
    pub fn connect_settings(&self) -> ConnectSettings {
        ConnectSettings {
            uri: self.uri.clone(),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8031,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_MONGO_URI.to_string(),
            connect_timeout_ms: 10_000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Builds the configuration from defaults and the process environment.
    ///
    /// Environment variable overrides:
    /// - `MONGO_URI` overrides `database.uri`
    /// - `ADMIN_HOST` overrides `server.host`
    /// - `ADMIN_PORT` overrides `server.port`
    /// - `ADMIN_MONGO_CONNECT_TIMEOUT_MS` overrides `database.connect_timeout_ms`
    /// - `ADMIN_LOG_LEVEL` overrides `logging.level`
    /// - `ADMIN_LOG_JSON` overrides `logging.json` (set to "true" to enable)
    ///
    /// Values that fail to parse are ignored and the default stands.
    pub fn from_env() -> Self {
        Self::from_lookup(lookup)
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Config::default();

        if let Some(uri) = lookup("MONGO_URI") {
            config.database.uri = uri;
        }
        if let Some(host) = lookup("ADMIN_HOST") {
            if let Ok(parsed) = host.parse() {
                config.server.host = parsed;
            }
        }
        if let Some(port) = lookup("ADMIN_PORT") {
            if let Ok(parsed) = port.parse() {
                config.server.port = parsed;
            }
        }
        if let Some(timeout) = lookup("ADMIN_MONGO_CONNECT_TIMEOUT_MS") {
            if let Ok(parsed) = timeout.parse() {
                config.database.connect_timeout_ms = parsed;
            }
        }
        if let Some(level) = lookup("ADMIN_LOG_LEVEL") {
            config.logging.level = level;
        }
        if let Some(json) = lookup("ADMIN_LOG_JSON") {
            config.logging.json = json == "true" || json == "1";
        }

        config
    }
}

/// Returns the value of `key` from the process environment, or `fallback`.
///
/// A set key always wins, even when its value is not valid UTF-8; invalid
/// sequences are replaced with U+FFFD.
pub fn get(key: &str, fallback: &str) -> String {
    lookup(key).unwrap_or_else(|| fallback.to_string())
}

fn lookup(key: &str) -> Option<String> {
    std::env::var_os(key).map(|value| value.to_string_lossy().into_owned())
}

/// The environment label selecting which settings file is loaded.
pub fn environment() -> String {
    get("ADMIN_ENV", DEFAULT_ENVIRONMENT)
}

/// File name of the settings file for `environment`.
pub fn env_file_name(environment: &str) -> String {
    format!(".env.{environment}")
}

/// Outcome of loading a settings file.
#[derive(Debug)]
pub enum EnvFile {
    /// The file was read and its variables applied.
    Loaded(PathBuf),

    /// The file was missing or unparsable; the environment is unchanged.
    Unavailable {
        /// Path that was tried.
        path: PathBuf,
        /// Why it could not be loaded.
        error: dotenvy::Error,
    },
}

impl EnvFile {
    /// Path of the settings file that was tried.
    pub fn path(&self) -> &Path {
        match self {
            EnvFile::Loaded(path) => path,
            EnvFile::Unavailable { path, .. } => path,
        }
    }

    /// Whether the file was applied.
    pub fn is_loaded(&self) -> bool {
        matches!(self, EnvFile::Loaded(_))
    }

    /// Reports the outcome.
    ///
    /// Separate from loading because the log filter itself comes from the
    /// environment the file populates.
    pub fn log(&self) {
        match self {
            EnvFile::Loaded(path) => {
                tracing::info!(path = %path.display(), "loaded environment file");
            }
            EnvFile::Unavailable { path, error } => {
                tracing::warn!(
                    path = %path.display(),
                    %error,
                    "could not load environment file, using process environment and defaults"
                );
            }
        }
    }
}

/// Loads `.env.<environment>` from the working directory into the process
/// environment.
///
/// Variables that are already set are not overwritten. Failure is never
/// fatal; see [`EnvFile`].
pub fn load_env(environment: &str) -> EnvFile {
    load_path(PathBuf::from(env_file_name(environment)))
}

/// Loads `.env.<environment>` from `dir` into the process environment.
pub fn load_env_from(dir: &Path, environment: &str) -> EnvFile {
    load_path(dir.join(env_file_name(environment)))
}

fn load_path(path: PathBuf) -> EnvFile {
    match dotenvy::from_path(&path) {
        Ok(()) => EnvFile::Loaded(path),
        Err(error) => EnvFile::Unavailable { path, error },
    }
}
