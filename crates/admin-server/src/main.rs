//! Admin dashboard server binary.
//!
//! Loads `.env.<environment>`, connects to MongoDB, and serves the health
//! endpoint with graceful shutdown on SIGTERM/SIGINT.

use admin_server::config::{self, Config};

#[tokio::main]
async fn main() {
    let env_file = config::load_env(&config::environment());
    let config = Config::from_env();

    admin_server::init_tracing(&config.logging);
    env_file.log();

    if let Err(e) = admin_server::run(config).await {
        tracing::error!(error = %e, "dashboard server exited");
        std::process::exit(1);
    }

    tracing::info!("dashboard server shut down");
}
