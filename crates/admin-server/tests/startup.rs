use admin_server::config::Config;
use admin_server::{run, StartupError};

#[tokio::test]
async fn unreachable_store_stops_startup_before_listening() {
    let mut config = Config::default();
    config.database.uri = "mongodb://127.0.0.1:1/?directConnection=true".to_string();
    config.database.connect_timeout_ms = 300;
    config.server.host = "127.0.0.1".parse().unwrap();
    config.server.port = 0;

    let err = run(config).await.unwrap_err();
    assert!(matches!(err, StartupError::Database(_)), "got {err:?}");
}
