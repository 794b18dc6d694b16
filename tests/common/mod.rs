//! Shared utilities for integration tests.

use std::net::SocketAddr;

use tempfile::TempDir;
use todo_api::config::AppConfig;
use todo_api::db;
use todo_api::http::HttpServer;
use todo_api::lifecycle::Shutdown;

/// A running server instance backed by a scratch database.
pub struct TestApp {
    pub addr: SocketAddr,
    pub client: reqwest::Client,
    _db_dir: TempDir,
    _shutdown: Shutdown,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Default config for tests: rate limiting off so CRUD tests are not throttled.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.rate_limit.enabled = false;
    config
}

/// Spawn the server on an ephemeral port with a fresh database.
pub async fn spawn_app(mut config: AppConfig) -> TestApp {
    let db_dir = tempfile::tempdir().expect("create temp dir");
    config.database.url = format!(
        "sqlite://{}",
        db_dir.path().join("todos.db").display()
    );
    config.listener.bind_address = "127.0.0.1:0".to_string();

    let pool = db::connect(&config.database).await.expect("connect db");
    let listener = tokio::net::TcpListener::bind(&config.listener.bind_address)
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    let server = HttpServer::new(config, pool);
    tokio::spawn(async move {
        let _ = server.run(listener, signal).await;
    });

    TestApp {
        addr,
        client: reqwest::Client::new(),
        _db_dir: db_dir,
        _shutdown: shutdown,
    }
}
