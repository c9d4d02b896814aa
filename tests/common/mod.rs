//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::PathBuf;

use serde_json::{json, Value};
use table_viewer::config::{load_settings, SettingsError};
use table_viewer::{Application, Settings, Shutdown};
use tokio::task::JoinHandle;

/// A temporary directory holding a seeded database and a settings file.
pub struct Fixture {
    pub dir: tempfile::TempDir,
    pub db_path: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("data.db");
        let conn = rusqlite::Connection::open(&db_path).unwrap();
        conn.execute_batch(
            r#"
            CREATE TABLE customers (id INTEGER PRIMARY KEY, name TEXT);
            CREATE TABLE orders (id INTEGER PRIMARY KEY, user_id TEXT, items TEXT);
            INSERT INTO customers (name) VALUES ('Ada'), ('Grace');
            INSERT INTO orders (user_id, items) VALUES ('7', '[{"sku": "A1", "qty": 2}]');
            "#,
        )
        .unwrap();
        Self { dir, db_path }
    }

    /// Settings document with two users:
    /// - `admin` / `secret`: every table
    /// - `clerk` / `pw`: only `orders`
    pub fn document(&self, protection: bool) -> Value {
        json!({
            "DATABASE_FILEPATH": self.db_path.display().to_string(),
            "PASSWORD_PROTECTION": protection,
            "LOG_OUT_USERS": false,
            "LOG_OUT_USERS_AFTER": 3600,
            "HOST": "127.0.0.1",
            "PORT": 0,
            "DEBUG": false,
            "users": {
                "admin": { "password": "secret", "tables": ["*"], "permissions": ["admin"] },
                "clerk": { "password": "pw", "tables": ["orders"], "permissions": ["read"] }
            }
        })
    }

    pub fn load(&self, document: &Value) -> Result<Settings, SettingsError> {
        let path = self.dir.path().join("settings.json");
        std::fs::write(&path, document.to_string()).unwrap();
        load_settings(&path)
    }
}

/// A running viewer bound to an ephemeral port.
pub struct TestServer {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<()>,
}

impl TestServer {
    pub async fn start(settings: Settings) -> Self {
        let app = Application::bind(settings).await.unwrap();
        let addr = app.local_addr().unwrap();
        let shutdown = app.shutdown_handle();
        let handle = tokio::spawn(async move {
            app.run().await.unwrap();
        });
        Self {
            addr,
            shutdown,
            handle,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn stop(self) {
        self.shutdown.trigger();
        self.handle.await.unwrap();
    }
}

/// Client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

pub fn location(res: &reqwest::Response) -> Option<String> {
    res.headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
