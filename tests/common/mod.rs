//! Shared helpers for tests that run against a wiremock server.

#![allow(dead_code)]

use serde_json::Value;
use tracing_subscriber::EnvFilter;
use wiremock::MockServer;
use zammad_client::{Config, Credentials, Record, ZammadClient};

/// API prefix the mock server is addressed with.
pub const API: &str = "/api/v1";

/// Token used by `token_client`.
pub const TOKEN: &str = "test-token-123";

/// Installs a test log subscriber once; `RUST_LOG` controls verbosity.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Configuration pointing at `server` with token authentication.
pub fn token_config(server: &MockServer) -> Config {
    init_tracing();
    Config::new(
        format!("{}{}", server.uri(), API),
        Credentials::HttpToken(TOKEN.to_string()),
    )
    .expect("valid config")
}

/// Client pointing at `server` with token authentication.
pub fn token_client(server: &MockServer) -> ZammadClient {
    ZammadClient::new(&token_config(server)).expect("client")
}

/// Full mock path for an API path.
pub fn api(path: &str) -> String {
    format!("{}/{}", API, path)
}

/// Builds a JSON array of user records with the given ids.
pub fn users(ids: &[i64]) -> Value {
    Value::Array(
        ids.iter()
            .map(|id| serde_json::json!({"id": id, "email": format!("user{}@example.com", id)}))
            .collect(),
    )
}

/// Ids of the records on a page, in order.
pub fn ids<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<i64> {
    records
        .into_iter()
        .map(|r| r["id"].as_i64().expect("numeric id"))
        .collect()
}
