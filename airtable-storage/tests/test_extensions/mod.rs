use std::sync::Arc;

use httpmock::MockServer;
use serde_json::json;
use slog::{Drain, Logger};

use airtable_storage::{ApiKey, RawStorageConfiguration, TableRegistry};

pub const BASE_ID: &str = "appIntegration";
pub const API_KEY: &str = "patIntegration.secret";

pub fn test_logger() -> Logger {
    let decorator = slog_term::PlainDecorator::new(slog_term::TestStdoutWriter);
    let drain = slog_term::CompactFormat::new(decorator).build().fuse();
    let drain = slog_async::Async::new(drain).build().fuse();

    Logger::root(Arc::new(drain), slog::o!())
}

/// Registry of the `users` and `teams` tables, served by a fresh mock server.
pub fn setup_server_and_registry() -> (MockServer, TableRegistry) {
    let server = MockServer::start();
    let configuration = RawStorageConfiguration {
        api_key: Some(ApiKey::new(API_KEY)),
        base_id: Some(BASE_ID.to_string()),
        table_names: Some(json!(["users", "teams"])),
        endpoint: Some(server.base_url()),
        request_timeout_ms: Some(5_000),
    };
    let registry = TableRegistry::build(Some(&configuration), test_logger())
        .expect("Building the registry should not fail");

    (server, registry)
}

pub fn table_path(table_name: &str) -> String {
    format!("/v0/{BASE_ID}/{table_name}")
}
