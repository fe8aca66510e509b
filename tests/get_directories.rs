//! §8 scenario 2: `get_directories` against a canned server response.

mod common;

use bridge_test_utils::{MockBridgeServer, MockBridgeServerConfig};
use serde_json::json;
use system_bridge_connector::{BridgeClient, ClientConfig};

fn config_for(server: &MockBridgeServer, token: &str) -> ClientConfig {
    let addr = server.local_addr();
    ClientConfig::new(addr.ip().to_string(), addr.port(), token)
}

#[tokio::test]
async fn returns_one_directory_record() {
    common::init_tracing();
    let config = MockBridgeServerConfig::new("abc123").with_response(
        "GET_DIRECTORIES",
        json!([{"key": "documents", "name": "Documents", "path": "/home/user/documents"}]),
    );
    let server = MockBridgeServer::start(config).await.unwrap();
    let client = BridgeClient::connect(config_for(&server, "abc123"))
        .await
        .unwrap();

    let directories = client.get_directories().await.unwrap();

    assert_eq!(directories.len(), 1);
    assert_eq!(directories[0].key, "documents");
    assert_eq!(directories[0].path, "/home/user/documents");

    client.close().await.unwrap();
}
