//! §8 scenarios 3 and 4: the composite `get_data` aggregate, both the
//! happy path (a `DATA_UPDATE` push fills the requested slot before the
//! deadline) and the timeout path (`DataMissing` when nothing ever arrives).

mod common;

use std::time::Duration;

use bridge_test_utils::{DataPush, MockBridgeServer, MockBridgeServerConfig};
use serde_json::json;
use system_bridge_connector::{BridgeClient, ClientConfig, Error};

fn config_for(server: &MockBridgeServer, token: &str) -> ClientConfig {
    let addr = server.local_addr();
    ClientConfig::new(addr.ip().to_string(), addr.port(), token)
        .with_request_timeout(Duration::from_millis(300))
        .with_get_data_timeout(Duration::from_millis(300))
}

#[tokio::test]
async fn system_slot_is_set_once_the_push_arrives() {
    common::init_tracing();
    let config = MockBridgeServerConfig::new("abc123").with_push(DataPush::new(
        "system",
        json!({
            "boot_time": 0, "fqdn": "h", "hostname": "h", "kernel_version": "k",
            "ip_address_4": "1.2.3.4", "mac_address": "aa", "platform_version": "1",
            "platform": "linux", "uptime": 0, "users": [], "uuid": "u", "version": "4.0.2",
        }),
    ));
    let server = MockBridgeServer::start(config).await.unwrap();
    let client = BridgeClient::connect(config_for(&server, "abc123"))
        .await
        .unwrap();

    let data = client.get_data(vec!["system".to_owned()]).await.unwrap();

    assert!(data.system.is_some());
    assert_eq!(data.system.unwrap().hostname, "h");

    client.close().await.unwrap();
}

#[tokio::test]
async fn missing_push_times_out_as_data_missing() {
    common::init_tracing();
    let server = MockBridgeServer::start(MockBridgeServerConfig::new("abc123"))
        .await
        .unwrap();
    let client = BridgeClient::connect(config_for(&server, "abc123"))
        .await
        .unwrap();

    let error = client
        .get_data(vec!["system".to_owned()])
        .await
        .unwrap_err();

    match error {
        Error::DataMissing { missing } => assert_eq!(missing, vec!["system".to_owned()]),
        other => panic!("expected DataMissing, got {other:?}"),
    }

    client.close().await.unwrap();
}
