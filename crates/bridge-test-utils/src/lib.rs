//! In-process test harness (C10): a mock WebSocket server standing in for
//! `/api/websocket` and a mock HTTP server standing in for the control
//! plane, both usable from this crate's own tests and from the root crate's
//! integration tests.

mod mock_bridge_server;
mod mock_http_server;

pub use mock_bridge_server::{DataPush, MockBridgeServer, MockBridgeServerConfig};
pub use mock_http_server::{MockHttpServer, MockHttpServerConfig};
