// mock_http_server: an in-process HTTP stub for the backend's control-plane
// routes (C10), serving the fixed test routes plus the two version-probe
// endpoints with configurable bodies.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response as AxumResponse};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Default)]
pub struct MockHttpServerConfig {
    /// Body for `GET /api/data/system`. `None` serves a 404.
    pub system: Option<Value>,
    /// Body for `GET /information`. `None` serves a 404.
    pub information: Option<Value>,
}

impl MockHttpServerConfig {
    #[must_use]
    pub fn with_system_version(version: impl Into<String>) -> Self {
        Self {
            system: Some(json!({
                "boot_time": 0,
                "fqdn": "host.local",
                "hostname": "host",
                "kernel_version": "1.0",
                "ip_address_4": "127.0.0.1",
                "mac_address": "00:00:00:00:00:00",
                "platform_version": "1.0",
                "platform": "linux",
                "uptime": 0,
                "users": [],
                "uuid": "00000000-0000-0000-0000-000000000000",
                "version": version.into(),
            })),
            information: None,
        }
    }

    #[must_use]
    pub fn with_information_version(mut self, version: impl Into<String>) -> Self {
        self.information = Some(json!({ "version": version.into() }));
        self
    }
}

pub struct MockHttpServer {
    addr: SocketAddr,
    _task: JoinHandle<()>,
}

impl MockHttpServer {
    /// # Errors
    /// Returns an error if the listener cannot be bound.
    pub async fn start(config: MockHttpServerConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let state = Arc::new(config);

        let app = Router::new()
            .route("/test/json", get(|| async { Json(json!({"test": "test"})) }))
            .route("/test/text", get(|| async { "test" }))
            .route(
                "/test/badrequest",
                get(|| async { (StatusCode::BAD_REQUEST, Json(json!({"test": "test"}))) }),
            )
            .route(
                "/test/unauthorised",
                get(|| async { (StatusCode::UNAUTHORIZED, Json(json!({"test": "test"}))) }),
            )
            .route("/api/data/system", get(system_handler))
            .route("/information", get(information_handler))
            .with_state(state);

        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, _task: task })
    }

    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }
}

async fn system_handler(State(config): State<Arc<MockHttpServerConfig>>) -> AxumResponse {
    match &config.system {
        Some(body) => (StatusCode::OK, Json(body.clone())).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn information_handler(State(config): State<Arc<MockHttpServerConfig>>) -> AxumResponse {
    match &config.information {
        Some(body) => (StatusCode::OK, Json(body.clone())).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
