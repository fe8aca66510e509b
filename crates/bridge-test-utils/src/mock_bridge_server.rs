// mock_bridge_server: an in-process WebSocket stub standing in for the
// system bridge backend (C10). Binds 127.0.0.1:0, one spawned task per
// connection, modeled on rt-test-utils' MockWsServer.
//
// Protocol behavior:
// - Any request whose `token` does not match the configured one gets
//   `{type: ERROR, subtype: BAD_TOKEN}` and nothing else.
// - Otherwise the event type determines the reply (§8's scenarios): most
//   request types get a canned or echoed reply; `application_update`,
//   `exit_backend`, and `media_control` get none (fire-and-forget, per the
//   client facade's own contract).
// - After `GET_DATA`/`REGISTER_DATA_LISTENER`, any configured `DataPush`
//   entries are sent as follow-up `DATA_UPDATE` frames.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use bridge_protocol::{EventSubType, EventType, Request, Response};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::Message;

/// A `DATA_UPDATE` frame to push to the client after it sends `GET_DATA` or
/// `REGISTER_DATA_LISTENER`.
#[derive(Debug, Clone)]
pub struct DataPush {
    pub module: String,
    pub data: Value,
    pub delay: Duration,
}

impl DataPush {
    #[must_use]
    pub fn new(module: impl Into<String>, data: Value) -> Self {
        Self {
            module: module.into(),
            data,
            delay: Duration::ZERO,
        }
    }

    #[must_use]
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct MockBridgeServerConfig {
    pub token: String,
    /// Canned `data` keyed by the request's wire event-type spelling (e.g.
    /// `"GET_DIRECTORIES"`). When absent, the server echoes the request's
    /// own `data` back.
    pub responses: HashMap<String, Value>,
    /// `DATA_UPDATE` pushes sent after a `GET_DATA`/`REGISTER_DATA_LISTENER`.
    pub pushes: Vec<DataPush>,
    /// When set, the server never replies at all (used to test the 8s
    /// request timeout and the `get_data` deadline).
    pub silent: bool,
}

impl MockBridgeServerConfig {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_response(mut self, event: impl Into<String>, data: Value) -> Self {
        self.responses.insert(event.into(), data);
        self
    }

    #[must_use]
    pub fn with_push(mut self, push: DataPush) -> Self {
        self.pushes.push(push);
        self
    }

    #[must_use]
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }
}

pub struct MockBridgeServer {
    addr: SocketAddr,
    _task: JoinHandle<()>,
}

impl MockBridgeServer {
    /// Start the server on a random local port. Returns once the listener
    /// is bound; connections are accepted in a background task.
    ///
    /// # Errors
    /// Returns an error if the listener cannot be bound.
    pub async fn start(config: MockBridgeServerConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let config = Arc::new(config);
        let task = tokio::spawn(async move {
            Self::accept_loop(listener, config).await;
        });
        Ok(Self { addr, _task: task })
    }

    #[must_use]
    pub fn local_addr(&self) -> SocketAddr {
        self.addr
    }

    #[must_use]
    pub fn url(&self) -> String {
        format!("ws://{}/api/websocket", self.addr)
    }

    async fn accept_loop(listener: TcpListener, config: Arc<MockBridgeServerConfig>) {
        loop {
            match listener.accept().await {
                Ok((stream, _peer)) => {
                    let config = config.clone();
                    tokio::spawn(async move {
                        let _ = Self::handle_connection(stream, config).await;
                    });
                }
                Err(_) => break,
            }
        }
    }

    async fn handle_connection(
        stream: TcpStream,
        config: Arc<MockBridgeServerConfig>,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let ws_stream = tokio_tungstenite::accept_async(stream).await?;
        let (mut write, mut read) = ws_stream.split();

        while let Some(msg_result) = read.next().await {
            let msg = msg_result?;
            let text = match msg {
                Message::Text(t) => t,
                Message::Close(_) => break,
                Message::Ping(data) => {
                    write.send(Message::Pong(data)).await?;
                    continue;
                }
                _ => continue,
            };

            let request: Request = serde_json::from_str(&text)?;

            if config.silent {
                continue;
            }

            if request.token != config.token {
                let error = Response {
                    id: Some(request.id.clone()),
                    event_type: EventType::Error,
                    subtype: Some(EventSubType::BadToken),
                    module: None,
                    message: Some("invalid token".to_owned()),
                    data: Value::Null,
                };
                write
                    .send(Message::Text(serde_json::to_string(&error)?.into()))
                    .await?;
                continue;
            }

            if let Some(response) = Self::build_reply(&request, &config) {
                write
                    .send(Message::Text(serde_json::to_string(&response)?.into()))
                    .await?;
            }

            if matches!(
                request.event,
                EventType::GetData | EventType::RegisterDataListener
            ) {
                for push in &config.pushes {
                    if !push.delay.is_zero() {
                        tokio::time::sleep(push.delay).await;
                    }
                    let frame = Response {
                        id: None,
                        event_type: EventType::DataUpdate,
                        subtype: None,
                        module: Some(push.module.clone()),
                        message: None,
                        data: push.data.clone(),
                    };
                    write
                        .send(Message::Text(serde_json::to_string(&frame)?.into()))
                        .await?;
                }
            }
        }

        Ok(())
    }

    fn build_reply(request: &Request, config: &MockBridgeServerConfig) -> Option<Response> {
        let response_type = match &request.event {
            EventType::ApplicationUpdate
            | EventType::ExitApplication
            | EventType::MediaControl => return None,
            EventType::GetData => EventType::DataGet,
            EventType::GetDirectories => EventType::Directories,
            EventType::GetFiles => EventType::Files,
            EventType::GetFile => EventType::File,
            EventType::RegisterDataListener => EventType::DataListenerRegistered,
            EventType::KeyboardKeypress => EventType::KeyboardKeyPressed,
            EventType::KeyboardText => EventType::KeyboardTextSent,
            EventType::Notification => EventType::NotificationSent,
            EventType::Open => EventType::Opened,
            EventType::CommandExecute => EventType::CommandCompleted,
            EventType::PowerSleep => EventType::PowerSleeping,
            EventType::PowerHibernate => EventType::PowerHibernating,
            EventType::PowerRestart => EventType::PowerRestarting,
            EventType::PowerShutdown => EventType::PowerShuttingDown,
            EventType::PowerLock => EventType::PowerLocking,
            EventType::PowerLogout => EventType::PowerLoggingOut,
            _ => return None,
        };

        let data = config
            .responses
            .get(request.event.as_str())
            .cloned()
            .unwrap_or_else(|| request.data.clone());

        Some(Response {
            id: Some(request.id.clone()),
            event_type: response_type,
            subtype: None,
            module: None,
            message: None,
            data,
        })
    }
}
