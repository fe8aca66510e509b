//! WebSocket client facade (C7) and composite `get_data` (C8), grounded in
//! `websocket_client.py`'s `WebSocketClient` class: `connect`/`close`, every
//! typed operation method, and the `listen`/`_callback_message` dispatch
//! loop reworked as a spawned task plus a `broadcast` channel (the
//! `EventBus` fan-out pattern from `cache.rs`) instead of a user-supplied
//! async callback.

use std::sync::Arc;
use std::time::Duration;

use bridge_protocol::models::{
    ExecuteRequest, ExecuteResult, GetData, KeyboardKey, KeyboardText, MediaControl,
    MediaDirectory, MediaFile, MediaFiles, MediaGetFile, MediaGetFiles, ModulesData, Notification,
    OpenPath, OpenUrl, RegisterDataListener, Update,
};
use bridge_protocol::{EventSubType, EventType, Request, Response};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::Message;

use crate::config::ClientConfig;
use crate::correlator::Correlator;
use crate::error::{Error, HttpContext, Status};
use crate::listener::{Listener, PushUpdate};
use crate::transport::WsSink;

/// How an outbound request expects its reply to be treated by the
/// correlator (§4.5/§4.7).
enum Expectation {
    /// No correlator entry is created; a synthetic `N/A` ack is returned
    /// immediately after the write succeeds.
    FireAndForget,
    /// A correlator entry is created, filtered to the given response type.
    Awaited(EventType),
}

/// Generates a zero-argument power operation method: send the request,
/// expect the matching `-ING` acknowledgement type, return the response
/// unmodified (callers inspect `subtype` for `TIMEOUT`).
macro_rules! power_operation {
    ($name:ident, $event:expr, $expected:expr) => {
        pub async fn $name(&self) -> Result<Response, Error> {
            self.send($event, serde_json::json!({}), Expectation::Awaited($expected))
                .await
        }
    };
}

pub struct BridgeClient {
    config: ClientConfig,
    write: WsSink,
    correlator: Correlator,
    push_tx: broadcast::Sender<PushUpdate>,
    listener_handle: JoinHandle<Result<(), Error>>,
}

impl BridgeClient {
    /// Opens `ws://<host>:<port>/api/websocket` and immediately spawns the
    /// single listener task that owns all subsequent reads (§5). There is
    /// no disconnected intermediate state: a `BridgeClient` is always
    /// backed by a running connection and listener.
    ///
    /// # Errors
    /// Returns [`Error::ConnectionError`] if the handshake fails (DNS,
    /// refused connection, TLS/handshake rejection).
    pub async fn connect(config: ClientConfig) -> Result<Self, Error> {
        let ws_url: Arc<str> = Arc::from(config.websocket_url());
        let (stream, _http_response) = tokio_tungstenite::connect_async(ws_url.as_ref())
            .await
            .map_err(|_| {
                Error::connection_error(
                    HttpContext::new("WS", ws_url.to_string()),
                    Status::ConnectionError,
                )
            })?;

        let (write, read) = stream.split();
        let write: WsSink = Arc::new(tokio::sync::Mutex::new(write));
        let correlator = Correlator::new();
        let (push_tx, _idle_rx) = broadcast::channel(256);

        let listener = Listener::new(
            read,
            write.clone(),
            correlator.clone(),
            push_tx.clone(),
            ws_url.clone(),
            false,
        );
        let listener_handle = tokio::spawn(Self::heartbeat_and_listen(
            listener,
            write.clone(),
            config.heartbeat_interval,
        ));

        Ok(Self {
            config,
            write,
            correlator,
            push_tx,
            listener_handle,
        })
    }

    /// Runs the listener loop and a periodic ping side by side; either one
    /// ending the connection ends the other. The 30 s heartbeat matches
    /// aiohttp's `ws_connect(..., heartbeat=30)` (§4.7).
    async fn heartbeat_and_listen(
        listener: Listener,
        write: WsSink,
        interval: Duration,
    ) -> Result<(), Error> {
        let ping_loop = async {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await; // first tick fires immediately; skip it
            loop {
                ticker.tick().await;
                if write.lock().await.send(Message::Ping(Vec::new().into())).await.is_err() {
                    return;
                }
            }
        };

        tokio::select! {
            result = listener.run() => result,
            () = ping_loop => Ok(()),
        }
    }

    /// Subscribe to unsolicited pushes (server-initiated `DATA_UPDATE`
    /// frames, and any other frame type if a future connection enables
    /// `accept_other_types`). Each subscriber gets every push independently
    /// (broadcast fan-out); a subscriber that falls behind sees
    /// `RecvError::Lagged` on its next `recv()`.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<PushUpdate> {
        self.push_tx.subscribe()
    }

    /// # Errors
    /// Returns [`Error::ConnectionClosed`] if the listener task has already
    /// ended (e.g. an `Authentication` error propagated out of it).
    pub async fn close(self) -> Result<(), Error> {
        let _ = self.write.lock().await.send(Message::Close(None)).await;
        self.listener_handle.abort();
        Ok(())
    }

    async fn send(
        &self,
        event: EventType,
        data: serde_json::Value,
        expectation: Expectation,
    ) -> Result<Response, Error> {
        let id = uuid::Uuid::new_v4().simple().to_string();
        let request = Request::new(self.config.token.clone(), id.clone(), event, data);

        // A correlator entry is created iff the caller intends to wait for a
        // reply; fire-and-forget requests never get one.
        let pending = match &expectation {
            Expectation::FireAndForget => None,
            Expectation::Awaited(ty) => Some(self.correlator.register(id.clone(), Some(ty.clone()))),
        };

        let text = String::from_utf8(bridge_protocol::encode(&request).map_err(|e| Error::bad_message(e.to_string()))?)
            .map_err(|e| Error::bad_message(e.to_string()))?;
        {
            let mut sink = self.write.lock().await;
            sink.send(Message::Text(text.into()))
                .await
                .map_err(|_| Error::connection_closed("write failed: connection is closing"))?;
        }

        let Some(pending) = pending else {
            return Ok(Response::fire_and_forget_ack(id));
        };

        tokio::select! {
            response = pending.wait() => response,
            () = tokio::time::sleep(self.config.request_timeout) => {
                self.correlator.cancel(&id);
                Ok(Response::timeout(id))
            }
        }
    }

    // -- Fire-and-forget operations (§4.7) --------------------------------

    pub async fn application_update(&self, update: Update) -> Result<Response, Error> {
        let data = serde_json::to_value(update).map_err(|e| Error::bad_message(e.to_string()))?;
        self.send(EventType::ApplicationUpdate, data, Expectation::FireAndForget)
            .await
    }

    pub async fn exit_backend(&self) -> Result<Response, Error> {
        self.send(
            EventType::ExitApplication,
            serde_json::json!({}),
            Expectation::FireAndForget,
        )
        .await
    }

    pub async fn media_control(&self, control: MediaControl) -> Result<Response, Error> {
        let data = serde_json::to_value(control).map_err(|e| Error::bad_message(e.to_string()))?;
        self.send(EventType::MediaControl, data, Expectation::FireAndForget)
            .await
    }

    // -- Request/response operations (§4.7) -------------------------------

    /// Fires `GET_DATA` expecting only a `DATA_GET` acknowledgement; the
    /// actual module payloads arrive as `DATA_UPDATE` pushes, consumed by
    /// [`Self::get_data`] or a caller's own [`Self::subscribe`].
    pub async fn get_data(&self, modules: Vec<String>) -> Result<ModulesData, Error> {
        self.get_data_with_timeout(modules, self.config.get_data_timeout)
            .await
    }

    /// # Errors
    /// Returns [`Error::DataMissing`] if `timeout` elapses before every
    /// requested module has arrived (§4.8).
    pub async fn get_data_with_timeout(
        &self,
        modules: Vec<String>,
        timeout: Duration,
    ) -> Result<ModulesData, Error> {
        let mut rx = self.subscribe();
        let data = serde_json::to_value(GetData {
            modules: modules.clone(),
        })
        .map_err(|e| Error::bad_message(e.to_string()))?;

        self.send(EventType::GetData, data, Expectation::Awaited(EventType::DataGet))
            .await?;

        let mut aggregate = ModulesData::default();
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            if aggregate.has_all(&modules) {
                return Ok(aggregate);
            }
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return Err(Error::data_missing(
                    modules
                        .iter()
                        .filter(|m| !aggregate.is_set(m))
                        .cloned()
                        .collect(),
                ));
            }
            match tokio::time::timeout(remaining, rx.recv()).await {
                Ok(Ok(PushUpdate::Module { module, payload })) => aggregate.apply(&module, payload),
                Ok(Ok(PushUpdate::Other { .. })) => {}
                Ok(Err(broadcast::error::RecvError::Lagged(_))) => continue,
                Ok(Err(broadcast::error::RecvError::Closed)) | Err(_) => {
                    if aggregate.has_all(&modules) {
                        return Ok(aggregate);
                    }
                    return Err(Error::data_missing(
                        modules
                            .iter()
                            .filter(|m| !aggregate.is_set(m))
                            .cloned()
                            .collect(),
                    ));
                }
            }
        }
    }

    pub async fn get_directories(&self) -> Result<Vec<MediaDirectory>, Error> {
        let response = self
            .send(
                EventType::GetDirectories,
                serde_json::json!({}),
                Expectation::Awaited(EventType::Directories),
            )
            .await?;
        self.check_timeout(&response)?;
        serde_json::from_value(response.data).map_err(|e| Error::bad_message(e.to_string()))
    }

    pub async fn get_files(&self, request: MediaGetFiles) -> Result<MediaFiles, Error> {
        let data = serde_json::to_value(request).map_err(|e| Error::bad_message(e.to_string()))?;
        let response = self
            .send(EventType::GetFiles, data, Expectation::Awaited(EventType::Files))
            .await?;
        self.check_timeout(&response)?;
        serde_json::from_value(response.data).map_err(|e| Error::bad_message(e.to_string()))
    }

    pub async fn get_file(&self, request: MediaGetFile) -> Result<MediaFile, Error> {
        let data = serde_json::to_value(request).map_err(|e| Error::bad_message(e.to_string()))?;
        let response = self
            .send(EventType::GetFile, data, Expectation::Awaited(EventType::File))
            .await?;
        self.check_timeout(&response)?;
        serde_json::from_value(response.data).map_err(|e| Error::bad_message(e.to_string()))
    }

    pub async fn register_data_listener(&self, modules: Vec<String>) -> Result<Response, Error> {
        let data = serde_json::to_value(RegisterDataListener { modules })
            .map_err(|e| Error::bad_message(e.to_string()))?;
        self.send(
            EventType::RegisterDataListener,
            data,
            Expectation::Awaited(EventType::DataListenerRegistered),
        )
        .await
    }

    pub async fn keyboard_keypress(&self, key: KeyboardKey) -> Result<Response, Error> {
        let data = serde_json::to_value(key).map_err(|e| Error::bad_message(e.to_string()))?;
        self.send(
            EventType::KeyboardKeypress,
            data,
            Expectation::Awaited(EventType::KeyboardKeyPressed),
        )
        .await
    }

    pub async fn keyboard_text(&self, text: KeyboardText) -> Result<Response, Error> {
        let data = serde_json::to_value(text).map_err(|e| Error::bad_message(e.to_string()))?;
        self.send(
            EventType::KeyboardText,
            data,
            Expectation::Awaited(EventType::KeyboardTextSent),
        )
        .await
    }

    pub async fn send_notification(&self, notification: Notification) -> Result<Response, Error> {
        self.send(
            EventType::Notification,
            notification.to_payload(),
            Expectation::Awaited(EventType::NotificationSent),
        )
        .await
    }

    pub async fn open_path(&self, path: OpenPath) -> Result<Response, Error> {
        let data = serde_json::to_value(path).map_err(|e| Error::bad_message(e.to_string()))?;
        self.send(EventType::Open, data, Expectation::Awaited(EventType::Opened))
            .await
    }

    pub async fn open_url(&self, url: OpenUrl) -> Result<Response, Error> {
        let data = serde_json::to_value(url).map_err(|e| Error::bad_message(e.to_string()))?;
        self.send(EventType::Open, data, Expectation::Awaited(EventType::Opened))
            .await
    }

    /// Supplemented (§11): `COMMAND_EXECUTE` -> `COMMAND_COMPLETED`, grounded
    /// in `command_execute.py`/`command_result.py`.
    pub async fn execute_command(&self, command_id: impl Into<String>) -> Result<ExecuteResult, Error> {
        let data = serde_json::to_value(ExecuteRequest {
            command_id: command_id.into(),
        })
        .map_err(|e| Error::bad_message(e.to_string()))?;
        let response = self
            .send(
                EventType::CommandExecute,
                data,
                Expectation::Awaited(EventType::CommandCompleted),
            )
            .await?;
        self.check_timeout(&response)?;
        serde_json::from_value(response.data).map_err(|e| Error::bad_message(e.to_string()))
    }

    power_operation!(power_sleep, EventType::PowerSleep, EventType::PowerSleeping);
    power_operation!(power_hibernate, EventType::PowerHibernate, EventType::PowerHibernating);
    power_operation!(power_restart, EventType::PowerRestart, EventType::PowerRestarting);
    power_operation!(power_shutdown, EventType::PowerShutdown, EventType::PowerShuttingDown);
    power_operation!(power_lock, EventType::PowerLock, EventType::PowerLocking);
    power_operation!(power_logout, EventType::PowerLogout, EventType::PowerLoggingOut);

    fn check_timeout(&self, response: &Response) -> Result<(), Error> {
        if response.event_type == EventType::Error
            && response.subtype.as_ref() == Some(&EventSubType::Timeout)
        {
            return Err(Error::connection_closed("request timed out waiting for a response"));
        }
        Ok(())
    }
}
