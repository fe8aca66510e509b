//! Listener loop (C6): the single task that owns all socket reads, grounded
//! in `websocket_client.py`'s `listen()`/`_callback_message`/`receive_message`
//! trio and in the `run_session_loop` pattern (one task, `tokio::select!`
//! over the socket and a shutdown signal, not a handle-per-frame spawn).

use std::sync::Arc;

use bridge_protocol::{registry, DecodedPayload, EventSubType, EventType, Response};
use futures_util::StreamExt;
use serde_json::Value;
use tokio::sync::broadcast;
use tokio_tungstenite::tungstenite::protocol::Message;
use tracing::{debug, warn};

use crate::correlator::{Correlator, Offered};
use crate::error::{Error, HttpContext, Status};
use crate::transport::{WsSink, WsStream};

/// A decoded, unsolicited frame delivered to the caller's push callback.
/// Never constructed for frames the correlator claimed.
#[derive(Debug, Clone)]
pub enum PushUpdate {
    /// An unsolicited `DATA_UPDATE` for a registered module.
    Module {
        module: String,
        payload: DecodedPayload,
    },
    /// Any other frame type, only produced when `accept_other_types` is set.
    Other {
        event_type: EventType,
        payload: DecodedPayload,
    },
}

pub struct Listener {
    read: futures_util::stream::SplitStream<WsStream>,
    write: WsSink,
    correlator: Correlator,
    push_tx: broadcast::Sender<PushUpdate>,
    ws_url: Arc<str>,
    accept_other_types: bool,
}

impl Listener {
    #[must_use]
    pub fn new(
        read: futures_util::stream::SplitStream<WsStream>,
        write: WsSink,
        correlator: Correlator,
        push_tx: broadcast::Sender<PushUpdate>,
        ws_url: Arc<str>,
        accept_other_types: bool,
    ) -> Self {
        Self {
            read,
            write,
            correlator,
            push_tx,
            ws_url,
            accept_other_types,
        }
    }

    /// Run until the socket closes or a protocol-level error ends the
    /// connection. Returning `Ok(())` means a clean close; any `Err` should
    /// be surfaced to every caller currently waiting on this connection
    /// (the facade does this by inspecting the listener task's join result).
    pub async fn run(mut self) -> Result<(), Error> {
        loop {
            match self.read.next().await {
                None => return Ok(()),
                Some(Err(error)) => {
                    return Err(Error::connection_error(
                        HttpContext::new("WS", self.ws_url.to_string()),
                        Status::ConnectionError,
                    ))
                    .map_err(|e| {
                        warn!(error = %error, "websocket read error");
                        e
                    })
                }
                Some(Ok(message)) => self.handle_message(message).await?,
            }
        }
    }

    async fn handle_message(&mut self, message: Message) -> Result<(), Error> {
        match message {
            Message::Text(text) => self.handle_frame(text.as_str()).await,
            Message::Binary(_) => Err(Error::bad_message("unexpected binary frame")),
            Message::Ping(data) => {
                use futures_util::SinkExt;
                let _ = self.write.lock().await.send(Message::Pong(data)).await;
                Ok(())
            }
            Message::Pong(_) | Message::Frame(_) => Ok(()),
            Message::Close(frame) => Err(Error::connection_closed(
                frame.map_or_else(|| "connection closed".to_owned(), |f| f.reason.to_string()),
            )),
        }
    }

    async fn handle_frame(&mut self, text: &str) -> Result<(), Error> {
        let response = bridge_protocol::decode(text.as_bytes())
            .map_err(|error| Error::bad_message(error.to_string()))?;
        debug!(frame = text, "received frame");

        if response.is_authentication_error() {
            let error = Error::authentication_websocket(response.subtype.clone());
            // A request racing this frame must see `Authentication`, not a
            // generic disconnect once the listener task ends.
            self.correlator.fail_all(&error);
            return Err(error);
        }

        let decorated = self.decorate_data_update(response);

        match self.correlator.offer(decorated) {
            Offered::Delivered => return Ok(()),
            Offered::TypeMismatch => {
                warn!("response type did not match the waiting request; ignoring");
                return Ok(());
            }
            Offered::NoMatch => {}
        }

        // Not claimed by any waiter: classify as an error frame, an
        // unsolicited data update, or (optionally) any other push.
        self.classify_unclaimed(text)
    }

    fn classify_unclaimed(&self, text: &str) -> Result<(), Error> {
        let response: Response =
            serde_json::from_str(text).map_err(|error| Error::bad_message(error.to_string()))?;

        if response.event_type == EventType::Error {
            match &response.subtype {
                Some(EventSubType::ListenerAlreadyRegistered) => {
                    debug!("listener already registered for this connection");
                }
                other => warn!(subtype = ?other, "unmatched error frame"),
            }
            return Ok(());
        }

        if response.event_type == EventType::DataUpdate {
            let Some(module) = response.module.clone() else {
                warn!("DATA_UPDATE frame missing a module name");
                return Ok(());
            };
            match registry::decode(&module, response.data) {
                Ok(payload) => {
                    let _ = self.push_tx.send(PushUpdate::Module { module, payload });
                }
                Err(error) => warn!(module = %module, error = %error, "dropping undecodable data update"),
            }
            return Ok(());
        }

        if self.accept_other_types {
            let key = response.event_type.as_str().to_ascii_lowercase();
            let payload = registry::decode(&key, response.data.clone())
                .or_else(|_| registry::decode("response", response.data))
                .unwrap_or_else(|_| DecodedPayload::Response(bridge_protocol::models::GenericResponse(Value::Null)));
            let _ = self.push_tx.send(PushUpdate::Other {
                event_type: response.event_type,
                payload,
            });
        }

        Ok(())
    }

    /// §4.6 step 3: a `DATA_UPDATE` that *does* match a correlator entry
    /// still needs its `data` field decoded via the registry before the
    /// slot is fulfilled.
    fn decorate_data_update(&self, mut response: Response) -> Response {
        if response.event_type == EventType::DataUpdate {
            if let Some(module) = response.module.clone() {
                if let Ok(payload) = registry::decode(&module, response.data.clone()) {
                    if let Ok(value) = serde_json::to_value(&payload) {
                        response.data = value;
                    }
                }
            }
        }
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_protocol::Request;
    use bridge_test_utils::{MockBridgeServer, MockBridgeServerConfig};
    use tokio_tungstenite::connect_async;

    async fn connect(url: &str) -> (WsSink, futures_util::stream::SplitStream<WsStream>) {
        let (stream, _) = connect_async(url).await.unwrap();
        let (write, read) = stream.split();
        (std::sync::Arc::new(tokio::sync::Mutex::new(write)), read)
    }

    #[tokio::test]
    async fn delivers_matched_response_to_correlator() {
        let server = MockBridgeServer::start(MockBridgeServerConfig::new("abc123"))
            .await
            .unwrap();
        let (write, read) = connect(&server.url()).await;
        let correlator = Correlator::new();
        let pending = correlator.register("test", Some(EventType::Directories));
        let (push_tx, _push_rx) = broadcast::channel(16);

        let listener = Listener::new(
            read,
            write.clone(),
            correlator,
            push_tx,
            Arc::from(server.url()),
            false,
        );
        let handle = tokio::spawn(listener.run());

        {
            use futures_util::SinkExt;
            let request = Request::new("abc123", "test", EventType::GetDirectories, serde_json::json!({}));
            write
                .lock()
                .await
                .send(Message::Text(serde_json::to_string(&request).unwrap().into()))
                .await
                .unwrap();
        }

        let response = pending.wait().await.unwrap();
        assert_eq!(response.event_type, EventType::Directories);
        handle.abort();
    }

    #[tokio::test]
    async fn unsolicited_data_update_reaches_push_channel() {
        let config = MockBridgeServerConfig::new("abc123").with_push(
            bridge_test_utils::DataPush::new("system", serde_json::json!({
                "boot_time": 0, "fqdn": "h", "hostname": "h", "kernel_version": "k",
                "ip_address_4": "1.2.3.4", "mac_address": "aa", "platform_version": "1",
                "platform": "linux", "uptime": 0, "users": [], "uuid": "u", "version": "4.0.2",
            })),
        );
        let server = MockBridgeServer::start(config).await.unwrap();
        let (write, read) = connect(&server.url()).await;
        let correlator = Correlator::new();
        let (push_tx, mut push_rx) = broadcast::channel(16);

        let listener = Listener::new(read, write.clone(), correlator, push_tx, Arc::from(server.url()), false);
        let handle = tokio::spawn(listener.run());

        {
            use futures_util::SinkExt;
            let request = Request::new(
                "abc123",
                "test",
                EventType::GetData,
                serde_json::json!({"modules": ["system"]}),
            );
            write
                .lock()
                .await
                .send(Message::Text(serde_json::to_string(&request).unwrap().into()))
                .await
                .unwrap();
        }

        let update = push_rx.recv().await.unwrap();
        match update {
            PushUpdate::Module { module, payload } => {
                assert_eq!(module, "system");
                assert!(matches!(payload, DecodedPayload::System(_)));
            }
            other => panic!("expected a module push, got {other:?}"),
        }
        handle.abort();
    }

    #[tokio::test]
    async fn bad_token_surfaces_as_authentication_error() {
        let server = MockBridgeServer::start(MockBridgeServerConfig::new("right-token"))
            .await
            .unwrap();
        let (write, read) = connect(&server.url()).await;
        let correlator = Correlator::new();
        let (push_tx, _push_rx) = broadcast::channel(16);

        let listener = Listener::new(read, write.clone(), correlator, push_tx, Arc::from(server.url()), false);
        let handle = tokio::spawn(listener.run());

        {
            use futures_util::SinkExt;
            let request = Request::new("wrong-token", "x", EventType::GetDirectories, serde_json::json!({}));
            write
                .lock()
                .await
                .send(Message::Text(serde_json::to_string(&request).unwrap().into()))
                .await
                .unwrap();
        }

        let result = handle.await.unwrap();
        assert!(matches!(result, Err(Error::Authentication { .. })));
    }
}
