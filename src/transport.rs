//! Shared WebSocket stream/sink type aliases (C7). The sink is wrapped in
//! an `Arc<Mutex<_>>` because both the listener (automatic `Pong` replies)
//! and every concurrent request-sending call need to write frames, and
//! `tokio-tungstenite`'s `SplitSink` is not itself shareable: with no
//! external guarantee of a single writer at a time, an internal write
//! mutex is required.

use std::sync::Arc;

use futures_util::stream::SplitSink;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
pub type WsSink = Arc<Mutex<SplitSink<WsStream, Message>>>;
