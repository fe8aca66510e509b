//! Async client for the System Bridge local HTTP/WebSocket API.
//!
//! [`BridgeClient`] owns a single WebSocket connection and its listener task
//! (C5/C6/C7); [`VersionProbe`] and [`HttpClient`] cover the HTTP control
//! plane (C3/C4). Wire types live in the sibling [`bridge_protocol`] crate.

mod client;
mod config;
mod correlator;
mod error;
mod http_client;
mod listener;
mod transport;
mod version;

pub use bridge_protocol::{models, EventSubType, EventType, Response};
pub use client::BridgeClient;
pub use config::ClientConfig;
pub use error::{Error, HttpContext, Status};
pub use http_client::HttpClient;
pub use listener::PushUpdate;
pub use version::VersionProbe;
