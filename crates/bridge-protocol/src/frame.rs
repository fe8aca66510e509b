//! Request/response frame shapes and the pure encode/decode pair (C1).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::event::{EventSubType, EventType};

/// Outbound frame. Field order is irrelevant on the wire; `serde_json`
/// serializes struct fields in declaration order, which matches §3/§6.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub token: String,
    pub id: String,
    pub event: EventType,
    pub data: Value,
}

impl Request {
    #[must_use]
    pub fn new(token: impl Into<String>, id: impl Into<String>, event: EventType, data: Value) -> Self {
        Self {
            token: token.into(),
            id: id.into(),
            event,
            data,
        }
    }
}

/// Inbound frame. `id` is absent/opaque for unsolicited server pushes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub event_type: EventType,
    #[serde(default)]
    pub subtype: Option<EventSubType>,
    #[serde(default)]
    pub module: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "default_data")]
    pub data: Value,
}

fn default_data() -> Value {
    Value::Null
}

impl Response {
    /// Build the locally-synthesized acknowledgement returned for
    /// fire-and-forget sends (§4.7): `type="N/A"`, no correlator entry ever
    /// created for it.
    #[must_use]
    pub fn fire_and_forget_ack(id: String) -> Self {
        Self {
            id: Some(id),
            event_type: EventType::NotApplicable,
            subtype: None,
            module: None,
            message: Some("Message sent".to_owned()),
            data: Value::Object(serde_json::Map::new()),
        }
    }

    /// Build the synthetic timeout response returned when a correlated
    /// request's deadline elapses (§4.7, §7): never a raised error, always a
    /// normal response the caller can inspect.
    #[must_use]
    pub fn timeout(id: String) -> Self {
        Self {
            id: Some(id),
            event_type: EventType::Error,
            subtype: Some(EventSubType::Timeout),
            module: None,
            message: Some("Timed out waiting for response".to_owned()),
            data: Value::Null,
        }
    }

    #[must_use]
    pub fn is_authentication_error(&self) -> bool {
        self.event_type == EventType::Error
            && self.subtype.as_ref().is_some_and(EventSubType::is_bad_token)
    }
}

/// `encode(request) -> UTF-8 JSON bytes`.
///
/// # Errors
/// Returns an error if the request cannot be serialized (never happens for
/// well-formed `Value` payloads, but `data` is caller-supplied).
pub fn encode(request: &Request) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(request)
}

/// `decode(bytes) -> Response`.
///
/// # Errors
/// Returns an error if `bytes` is not valid UTF-8 JSON or does not carry the
/// required `type` field. Callers on the listener path (C6) map this to
/// `BadMessage`.
pub fn decode(bytes: &[u8]) -> Result<Response, serde_json::Error> {
    serde_json::from_slice(bytes)
}
