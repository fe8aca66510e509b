//! Error taxonomy (C9): six failure kinds surfaced to callers, each with a
//! structured payload rather than a plain message, following the
//! `thiserror`-based `SessionError`/`DbError` pattern rather than the
//! hand-rolled `Display` impls of the older `ConfigError`/`UplinkError`.

use std::fmt;

use bridge_protocol::EventSubType;

/// Method + URL of the HTTP call that failed, attached to `BadRequest` and
/// `ConnectionError`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HttpContext {
    pub method: String,
    pub url: String,
}

impl HttpContext {
    #[must_use]
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
        }
    }
}

/// The `status` half of an HTTP/transport failure's payload (§4.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Code(u16),
    Timeout,
    ConnectionError,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "{code}"),
            Self::Timeout => f.write_str("timeout"),
            Self::ConnectionError => f.write_str("connection error"),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    /// Bad token on a WebSocket frame, or HTTP 401/403. `context`/`status`
    /// are populated for an HTTP-origin failure, `subtype` for a WebSocket
    /// `ERROR` frame; exactly one origin is ever set.
    #[error("authentication failed: {}", Self::format_authentication(context, status, subtype))]
    Authentication {
        context: Option<HttpContext>,
        status: Option<Status>,
        subtype: Option<EventSubType>,
    },

    /// Server rejected the request with HTTP 400 or its wire equivalent.
    #[error("bad request: {method} {url} -> {status}", method = context.method, url = context.url)]
    BadRequest { context: HttpContext, status: Status },

    /// An inbound WebSocket frame could not be decoded (malformed JSON,
    /// unexpected binary frame).
    #[error("bad message: {0}")]
    BadMessage(String),

    /// Operation attempted on a closed or closing connection.
    #[error("connection closed: {0}")]
    ConnectionClosed(String),

    /// Transport-level failure: DNS, TCP, TLS, handshake, or timeout.
    #[error("connection error: {method} {url} -> {status}", method = context.method, url = context.url)]
    ConnectionError { context: HttpContext, status: Status },

    /// Composite `get_data` exceeded its deadline before every requested
    /// module arrived.
    #[error("data missing: timed out waiting for modules {missing:?}")]
    DataMissing { missing: Vec<String> },
}

impl Error {
    fn format_authentication(
        context: &Option<HttpContext>,
        status: &Option<Status>,
        subtype: &Option<EventSubType>,
    ) -> String {
        if let Some(context) = context {
            let status = status
                .as_ref()
                .map_or_else(String::new, std::string::ToString::to_string);
            format!("{} {} -> {status}", context.method, context.url)
        } else if let Some(subtype) = subtype {
            format!("websocket error subtype {subtype}")
        } else {
            "no further detail".to_owned()
        }
    }

    /// HTTP 401/403 from a control-plane request.
    #[must_use]
    pub fn authentication_http(context: HttpContext, status: Status) -> Self {
        Self::Authentication {
            context: Some(context),
            status: Some(status),
            subtype: None,
        }
    }

    /// `ERROR` WebSocket frame carrying a bad-token subtype.
    #[must_use]
    pub fn authentication_websocket(subtype: Option<EventSubType>) -> Self {
        Self::Authentication {
            context: None,
            status: None,
            subtype,
        }
    }

    #[must_use]
    pub fn bad_request(context: HttpContext, status: Status) -> Self {
        Self::BadRequest { context, status }
    }

    #[must_use]
    pub fn bad_message(message: impl Into<String>) -> Self {
        Self::BadMessage(message.into())
    }

    #[must_use]
    pub fn connection_closed(message: impl Into<String>) -> Self {
        Self::ConnectionClosed(message.into())
    }

    #[must_use]
    pub fn connection_error(context: HttpContext, status: Status) -> Self {
        Self::ConnectionError { context, status }
    }

    #[must_use]
    pub fn data_missing(missing: Vec<String>) -> Self {
        Self::DataMissing { missing }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authentication_http_message_includes_method_url_and_status() {
        let error = Error::authentication_http(
            HttpContext::new("GET", "http://host/api/data/system"),
            Status::Code(401),
        );
        let message = error.to_string();
        assert!(message.contains("GET"));
        assert!(message.contains("http://host/api/data/system"));
        assert!(message.contains("401"));
    }

    #[test]
    fn authentication_websocket_message_includes_subtype() {
        let error = Error::authentication_websocket(Some(EventSubType::BadToken));
        assert!(error.to_string().contains("BAD_TOKEN"));
    }

    #[test]
    fn bad_request_error_message_includes_method_url_and_status() {
        let error = Error::bad_request(
            HttpContext::new("GET", "http://host/api/data/system"),
            Status::Code(400),
        );
        let message = error.to_string();
        assert!(message.contains("GET"));
        assert!(message.contains("http://host/api/data/system"));
        assert!(message.contains("400"));
    }

    #[test]
    fn timeout_status_displays_as_label_not_number() {
        assert_eq!(Status::Timeout.to_string(), "timeout");
        assert_eq!(Status::ConnectionError.to_string(), "connection error");
    }
}
