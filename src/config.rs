//! Client configuration. No file or environment loading: this library has
//! no persisted state, unlike the `ForwarderConfig`/`RawConfig` TOML pair
//! it takes its shape from — this is a plain builder-style struct
//! constructed by the embedding application.

use std::time::Duration;

/// Connection and timeout settings for [`crate::client::BridgeClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_host: String,
    pub api_port: u16,
    pub token: String,
    pub heartbeat_interval: Duration,
    pub request_timeout: Duration,
    pub http_timeout: Duration,
    pub get_data_timeout: Duration,
    pub supported_version: String,
}

impl ClientConfig {
    #[must_use]
    pub fn new(api_host: impl Into<String>, api_port: u16, token: impl Into<String>) -> Self {
        Self {
            api_host: api_host.into(),
            api_port,
            token: token.into(),
            heartbeat_interval: Duration::from_secs(30),
            request_timeout: Duration::from_secs(8),
            http_timeout: Duration::from_secs(20),
            get_data_timeout: Duration::from_secs(10),
            supported_version: "4.0.2".to_owned(),
        }
    }

    #[must_use]
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_get_data_timeout(mut self, timeout: Duration) -> Self {
        self.get_data_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_supported_version(mut self, version: impl Into<String>) -> Self {
        self.supported_version = version.into();
        self
    }

    #[must_use]
    pub fn http_base_url(&self) -> String {
        format!("http://{}:{}", self.api_host, self.api_port)
    }

    #[must_use]
    pub fn websocket_url(&self) -> String {
        format!("ws://{}:{}/api/websocket", self.api_host, self.api_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_use_the_documented_timeouts() {
        let config = ClientConfig::new("127.0.0.1", 9170, "abc123");
        assert_eq!(config.heartbeat_interval, Duration::from_secs(30));
        assert_eq!(config.request_timeout, Duration::from_secs(8));
        assert_eq!(config.http_timeout, Duration::from_secs(20));
        assert_eq!(config.get_data_timeout, Duration::from_secs(10));
        assert_eq!(config.supported_version, "4.0.2");
    }

    #[test]
    fn builder_setters_override_defaults() {
        let config = ClientConfig::new("127.0.0.1", 9170, "abc123")
            .with_request_timeout(Duration::from_secs(1))
            .with_get_data_timeout(Duration::from_secs(2));
        assert_eq!(config.request_timeout, Duration::from_secs(1));
        assert_eq!(config.get_data_timeout, Duration::from_secs(2));
    }

    #[test]
    fn urls_are_built_from_host_and_port() {
        let config = ClientConfig::new("127.0.0.1", 9170, "abc123");
        assert_eq!(config.http_base_url(), "http://127.0.0.1:9170");
        assert_eq!(config.websocket_url(), "ws://127.0.0.1:9170/api/websocket");
    }
}
