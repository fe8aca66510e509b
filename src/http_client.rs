//! HTTP control plane client (C3): thin JSON verb wrapper with the auth
//! header, status-class to error mapping, and a bounded whole-request
//! timeout. Grounded in `http_client.py`, translated from aiohttp's
//! `asyncio.timeout(20)` + manual status dispatch to `reqwest`'s per-request
//! timeout and `StatusCode` matching.

use reqwest::{Method, StatusCode};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{Error, HttpContext, Status};

pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    token: String,
    timeout: std::time::Duration,
}

impl HttpClient {
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: config.http_base_url(),
            token: config.token.clone(),
            timeout: config.http_timeout,
        }
    }

    /// # Errors
    /// See [`HttpClient::request`].
    pub async fn get(&self, path: &str) -> Result<Value, Error> {
        self.request(Method::GET, path, None).await
    }

    /// # Errors
    /// See [`HttpClient::request`].
    pub async fn post(&self, path: &str, payload: Option<Value>) -> Result<Value, Error> {
        self.request(Method::POST, path, payload).await
    }

    /// # Errors
    /// See [`HttpClient::request`].
    pub async fn put(&self, path: &str, payload: Option<Value>) -> Result<Value, Error> {
        self.request(Method::PUT, path, payload).await
    }

    /// # Errors
    /// See [`HttpClient::request`].
    pub async fn delete(&self, path: &str, payload: Option<Value>) -> Result<Value, Error> {
        self.request(Method::DELETE, path, payload).await
    }

    /// Every request carries `Accept: application/json` and `token: <opaque>`.
    /// Whole-request timeout is a hard 20 s upper bound (configurable via
    /// [`ClientConfig::http_timeout`]).
    ///
    /// # Errors
    /// - `400` -> [`Error::BadRequest`]
    /// - `401`/`403` -> [`Error::Authentication`]
    /// - any other non-2xx -> [`Error::ConnectionError`]
    /// - DNS/connect/timeout failures -> [`Error::ConnectionError`] with
    ///   [`Status::Timeout`] or [`Status::ConnectionError`]
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        payload: Option<Value>,
    ) -> Result<Value, Error> {
        let url = format!("{}{path}", self.base_url);
        let context = HttpContext::new(method.as_str(), url.clone());

        let mut builder = self
            .client
            .request(method, &url)
            .timeout(self.timeout)
            .header("Accept", "application/json")
            .header("token", &self.token);
        if let Some(payload) = &payload {
            builder = builder.json(payload);
        }

        let response = builder.send().await.map_err(|error| {
            let status = if error.is_timeout() {
                Status::Timeout
            } else {
                Status::ConnectionError
            };
            Error::connection_error(context.clone(), status)
        })?;

        let status = response.status();
        if status.is_success() {
            return Self::decode_body(response).await;
        }

        match status {
            StatusCode::BAD_REQUEST => Err(Error::bad_request(context, Status::Code(400))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Err(Error::authentication_http(context, Status::Code(status.as_u16())))
            }
            other => Err(Error::connection_error(context, Status::Code(other.as_u16()))),
        }
    }

    async fn decode_body(response: reqwest::Response) -> Result<Value, Error> {
        let is_json = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("application/json"));

        if is_json {
            response
                .json::<Value>()
                .await
                .map_err(|error| Error::bad_message(error.to_string()))
        } else {
            let text = response
                .text()
                .await
                .map_err(|error| Error::bad_message(error.to_string()))?;
            Ok(Value::String(text))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_test_utils::MockHttpServer;
    use bridge_test_utils::MockHttpServerConfig;
    use serde_json::json;

    fn config_for(base_url: &str) -> ClientConfig {
        let url = url::Url::parse(base_url).unwrap();
        ClientConfig::new(
            url.host_str().unwrap().to_owned(),
            url.port().unwrap(),
            "abc123",
        )
    }

    #[tokio::test]
    async fn get_returns_decoded_json_body() {
        let server = MockHttpServer::start(MockHttpServerConfig::default())
            .await
            .unwrap();
        let client = HttpClient::new(&config_for(&server.base_url()));
        let body = client.get("/test/json").await.unwrap();
        assert_eq!(body, json!({"test": "test"}));
    }

    #[tokio::test]
    async fn get_returns_raw_text_for_non_json_body() {
        let server = MockHttpServer::start(MockHttpServerConfig::default())
            .await
            .unwrap();
        let client = HttpClient::new(&config_for(&server.base_url()));
        let body = client.get("/test/text").await.unwrap();
        assert_eq!(body, Value::String("test".to_owned()));
    }

    #[tokio::test]
    async fn bad_request_status_maps_to_bad_request_error() {
        let server = MockHttpServer::start(MockHttpServerConfig::default())
            .await
            .unwrap();
        let client = HttpClient::new(&config_for(&server.base_url()));
        let error = client.get("/test/badrequest").await.unwrap_err();
        assert!(matches!(error, Error::BadRequest { .. }));
    }

    #[tokio::test]
    async fn unauthorised_status_maps_to_authentication_error() {
        let server = MockHttpServer::start(MockHttpServerConfig::default())
            .await
            .unwrap();
        let client = HttpClient::new(&config_for(&server.base_url()));
        let error = client.get("/test/unauthorised").await.unwrap_err();
        assert!(matches!(error, Error::Authentication { .. }));
    }

    #[tokio::test]
    async fn not_found_status_maps_to_connection_error() {
        let server = MockHttpServer::start(MockHttpServerConfig::default())
            .await
            .unwrap();
        let client = HttpClient::new(&config_for(&server.base_url()));
        let error = client.get("/api/data/system").await.unwrap_err();
        match error {
            Error::ConnectionError { status, .. } => assert_eq!(status, Status::Code(404)),
            other => panic!("expected ConnectionError, got {other:?}"),
        }
    }
}
