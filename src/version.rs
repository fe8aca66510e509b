//! Version probe (C4): the only component with retry logic, grounded in
//! `version.py`. Tries the newer `/api/data/system` endpoint first and
//! falls back to the legacy `/information` endpoint on 404.

use semver::Version as SemVer;

use crate::config::ClientConfig;
use crate::error::{Error, Status};
use crate::http_client::HttpClient;

pub struct VersionProbe {
    http: HttpClient,
    supported_version: String,
}

impl VersionProbe {
    #[must_use]
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: HttpClient::new(config),
            supported_version: config.supported_version.clone(),
        }
    }

    /// True iff the detected version (from either endpoint) is `>=` the
    /// configured supported version (default `4.0.2`).
    ///
    /// Starts from the newer endpoint (`/api/data/system`) and only falls
    /// back to the legacy `/information` probe when it has nothing to say;
    /// the legacy probe can only ever confirm a `v2` backend, which is
    /// always unsupported.
    ///
    /// # Errors
    /// Propagates any non-404 failure from either HTTP call.
    pub async fn check_supported(&self) -> Result<bool, Error> {
        if let Some(version) = self.check_version().await? {
            return Ok(parse_loose(&version) >= parse_loose(&self.supported_version));
        }
        if self.check_version_2().await?.is_some() {
            return Ok(false);
        }
        Ok(false)
    }

    /// `GET /api/data/system`; returns the system's `version` field if it
    /// parses to `>= 3.0.0`. A `404` is treated as "endpoint not present"
    /// and returns `Ok(None)`, not an error.
    ///
    /// # Errors
    /// Propagates any non-404 HTTP failure.
    pub async fn check_version(&self) -> Result<Option<String>, Error> {
        let body = match self.http.get("/api/data/system").await {
            Ok(body) => body,
            Err(Error::ConnectionError {
                status: Status::Code(404),
                ..
            }) => return Ok(None),
            Err(error) => return Err(error),
        };

        let version = body
            .get("version")
            .and_then(|v| v.as_str())
            .map(str::to_owned);

        Ok(version.filter(|v| parse_loose(v) >= parse_loose("3.0.0")))
    }

    /// `GET /information`; returns the legacy `version` field if it starts
    /// with `"2"` or `"v2"`. A `404` is treated as "endpoint not present"
    /// and returns `Ok(None)`, not an error.
    ///
    /// # Errors
    /// Propagates any non-404 HTTP failure.
    pub async fn check_version_2(&self) -> Result<Option<String>, Error> {
        let body = match self.http.get("/information").await {
            Ok(body) => body,
            Err(Error::ConnectionError {
                status: Status::Code(404),
                ..
            }) => return Ok(None),
            Err(error) => return Err(error),
        };

        let version = body
            .get("version")
            .and_then(|v| v.as_str())
            .map(str::to_owned);

        Ok(version.filter(|v| v.starts_with('2') || v.starts_with("v2")))
    }
}

/// `semver` requires three numeric components; the backend sometimes sends
/// a bare `"4.0"` or `"2"`. Pad with zeros rather than failing the probe
/// over a lenient version string.
fn parse_loose(raw: &str) -> SemVer {
    let trimmed = raw.strip_prefix('v').unwrap_or(raw);
    let mut parts = trimmed.splitn(3, '.');
    let major = parts.next().unwrap_or("0").parse().unwrap_or(0);
    let minor = parts.next().unwrap_or("0").parse().unwrap_or(0);
    let patch = parts
        .next()
        .and_then(|p| p.split(|c: char| !c.is_ascii_digit()).next())
        .unwrap_or("0")
        .parse()
        .unwrap_or(0);
    SemVer::new(major, minor, patch)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_test_utils::{MockHttpServer, MockHttpServerConfig};

    fn config_for(base_url: &str) -> ClientConfig {
        let url = url::Url::parse(base_url).unwrap();
        ClientConfig::new(
            url.host_str().unwrap().to_owned(),
            url.port().unwrap(),
            "abc123",
        )
    }

    #[test]
    fn parse_loose_pads_missing_components() {
        assert_eq!(parse_loose("4"), SemVer::new(4, 0, 0));
        assert_eq!(parse_loose("v2"), SemVer::new(2, 0, 0));
        assert_eq!(parse_loose("4.0.2"), SemVer::new(4, 0, 2));
    }

    #[tokio::test]
    async fn supported_version_reports_true() {
        let server = MockHttpServer::start(MockHttpServerConfig::with_system_version("4.0.2"))
            .await
            .unwrap();
        let probe = VersionProbe::new(&config_for(&server.base_url()));
        assert!(probe.check_supported().await.unwrap());
    }

    #[tokio::test]
    async fn old_but_v3_version_is_not_supported() {
        let server = MockHttpServer::start(MockHttpServerConfig::with_system_version("3.0.0"))
            .await
            .unwrap();
        let probe = VersionProbe::new(&config_for(&server.base_url()));
        assert!(!probe.check_supported().await.unwrap());
    }

    #[tokio::test]
    async fn v2_server_is_detected_via_information_fallback() {
        let config = MockHttpServerConfig::default().with_information_version("2.0.0");
        let server = MockHttpServer::start(config).await.unwrap();
        let probe = VersionProbe::new(&config_for(&server.base_url()));

        assert!(!probe.check_supported().await.unwrap());
        assert_eq!(
            probe.check_version_2().await.unwrap(),
            Some("2.0.0".to_owned())
        );
    }

    #[tokio::test]
    async fn both_endpoints_missing_reports_unsupported_without_error() {
        let server = MockHttpServer::start(MockHttpServerConfig::default())
            .await
            .unwrap();
        let probe = VersionProbe::new(&config_for(&server.base_url()));
        assert!(!probe.check_supported().await.unwrap());
    }
}
