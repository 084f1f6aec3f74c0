//! HTTP client for the Google Distance Matrix API.
//!
//! [`MatrixClient`] is the seam between the chunking logic in
//! [`super::RoadDistanceProvider`] and the network. [`HttpMatrixClient`] is
//! the production implementation; tests substitute
//! [`super::test_support::StubMatrixClient`].
//!
//! # Runtime behaviour
//!
//! [`foodroute_core::DistanceProvider`] is synchronous so that routing can be
//! embedded in synchronous callers. The client bridges to async `reqwest` by
//! blocking on a Tokio runtime it owns. When called from within an existing
//! multi-threaded Tokio runtime it uses that runtime's handle with
//! [`tokio::task::block_in_place`] instead. Inside a `current_thread` runtime
//! the request runs on a scoped worker thread that blocks on the owned
//! runtime, since that thread has no runtime context of its own. The caller's
//! runtime is blocked until the request completes.

use std::fmt;
use std::time::Duration;

use foodroute_core::Leg;
use geo::Coord;
use log::debug;
use reqwest::Client;
use tokio::runtime::{Handle, Runtime, RuntimeFlavor};
use url::Url;

use super::error::{DistanceServiceError, ProviderBuildError};
use super::google::MatrixResponse;

/// Default endpoint of the Google Distance Matrix JSON API.
pub const DEFAULT_SERVICE_URL: &str = "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Default user agent for distance service requests.
pub const DEFAULT_USER_AGENT: &str = "foodroute/0.1";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// Service output for one request.
///
/// `matrix[i][j]` is the leg from the i-th origin to the j-th destination, or
/// `None` when the service could not route that pair.
pub type ServiceMatrix = Vec<Vec<Option<Leg>>>;

/// Source of road distances for a block of coordinate pairs.
///
/// Coordinates use `x = longitude`, `y = latitude` and are always valid
/// WGS84 points. Implementations return one row per origin and one cell per
/// destination; callers verify the shape before use.
pub trait MatrixClient: Send + Sync {
    /// Fetch legs for every origin/destination pair.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceServiceError`] when the request as a whole fails.
    fn fetch_matrix(
        &self,
        origins: &[Coord<f64>],
        destinations: &[Coord<f64>],
    ) -> Result<ServiceMatrix, DistanceServiceError>;
}

impl<C: MatrixClient + ?Sized> MatrixClient for &C {
    fn fetch_matrix(
        &self,
        origins: &[Coord<f64>],
        destinations: &[Coord<f64>],
    ) -> Result<ServiceMatrix, DistanceServiceError> {
        (**self).fetch_matrix(origins, destinations)
    }
}

/// Configuration for [`HttpMatrixClient`].
#[derive(Clone)]
pub struct HttpMatrixClientConfig {
    /// Endpoint URL, without query parameters.
    pub base_url: String,
    /// API key sent as the `key` query parameter.
    pub api_key: String,
    /// Request timeout duration.
    pub timeout: Duration,
    /// User agent string for requests.
    pub user_agent: String,
}

impl fmt::Debug for HttpMatrixClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpMatrixClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl HttpMatrixClientConfig {
    /// Create a configuration for the default endpoint with the given key.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_SERVICE_URL.to_owned(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }

    /// Point the client at a different compatible endpoint.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Set the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// Blocking Distance Matrix client.
///
/// Owns a `reqwest` client and a current-thread Tokio runtime, both reused
/// across calls. Requests use driving mode with `departure_time=now` so that
/// the service reports traffic-aware durations. There are no retries.
///
/// Dropping the client shuts its runtime down in the background, so a client
/// may be dropped from inside async code.
pub struct HttpMatrixClient {
    client: Client,
    config: HttpMatrixClientConfig,
    endpoint: Url,
    // Always `Some` until dropped.
    runtime: Option<Runtime>,
}

impl Drop for HttpMatrixClient {
    fn drop(&mut self) {
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

impl fmt::Debug for HttpMatrixClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpMatrixClient")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("runtime", &"<tokio::runtime::Runtime>")
            .finish_non_exhaustive()
    }
}

impl HttpMatrixClient {
    /// Create a client for the default endpoint.
    ///
    /// # Errors
    ///
    /// See [`HttpMatrixClient::with_config`].
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Self::with_config(HttpMatrixClientConfig::new(api_key))
    }

    /// Create a client with explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the API key is blank, the base URL is not an
    /// HTTP(S) URL, or the HTTP client or Tokio runtime fails to build.
    pub fn with_config(config: HttpMatrixClientConfig) -> Result<Self, ProviderBuildError> {
        if config.api_key.trim().is_empty() {
            return Err(ProviderBuildError::MissingCredential);
        }
        let endpoint = parse_endpoint(&config.base_url)?;
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(ProviderBuildError::Runtime)?;
        Ok(Self {
            client,
            config,
            endpoint,
            runtime: Some(runtime),
        })
    }

    /// Configuration this client was built with.
    pub fn config(&self) -> &HttpMatrixClientConfig {
        &self.config
    }

    /// Build the request URL for the given coordinates.
    ///
    /// Points are encoded as `lat,lon` and separated by `|`.
    fn build_request_url(&self, origins: &[Coord<f64>], destinations: &[Coord<f64>]) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("origins", &join_points(origins))
            .append_pair("destinations", &join_points(destinations))
            .append_pair("key", &self.config.api_key)
            .append_pair("mode", "driving")
            .append_pair("departure_time", "now")
            .append_pair("units", "metric");
        url
    }

    async fn fetch_matrix_async(
        &self,
        origins: &[Coord<f64>],
        destinations: &[Coord<f64>],
    ) -> Result<ServiceMatrix, DistanceServiceError> {
        let url = self.build_request_url(origins, destinations);
        debug!(
            "requesting {}x{} distance matrix from {}",
            origins.len(),
            destinations.len(),
            self.endpoint
        );

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(err))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(err))?;

        let body: MatrixResponse =
            response
                .json()
                .await
                .map_err(|err| DistanceServiceError::Parse {
                    message: err.without_url().to_string(),
                })?;

        convert_response(body)
    }

    /// Convert a reqwest error, stripping the URL so the key is never logged.
    fn convert_reqwest_error(&self, error: reqwest::Error) -> DistanceServiceError {
        let endpoint = self.endpoint.to_string();
        if error.is_timeout() {
            return DistanceServiceError::Timeout {
                endpoint,
                timeout: self.config.timeout,
            };
        }

        let status = error.status();
        let message = error.without_url().to_string();
        match status {
            Some(status) => DistanceServiceError::Http {
                endpoint,
                status: status.as_u16(),
                message,
            },
            None => DistanceServiceError::Network { endpoint, message },
        }
    }
}

impl MatrixClient for HttpMatrixClient {
    fn fetch_matrix(
        &self,
        origins: &[Coord<f64>],
        destinations: &[Coord<f64>],
    ) -> Result<ServiceMatrix, DistanceServiceError> {
        if origins.is_empty() || destinations.is_empty() {
            return Ok(vec![Vec::new(); origins.len()]);
        }

        match Handle::try_current() {
            Ok(handle) if handle.runtime_flavor() == RuntimeFlavor::MultiThread => {
                tokio::task::block_in_place(|| {
                    handle.block_on(self.fetch_matrix_async(origins, destinations))
                })
            }
            // Blocking on any runtime from this thread would panic.
            Ok(_) => self.fetch_matrix_on_worker(origins, destinations),
            Err(_) => self.fetch_matrix_owned(origins, destinations),
        }
    }
}

impl HttpMatrixClient {
    /// Block on the owned runtime. Must not run inside a runtime context.
    fn fetch_matrix_owned(
        &self,
        origins: &[Coord<f64>],
        destinations: &[Coord<f64>],
    ) -> Result<ServiceMatrix, DistanceServiceError> {
        match &self.runtime {
            Some(runtime) => runtime.block_on(self.fetch_matrix_async(origins, destinations)),
            None => Err(DistanceServiceError::Network {
                endpoint: self.endpoint.to_string(),
                message: "client runtime has shut down".to_owned(),
            }),
        }
    }

    /// Run a request on a scoped thread outside the caller's runtime.
    fn fetch_matrix_on_worker(
        &self,
        origins: &[Coord<f64>],
        destinations: &[Coord<f64>],
    ) -> Result<ServiceMatrix, DistanceServiceError> {
        std::thread::scope(|scope| {
            scope
                .spawn(|| self.fetch_matrix_owned(origins, destinations))
                .join()
                .unwrap_or_else(|_| {
                    Err(DistanceServiceError::Network {
                        endpoint: self.endpoint.to_string(),
                        message: "request worker thread panicked".to_owned(),
                    })
                })
        })
    }
}

fn parse_endpoint(base_url: &str) -> Result<Url, ProviderBuildError> {
    let invalid = |message: String| ProviderBuildError::InvalidUrl {
        url: base_url.to_owned(),
        message,
    };
    let mut url = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

fn join_points(points: &[Coord<f64>]) -> String {
    points
        .iter()
        .map(|point| format!("{},{}", point.y, point.x))
        .collect::<Vec<_>>()
        .join("|")
}

/// Convert a decoded response into a [`ServiceMatrix`].
fn convert_response(response: MatrixResponse) -> Result<ServiceMatrix, DistanceServiceError> {
    if !response.is_ok() {
        return Err(DistanceServiceError::Service {
            status: response.status,
            message: response.error_message.unwrap_or_default(),
        });
    }

    Ok(response
        .rows
        .into_iter()
        .map(|row| row.elements.iter().map(|element| element.leg()).collect())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn client() -> HttpMatrixClient {
        HttpMatrixClient::with_config(
            HttpMatrixClientConfig::new("test-key").with_base_url("https://maps.example.com/json"),
        )
        .expect("client should build")
    }

    fn query_value(url: &Url, name: &str) -> Option<String> {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    }

    #[rstest]
    fn request_url_carries_points_and_options(client: HttpMatrixClient) {
        let origins = [Coord { x: 77.59, y: 12.97 }];
        let destinations = [Coord { x: 77.6, y: 13.0 }, Coord { x: 77.7, y: 13.1 }];

        let url = client.build_request_url(&origins, &destinations);

        assert_eq!(url.host_str(), Some("maps.example.com"));
        assert_eq!(url.path(), "/json");
        assert_eq!(query_value(&url, "origins").as_deref(), Some("12.97,77.59"));
        assert_eq!(
            query_value(&url, "destinations").as_deref(),
            Some("13,77.6|13.1,77.7")
        );
        assert_eq!(query_value(&url, "key").as_deref(), Some("test-key"));
        assert_eq!(query_value(&url, "mode").as_deref(), Some("driving"));
        assert_eq!(query_value(&url, "departure_time").as_deref(), Some("now"));
        assert_eq!(query_value(&url, "units").as_deref(), Some("metric"));
    }

    #[rstest]
    fn base_url_query_is_discarded(client: HttpMatrixClient) {
        let config = client
            .config()
            .clone()
            .with_base_url("https://maps.example.com/json?key=stale");
        let rebuilt = HttpMatrixClient::with_config(config).expect("client should build");
        let url = rebuilt.build_request_url(&[Coord { x: 0.0, y: 0.0 }], &[Coord { x: 1.0, y: 1.0 }]);
        assert_eq!(url.query_pairs().filter(|(key, _)| key == "key").count(), 1);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    fn blank_key_is_rejected(#[case] key: &str) {
        let err = HttpMatrixClient::new(key).expect_err("blank key should fail");
        assert!(matches!(err, ProviderBuildError::MissingCredential));
    }

    #[rstest]
    #[case("not a url")]
    #[case("ftp://maps.example.com/json")]
    fn unusable_base_url_is_rejected(#[case] base_url: &str) {
        let config = HttpMatrixClientConfig::new("key").with_base_url(base_url);
        let err = HttpMatrixClient::with_config(config).expect_err("bad URL should fail");
        assert!(matches!(err, ProviderBuildError::InvalidUrl { .. }));
    }

    #[rstest]
    fn debug_output_redacts_key(client: HttpMatrixClient) {
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("test-key"));
        assert!(rendered.contains("<redacted>"));
    }

    #[rstest]
    fn convert_response_maps_elements() {
        let response: MatrixResponse = serde_json::from_str(
            r#"{
                "status": "OK",
                "rows": [{"elements": [
                    {"status": "OK", "distance": {"value": 1500}, "duration": {"value": 300}},
                    {"status": "ZERO_RESULTS"}
                ]}]
            }"#,
        )
        .expect("should deserialise");

        let matrix = convert_response(response).expect("should convert");

        assert_eq!(matrix.len(), 1);
        assert_eq!(matrix[0][0], Some(Leg::new(1.5, 5.0)));
        assert_eq!(matrix[0][1], None);
    }

    #[rstest]
    fn convert_response_handles_service_error() {
        let response: MatrixResponse = serde_json::from_str(
            r#"{"status": "OVER_QUERY_LIMIT", "error_message": "Quota exceeded", "rows": []}"#,
        )
        .expect("should deserialise");

        let err = convert_response(response).expect_err("should fail");

        match err {
            DistanceServiceError::Service { status, message } => {
                assert_eq!(status, "OVER_QUERY_LIMIT");
                assert_eq!(message, "Quota exceeded");
            }
            other => panic!("expected Service error, got {other:?}"),
        }
    }

    #[rstest]
    fn unreachable_service_reports_network_error() {
        let config = HttpMatrixClientConfig::new("key")
            .with_base_url("http://127.0.0.1:9/json")
            .with_timeout(Duration::from_secs(2));
        let client = HttpMatrixClient::with_config(config).expect("client should build");

        let err = client
            .fetch_matrix(&[Coord { x: 0.0, y: 0.0 }], &[Coord { x: 1.0, y: 1.0 }])
            .expect_err("nothing listens on the discard port");

        assert!(matches!(
            err,
            DistanceServiceError::Network { .. } | DistanceServiceError::Timeout { .. }
        ));
        assert!(!err.to_string().contains("key="));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn current_thread_runtime_reports_error_instead_of_panicking() {
        let config = HttpMatrixClientConfig::new("key")
            .with_base_url("http://127.0.0.1:9/json")
            .with_timeout(Duration::from_secs(2));
        let client = HttpMatrixClient::with_config(config).expect("client should build");

        let err = client
            .fetch_matrix(&[Coord { x: 0.0, y: 0.0 }], &[Coord { x: 1.0, y: 1.0 }])
            .expect_err("nothing listens on the discard port");

        assert!(matches!(
            err,
            DistanceServiceError::Network { .. } | DistanceServiceError::Timeout { .. }
        ));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn multi_thread_runtime_reports_error() {
        let config = HttpMatrixClientConfig::new("key")
            .with_base_url("http://127.0.0.1:9/json")
            .with_timeout(Duration::from_secs(2));
        let client = HttpMatrixClient::with_config(config).expect("client should build");

        let result =
            client.fetch_matrix(&[Coord { x: 0.0, y: 0.0 }], &[Coord { x: 1.0, y: 1.0 }]);

        assert!(result.is_err());
    }

    #[rstest]
    fn config_builder_pattern() {
        let config = HttpMatrixClientConfig::new("k")
            .with_base_url("http://localhost:8080/matrix")
            .with_timeout(Duration::from_secs(60))
            .with_user_agent("test-agent/1.0");

        assert_eq!(config.base_url, "http://localhost:8080/matrix");
        assert_eq!(config.timeout, Duration::from_secs(60));
        assert_eq!(config.user_agent, "test-agent/1.0");
    }
}
