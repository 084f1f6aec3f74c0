//! Error types for the road-distance service.
//!
//! [`DistanceServiceError`] covers a single failed request and never leaves
//! the provider. [`ProviderBuildError`] is returned when a provider cannot be
//! constructed at all.

use std::time::Duration;

use thiserror::Error;

/// Failure of a single request to the external distance service.
///
/// These errors stay inside [`super::RoadDistanceProvider`]: each one is
/// logged and the affected pairs are estimated geodesically instead.
/// Messages never include the API key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DistanceServiceError {
    /// The request did not complete within the configured timeout.
    #[error("request to {endpoint} timed out after {timeout:?}")]
    Timeout {
        /// Service endpoint without query parameters.
        endpoint: String,
        /// Timeout that elapsed.
        timeout: Duration,
    },
    /// The service answered with a non-success HTTP status.
    #[error("HTTP {status} from {endpoint}: {message}")]
    Http {
        /// Service endpoint without query parameters.
        endpoint: String,
        /// HTTP status code.
        status: u16,
        /// Description of the failure.
        message: String,
    },
    /// The service could not be reached.
    #[error("network error contacting {endpoint}: {message}")]
    Network {
        /// Service endpoint without query parameters.
        endpoint: String,
        /// Description of the failure.
        message: String,
    },
    /// The service answered with a non-`OK` top-level status.
    #[error("distance service returned {status}: {message}")]
    Service {
        /// Status string reported by the service.
        status: String,
        /// Optional explanation from the service.
        message: String,
    },
    /// The response body could not be decoded.
    #[error("failed to parse distance service response: {message}")]
    Parse {
        /// Description of the decoding failure.
        message: String,
    },
    /// The response does not cover the requested origins and destinations.
    #[error(
        "expected a {expected_rows}x{expected_columns} matrix, \
         got {rows} rows with {columns:?} columns"
    )]
    DimensionMismatch {
        /// Number of origins requested.
        expected_rows: usize,
        /// Number of destinations requested.
        expected_columns: usize,
        /// Number of rows returned.
        rows: usize,
        /// Length of every returned row.
        columns: Vec<usize>,
    },
}

/// Error raised while constructing a road-distance provider.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// Failed to build the HTTP client.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
    /// Failed to build the Tokio runtime.
    #[error("failed to build Tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
    /// No API key was supplied for the external service.
    #[error("the external distance service requires an API key")]
    MissingCredential,
    /// The configured base URL is not a usable HTTP(S) URL.
    #[error("invalid distance service URL '{url}': {message}")]
    InvalidUrl {
        /// Offending URL.
        url: String,
        /// Description of the failure.
        message: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn timeout_message_names_endpoint() {
        let err = DistanceServiceError::Timeout {
            endpoint: "https://maps.example.com/json".to_owned(),
            timeout: Duration::from_secs(5),
        };
        assert_eq!(
            err.to_string(),
            "request to https://maps.example.com/json timed out after 5s"
        );
    }

    #[rstest]
    fn dimension_mismatch_reports_shape() {
        let err = DistanceServiceError::DimensionMismatch {
            expected_rows: 2,
            expected_columns: 3,
            rows: 1,
            columns: vec![3],
        };
        assert!(err.to_string().contains("2x3"));
        assert!(err.to_string().contains("got 1 rows"));
    }

    #[rstest]
    fn build_errors_name_the_url() {
        let err = ProviderBuildError::InvalidUrl {
            url: "ftp://maps.example.com".to_owned(),
            message: "unsupported scheme 'ftp'".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "invalid distance service URL 'ftp://maps.example.com': unsupported scheme 'ftp'"
        );
    }

    #[rstest]
    fn missing_credential_is_user_readable() {
        assert_eq!(
            ProviderBuildError::MissingCredential.to_string(),
            "the external distance service requires an API key"
        );
    }
}
