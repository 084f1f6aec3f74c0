//! Error types emitted by the foodroute CLI.
//!
//! Keep this error type reasonably small, as many CLI helpers return
//! `Result<_, CliError>` and the workspace enables `clippy::result_large_err`.

use std::sync::Arc;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors emitted by the foodroute CLI.
#[derive(Debug, Error)]
pub enum CliError {
    /// Provided arguments failed Clap validation.
    #[error(transparent)]
    ArgumentParsing(#[from] clap::Error),
    /// Configuration layering failed (files, env, CLI).
    #[error("failed to load configuration: {0}")]
    Configuration(#[from] Arc<ortho_config::OrthoError>),
    /// A required option is missing after configuration merging.
    #[error("missing {field} (pass it on the command line or set {env})")]
    MissingArgument {
        field: &'static str,
        env: &'static str,
    },
    /// The request timeout is not a usable number of seconds.
    #[error("--{field} must be a positive number of seconds, got {value}")]
    InvalidTimeout { field: &'static str, value: f64 },
    /// The request path does not exist on disk.
    #[error("request path {path:?} does not exist")]
    MissingRequestFile { path: Utf8PathBuf },
    /// The request path exists but is not a file.
    #[error("request path {path:?} exists but is not a file")]
    RequestPathNotFile { path: Utf8PathBuf },
    /// The request path could not be inspected due to an IO error.
    #[error("failed to inspect request path {path:?}: {source}")]
    InspectRequestPath {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Opening the request file failed.
    #[error("failed to open request at {path:?}: {source}")]
    OpenRequest {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Request JSON could not be decoded.
    #[error("failed to parse request JSON at {path:?}: {source}")]
    ParseRequest {
        path: Utf8PathBuf,
        #[source]
        source: serde_json::Error,
    },
    /// The origin cannot take part in routing.
    #[error("origin location is missing valid coordinates")]
    InvalidOrigin,
    /// A pickup request had nothing to visit.
    #[error("no valid pickup locations")]
    NoValidStops,
    /// A delivery request had no camp with usable coordinates.
    #[error("no valid delivery location")]
    NoValidDestination,
    /// Serialising the route response failed.
    #[error("failed to serialise route response: {0}")]
    SerialiseResponse(#[source] serde_json::Error),
    /// Writing the route output failed.
    #[error("failed to write route output: {0}")]
    WriteOutput(#[source] std::io::Error),
}
