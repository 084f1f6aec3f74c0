//! Data access for the foodroute workspace.
//!
//! Responsibilities:
//! - Talk to external road-distance services over HTTP.
//! - Decode their wire formats into [`foodroute_core::Leg`] matrices.
//! - Choose a distance strategy from runtime configuration.
//!
//! Boundaries:
//! - Do not encode routing rules (live in `foodroute-core`).
//! - Never surface service failures to routing callers; degrade to geodesic
//!   estimates instead.
//!
//! Invariants:
//! - Thread-safe by default where feasible.
//! - No global mutable state.

pub mod routing;

pub use routing::{
    ChunkLimits, ConfiguredDistanceProvider, DEFAULT_SERVICE_URL, DEFAULT_TIMEOUT,
    DEFAULT_USER_AGENT, DistanceServiceError, DistanceStrategy, HttpMatrixClient,
    HttpMatrixClientConfig, MatrixClient, ParseStrategyError, ProviderBuildError,
    RoadDistanceProvider, RoutingConfig, ServiceMatrix,
};
