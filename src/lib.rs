//! Facade crate for the foodroute route planner.
//!
//! This crate re-exports the core routing types and exposes the external
//! road-distance service behind the `road-service` feature flag.

#![forbid(unsafe_code)]

pub use foodroute_core::{
    Category, DEFAULT_PER_STOP_MINUTES, DEFAULT_SPEED_KMH, DistanceMatrix, DistanceProvider,
    GeodesicProvider, Leg, Location, NearestMatch, OptimizerConfig, ParseCategoryError, Route,
    RouteOptimizer, RouteResult, RouteSummary, estimate_time, estimate_time_default,
    round_distance,
};

#[cfg(feature = "road-service")]
pub use foodroute_data::routing::{
    ConfiguredDistanceProvider, DistanceServiceError, DistanceStrategy, HttpMatrixClient,
    HttpMatrixClientConfig, MatrixClient, ProviderBuildError, RoadDistanceProvider,
    RoutingConfig,
};
