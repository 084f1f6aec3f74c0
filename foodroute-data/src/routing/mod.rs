//! Road-distance providers backed by an external distance-matrix service.
//!
//! This module provides [`RoadDistanceProvider`], an implementation of
//! [`foodroute_core::DistanceProvider`] that asks a Google Distance
//! Matrix-compatible HTTP service for driving distances and durations, and
//! [`ConfiguredDistanceProvider`], which picks between that provider and the
//! geodesic estimate from a [`RoutingConfig`].
//!
//! # Architecture
//!
//! The HTTP exchange lives behind the [`MatrixClient`] trait. The provider
//! splits each matrix request into chunks that respect the service limits,
//! sends them through the client and stitches the answers together. A chunk
//! that fails is filled from geodesic estimates; a single unroutable pair is
//! filled the same way. Callers therefore always receive a complete matrix.
//!
//! # Example
//!
//! ```no_run
//! use foodroute_core::{DistanceProvider, Location};
//! use foodroute_data::routing::{DistanceStrategy, RoutingConfig};
//!
//! let config = RoutingConfig::default()
//!     .with_strategy(DistanceStrategy::ExternalService)
//!     .with_api_key("secret");
//! let provider = config.build_provider();
//!
//! let depot = Location::new(12.97, 77.59);
//! let camp = Location::new(13.03, 77.62);
//! let leg = provider.get_single(&depot, &camp);
//! println!("{:.2} km, {:.0} min", leg.distance_km, leg.duration_min);
//! ```

mod client;
mod config;
mod error;
mod google;
mod provider;

#[doc(hidden)]
pub mod test_support;

pub use client::{
    DEFAULT_SERVICE_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT, HttpMatrixClient,
    HttpMatrixClientConfig, MatrixClient, ServiceMatrix,
};
pub use config::{ConfiguredDistanceProvider, DistanceStrategy, ParseStrategyError, RoutingConfig};
pub use error::{DistanceServiceError, ProviderBuildError};
pub use provider::{ChunkLimits, RoadDistanceProvider};
