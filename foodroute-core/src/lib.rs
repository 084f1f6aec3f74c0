//! Core routing types for the foodroute engine.
//!
//! Given a volunteer's position, a set of pickup stops and an optional
//! delivery destination, this crate orders the stops with a greedy
//! nearest-neighbour heuristic and reports distance and travel time.
//!
//! Distances come from a [`DistanceProvider`]. [`GeodesicProvider`] computes
//! them locally on the WGS84 ellipsoid; other providers (such as a road
//! distance service) plug in through the same trait.

#![forbid(unsafe_code)]

pub mod distance;
mod eta;
mod location;
mod optimizer;
mod route;

#[doc(hidden)]
pub mod test_support;

pub use distance::{
    DEFAULT_SPEED_KMH, DistanceMatrix, DistanceProvider, GeodesicProvider, Leg,
};
pub use eta::{DEFAULT_PER_STOP_MINUTES, estimate_time, estimate_time_default, round_distance};
pub use location::{Category, Location, ParseCategoryError};
pub use optimizer::{NearestMatch, OptimizerConfig, RouteOptimizer};
pub use route::{Route, RouteResult, RouteSummary};
