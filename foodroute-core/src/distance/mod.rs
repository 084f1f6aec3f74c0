//! Distance and travel-time lookups between locations.
//!
//! The [`DistanceProvider`] trait abstracts where distances come from. Callers
//! supply origin and destination slices and receive a [`DistanceMatrix`] of
//! [`Leg`] values in kilometres and minutes.
//!
//! Providers never fail: pairs involving an invalid [`Location`](crate::Location)
//! yield [`Leg::UNREACHABLE`], and any other trouble is resolved inside the
//! provider by substituting an estimate.

mod geodesic;
mod provider;

pub use geodesic::{DEFAULT_SPEED_KMH, GeodesicProvider};
pub use provider::{DistanceMatrix, DistanceProvider, Leg};
