//! Local geodesic strategy: no network, no credentials.

use log::warn;

use super::provider::{DistanceMatrix, DistanceProvider, Leg};
use crate::Location;

/// Assumed average speed for urban mixed traffic, in km/h.
pub const DEFAULT_SPEED_KMH: f64 = 20.0;

const MINUTES_PER_HOUR: f64 = 60.0;

/// Distance provider computing WGS84 geodesic distances locally.
///
/// Travel time is estimated as `distance_km / speed_kmh * 60`.
///
/// # Examples
/// ```
/// use foodroute_core::{DistanceProvider, GeodesicProvider, Location};
///
/// let provider = GeodesicProvider::default();
/// let leg = provider.get_single(&Location::new(0.0, 0.0), &Location::new(0.0, 1.0));
/// assert!((leg.duration_min - leg.distance_km * 3.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodesicProvider {
    speed_kmh: f64,
}

impl Default for GeodesicProvider {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl GeodesicProvider {
    /// Construct a provider assuming the given average speed.
    ///
    /// A speed that is not a positive finite number is replaced by
    /// [`DEFAULT_SPEED_KMH`].
    pub fn new(speed_kmh: f64) -> Self {
        if speed_kmh.is_finite() && speed_kmh > 0.0 {
            Self { speed_kmh }
        } else {
            warn!("ignoring assumed speed {speed_kmh} km/h; using {DEFAULT_SPEED_KMH} km/h");
            Self::default()
        }
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    /// Travel time in minutes for `distance_km` at the assumed speed.
    pub fn duration_for(&self, distance_km: f64) -> f64 {
        distance_km / self.speed_kmh * MINUTES_PER_HOUR
    }

    /// Geodesic leg between two locations.
    pub fn leg(&self, origin: &Location, destination: &Location) -> Leg {
        let distance_km = origin.distance_to(destination);
        if distance_km.is_finite() {
            Leg::new(distance_km, self.duration_for(distance_km))
        } else {
            Leg::UNREACHABLE
        }
    }
}

impl DistanceProvider for GeodesicProvider {
    fn get_matrix(&self, origins: &[Location], destinations: &[Location]) -> DistanceMatrix {
        origins
            .iter()
            .map(|origin| {
                destinations
                    .iter()
                    .map(|destination| self.leg(origin, destination))
                    .collect()
            })
            .collect()
    }
}
