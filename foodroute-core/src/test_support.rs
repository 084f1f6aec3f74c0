//! Deterministic distance providers for unit, behaviour and property tests.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::{DistanceMatrix, DistanceProvider, Leg, Location};

/// Provider treating degrees as a flat plane: one degree is one kilometre.
///
/// Travel time uses the configured speed (60 km/h by default, so minutes
/// equal kilometres). The provider counts matrix requests so tests can
/// assert batching.
#[derive(Debug)]
pub struct PlanarDistanceProvider {
    speed_kmh: f64,
    calls: AtomicUsize,
}

impl Default for PlanarDistanceProvider {
    fn default() -> Self {
        Self::with_speed(60.0)
    }
}

impl PlanarDistanceProvider {
    /// Create a provider assuming `speed_kmh`.
    pub fn with_speed(speed_kmh: f64) -> Self {
        Self {
            speed_kmh,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of `get_matrix` calls served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Planar leg between two locations, unreachable for invalid points.
    pub fn leg(&self, origin: &Location, destination: &Location) -> Leg {
        match (origin.coordinates(), destination.coordinates()) {
            (Some(a), Some(b)) => {
                let distance_km = (a.x - b.x).hypot(a.y - b.y);
                Leg::new(distance_km, distance_km / self.speed_kmh * 60.0)
            }
            _ => Leg::UNREACHABLE,
        }
    }
}

impl DistanceProvider for PlanarDistanceProvider {
    fn get_matrix(&self, origins: &[Location], destinations: &[Location]) -> DistanceMatrix {
        self.calls.fetch_add(1, Ordering::Relaxed);
        origins
            .iter()
            .map(|o| destinations.iter().map(|d| self.leg(o, d)).collect())
            .collect()
    }
}

/// Provider whose every cell is [`Leg::UNREACHABLE`].
///
/// Stands in for a source that has nothing usable to say about any pair.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnreachableDistanceProvider;

impl DistanceProvider for UnreachableDistanceProvider {
    fn get_matrix(&self, origins: &[Location], destinations: &[Location]) -> DistanceMatrix {
        vec![vec![Leg::UNREACHABLE; destinations.len()]; origins.len()]
    }
}
