//! Distance-provider trait and the matrix cell type.

use std::slice;
use std::sync::Arc;

use crate::Location;

/// Distance and travel time for one origin/destination pair.
///
/// Both fields are non-negative and finite, except for
/// [`Leg::UNREACHABLE`], which marks a pair involving an invalid point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Leg {
    /// Distance in kilometres.
    pub distance_km: f64,
    /// Travel time in minutes.
    pub duration_min: f64,
}

impl Leg {
    /// A zero-length leg.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Sentinel for pairs that cannot be routed.
    pub const UNREACHABLE: Self = Self::new(f64::INFINITY, f64::INFINITY);

    pub const fn new(distance_km: f64, duration_min: f64) -> Self {
        Self {
            distance_km,
            duration_min,
        }
    }

    /// Whether both components are usable, non-negative finite values.
    ///
    /// # Examples
    /// ```
    /// use foodroute_core::Leg;
    ///
    /// assert!(Leg::new(1.5, 4.5).is_reachable());
    /// assert!(!Leg::UNREACHABLE.is_reachable());
    /// ```
    pub fn is_reachable(&self) -> bool {
        self.distance_km.is_finite()
            && self.duration_min.is_finite()
            && self.distance_km >= 0.0
            && self.duration_min >= 0.0
    }
}

/// Matrix of legs: `matrix[i][j]` runs from `origins[i]` to `destinations[j]`.
pub type DistanceMatrix = Vec<Vec<Leg>>;

/// Answer "how far, and how long, from A to B" for sets of locations.
///
/// Implementations must return a matrix with `origins.len()` rows, each with
/// `destinations.len()` cells, and must not fail: pairs involving an invalid
/// location are [`Leg::UNREACHABLE`], everything else is a reachable leg.
/// Providers are configured once and shared read-only across threads.
///
/// # Examples
///
/// ```rust
/// use foodroute_core::{DistanceMatrix, DistanceProvider, Leg, Location};
///
/// struct UnitProvider;
///
/// impl DistanceProvider for UnitProvider {
///     fn get_matrix(&self, origins: &[Location], destinations: &[Location]) -> DistanceMatrix {
///         origins
///             .iter()
///             .map(|_| destinations.iter().map(|_| Leg::new(1.0, 3.0)).collect())
///             .collect()
///     }
/// }
///
/// let here = Location::new(0.0, 0.0);
/// let leg = UnitProvider.get_single(&here, &here);
/// assert_eq!(leg, Leg::new(1.0, 3.0));
/// ```
pub trait DistanceProvider: Send + Sync {
    /// Return the `origins × destinations` matrix of legs.
    fn get_matrix(&self, origins: &[Location], destinations: &[Location]) -> DistanceMatrix;

    /// Return the leg for a single pair.
    fn get_single(&self, origin: &Location, destination: &Location) -> Leg {
        self.get_matrix(slice::from_ref(origin), slice::from_ref(destination))
            .first()
            .and_then(|row| row.first())
            .copied()
            .unwrap_or(Leg::UNREACHABLE)
    }
}

impl<P: DistanceProvider + ?Sized> DistanceProvider for &P {
    fn get_matrix(&self, origins: &[Location], destinations: &[Location]) -> DistanceMatrix {
        (**self).get_matrix(origins, destinations)
    }
}

impl<P: DistanceProvider + ?Sized> DistanceProvider for Box<P> {
    fn get_matrix(&self, origins: &[Location], destinations: &[Location]) -> DistanceMatrix {
        (**self).get_matrix(origins, destinations)
    }
}

impl<P: DistanceProvider + ?Sized> DistanceProvider for Arc<P> {
    fn get_matrix(&self, origins: &[Location], destinations: &[Location]) -> DistanceMatrix {
        (**self).get_matrix(origins, destinations)
    }
}
