//! Routes through locations.
//!
//! A [`Route`] always starts at the travelling party's position. A
//! [`RouteResult`] pairs it with accumulated distance and travel time, and a
//! [`RouteSummary`] is the display-ready form handed to user-facing layers.

use std::iter;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{Leg, Location};

/// An ordered visiting sequence starting at an origin.
///
/// # Examples
/// ```
/// use foodroute_core::{Location, Route};
///
/// let route = Route::new(Location::new(0.0, 0.0));
/// assert_eq!(route.len(), 1);
/// assert_eq!(route.visit_count(), 0);
/// assert_eq!(route.last(), route.origin());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    origin: Location,
    visits: Vec<Location>,
}

impl Route {
    /// Construct a route containing only its origin.
    pub fn new(origin: Location) -> Self {
        Self {
            origin,
            visits: Vec::new(),
        }
    }

    /// Starting point of the route.
    pub fn origin(&self) -> &Location {
        &self.origin
    }

    /// Locations visited after the origin, in order.
    pub fn visits(&self) -> &[Location] {
        &self.visits
    }

    /// The final location, which is the origin for a degenerate route.
    pub fn last(&self) -> &Location {
        self.visits.last().unwrap_or(&self.origin)
    }

    /// Number of locations including the origin.
    pub fn len(&self) -> usize {
        self.visits.len() + 1
    }

    /// Routes always hold their origin, so they are never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Number of stops after the origin.
    pub fn visit_count(&self) -> usize {
        self.visits.len()
    }

    /// Iterate over every location, origin first.
    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        iter::once(&self.origin).chain(self.visits.iter())
    }

    /// Consume the route into a flat list, origin first.
    pub fn into_locations(self) -> Vec<Location> {
        iter::once(self.origin).chain(self.visits).collect()
    }

    fn push(&mut self, location: Location) {
        self.visits.push(location);
    }
}

/// Output of a routing computation.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteResult {
    /// The planned visiting order.
    pub route: Route,
    /// Sum of leg distances in kilometres.
    pub total_distance_km: f64,
    /// Sum of leg travel times in minutes, excluding dwell time.
    pub total_duration_min: f64,
}

impl RouteResult {
    /// A route holding only `origin`, with zero totals.
    pub fn degenerate(origin: Location) -> Self {
        Self {
            route: Route::new(origin),
            total_distance_km: 0.0,
            total_duration_min: 0.0,
        }
    }

    /// A route from `origin` straight to `destination` over an already
    /// measured `leg`.
    ///
    /// # Examples
    /// ```
    /// use foodroute_core::{Leg, Location, RouteResult};
    ///
    /// let result = RouteResult::direct(
    ///     Location::new(0.0, 0.0),
    ///     Location::new(0.0, 0.1),
    ///     Leg::new(11.1, 33.3),
    /// );
    /// assert_eq!(result.route.visit_count(), 1);
    /// assert_eq!(result.total_distance_km, 11.1);
    /// ```
    pub fn direct(origin: Location, destination: Location, leg: Leg) -> Self {
        let mut result = Self::degenerate(origin);
        result.extend(destination, leg);
        result
    }

    /// Append `location`, reached over `leg`.
    pub(crate) fn extend(&mut self, location: Location, leg: Leg) {
        self.route.push(location);
        self.total_distance_km += leg.distance_km;
        self.total_duration_min += leg.duration_min;
    }
}

/// Display-ready route with rounded totals and dwell-inclusive ETA.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RouteSummary {
    /// Map records, origin first.
    pub route: Vec<Location>,
    /// Total distance rounded to two decimals.
    pub total_distance_km: f64,
    /// Travel time plus per-stop dwell time, in whole minutes.
    pub estimated_time_minutes: u32,
    /// Stops processed after the origin.
    pub stop_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extend_accumulates_totals() {
        let mut result = RouteResult::degenerate(Location::new(0.0, 0.0));
        result.extend(Location::new(0.0, 1.0), Leg::new(2.0, 6.0));
        result.extend(Location::new(0.0, 2.0), Leg::new(1.5, 4.5));
        assert_eq!(result.route.len(), 3);
        assert_eq!(result.total_distance_km, 3.5);
        assert_eq!(result.total_duration_min, 10.5);
        assert_eq!(result.route.last(), &Location::new(0.0, 2.0));
    }

    #[test]
    fn direct_route_uses_the_given_leg() {
        let origin = Location::new(0.0, 0.0).with_id(1);
        let camp = Location::new(0.0, 5.0).with_id(2);
        let result = RouteResult::direct(origin.clone(), camp.clone(), Leg::new(4.0, 9.0));
        assert_eq!(result.route.origin(), &origin);
        assert_eq!(result.route.visits(), [camp]);
        assert_eq!(result.total_distance_km, 4.0);
        assert_eq!(result.total_duration_min, 9.0);
    }

    #[test]
    fn into_locations_keeps_origin_first() {
        let mut result = RouteResult::degenerate(Location::new(0.0, 0.0).with_id(0));
        result.extend(Location::new(0.0, 1.0).with_id(1), Leg::ZERO);
        let ids: Vec<_> = result
            .route
            .into_locations()
            .iter()
            .map(Location::id)
            .collect();
        assert_eq!(ids, vec![Some(0), Some(1)]);
    }
}
