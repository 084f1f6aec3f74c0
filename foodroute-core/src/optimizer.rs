//! Greedy nearest-neighbour route construction.
//!
//! [`RouteOptimizer`] orders pickup stops starting from an origin by always
//! travelling to the closest unvisited stop, optionally finishing at a fixed
//! destination. Each operation issues a single batched
//! [`DistanceProvider::get_matrix`] call; the greedy walk then runs over that
//! matrix in `O(n²)`.
//!
//! Ties are broken by input order, so results are deterministic for a given
//! provider. Stops without valid coordinates are dropped before routing.

use std::slice;

use log::{debug, warn};

use crate::eta::{DEFAULT_PER_STOP_MINUTES, dwell_minutes, round_distance, whole_minutes};
use crate::{
    DEFAULT_SPEED_KMH, DistanceMatrix, DistanceProvider, GeodesicProvider, Leg, Location,
    RouteResult, RouteSummary,
};

/// Configuration for [`RouteOptimizer`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OptimizerConfig {
    /// Dwell time added per stop by [`RouteOptimizer::summarize`].
    pub per_stop_minutes: u32,
    /// Speed for the geodesic estimate used when the provider returns an
    /// unusable leg between two valid points.
    pub fallback_speed_kmh: f64,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            per_stop_minutes: DEFAULT_PER_STOP_MINUTES,
            fallback_speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

/// Result of [`RouteOptimizer::find_nearest`].
#[derive(Debug, Clone, PartialEq)]
pub struct NearestMatch {
    /// The closest candidate.
    pub location: Location,
    /// Position of the candidate in the caller's slice.
    pub index: usize,
    /// Leg from the origin to the candidate.
    pub leg: Leg,
}

/// Nearest-neighbour route builder over a [`DistanceProvider`].
///
/// The optimizer holds no mutable state and may be shared across threads when
/// its provider can.
///
/// # Examples
/// ```
/// use foodroute_core::{GeodesicProvider, Location, RouteOptimizer};
///
/// let optimizer = RouteOptimizer::new(GeodesicProvider::default());
/// let origin = Location::new(0.0, 0.0);
/// let stops = [Location::new(0.0, 2.0).with_id(2), Location::new(0.0, 1.0).with_id(1)];
///
/// let result = optimizer.route_with_destination(&origin, &stops, &Location::new(0.0, 3.0));
/// let ids: Vec<_> = result.route.visits().iter().map(Location::id).collect();
/// assert_eq!(ids, vec![Some(1), Some(2), None]);
/// ```
#[derive(Debug, Clone)]
pub struct RouteOptimizer<P> {
    provider: P,
    fallback: GeodesicProvider,
    config: OptimizerConfig,
}

impl<P: DistanceProvider> RouteOptimizer<P> {
    /// Construct an optimizer using default configuration.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, OptimizerConfig::default())
    }

    /// Construct an optimizer with explicit configuration.
    pub fn with_config(provider: P, config: OptimizerConfig) -> Self {
        Self {
            provider,
            fallback: GeodesicProvider::new(config.fallback_speed_kmh),
            config,
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Order `stops` greedily starting from `origin`.
    ///
    /// Invalid stops are dropped. With no valid stop, or an invalid origin,
    /// the result is the degenerate route `[origin]` with zero totals.
    pub fn nearest_neighbor_route(&self, origin: &Location, stops: &[Location]) -> RouteResult {
        self.plan(origin, stops, None)
    }

    /// Order `stops` greedily, then finish at `destination`.
    ///
    /// With no valid stop the route is `[origin, destination]` over the
    /// direct leg. An invalid destination is left off the route.
    pub fn route_with_destination(
        &self,
        origin: &Location,
        stops: &[Location],
        destination: &Location,
    ) -> RouteResult {
        self.plan(origin, stops, Some(destination))
    }

    /// Find the candidate closest to `origin`.
    ///
    /// Returns `None` when the origin is invalid or no candidate has valid
    /// coordinates. Ties go to the earliest candidate.
    pub fn find_nearest(&self, origin: &Location, candidates: &[Location]) -> Option<NearestMatch> {
        if !origin.is_valid() {
            warn!("origin has no valid coordinates; no nearest candidate");
            return None;
        }
        let (indices, columns): (Vec<usize>, Vec<Location>) = candidates
            .iter()
            .enumerate()
            .filter(|(_, candidate)| candidate.is_valid())
            .map(|(index, candidate)| (index, candidate.clone()))
            .unzip();
        if columns.is_empty() {
            return None;
        }

        let rows = slice::from_ref(origin);
        let matrix = self.provider.get_matrix(rows, &columns);
        let legs = LegTable::new(&matrix, rows, &columns, &self.fallback);
        let (column, leg) = closest(&legs, 0, (0..columns.len()).map(|j| (j, true)))?;

        Some(NearestMatch {
            location: columns.get(column)?.clone(),
            index: *indices.get(column)?,
            leg,
        })
    }

    /// Round totals for display and add per-stop dwell time to the ETA.
    ///
    /// # Examples
    /// ```
    /// use foodroute_core::{GeodesicProvider, Location, RouteOptimizer};
    ///
    /// let optimizer = RouteOptimizer::new(GeodesicProvider::default());
    /// let result = optimizer.nearest_neighbor_route(&Location::new(0.0, 0.0), &[]);
    /// let summary = optimizer.summarize(&result);
    /// assert_eq!(summary.stop_count, 0);
    /// assert_eq!(summary.estimated_time_minutes, 0);
    /// ```
    pub fn summarize(&self, result: &RouteResult) -> RouteSummary {
        let stop_count = result.route.visit_count();
        let minutes = result.total_duration_min
            + dwell_minutes(stop_count, self.config.per_stop_minutes);
        RouteSummary {
            route: result.route.iter().cloned().collect(),
            total_distance_km: round_distance(result.total_distance_km),
            estimated_time_minutes: whole_minutes(minutes),
            stop_count,
        }
    }

    fn plan(
        &self,
        origin: &Location,
        stops: &[Location],
        destination: Option<&Location>,
    ) -> RouteResult {
        if !origin.is_valid() {
            warn!("origin has no valid coordinates; returning degenerate route");
            return RouteResult::degenerate(origin.clone());
        }

        let pickups: Vec<Location> = stops.iter().filter(|s| s.is_valid()).cloned().collect();
        if pickups.len() < stops.len() {
            debug!(
                "skipping {} stop(s) without valid coordinates",
                stops.len() - pickups.len()
            );
        }
        let destination = destination.filter(|d| {
            if !d.is_valid() {
                warn!("destination has no valid coordinates; leaving it off the route");
            }
            d.is_valid()
        });
        if pickups.is_empty() && destination.is_none() {
            return RouteResult::degenerate(origin.clone());
        }

        // Rows: origin then pickups. Columns: pickups then destination.
        let rows: Vec<Location> = std::iter::once(origin.clone())
            .chain(pickups.iter().cloned())
            .collect();
        let columns: Vec<Location> = pickups
            .iter()
            .cloned()
            .chain(destination.cloned())
            .collect();
        let matrix = self.provider.get_matrix(&rows, &columns);
        let legs = LegTable::new(&matrix, &rows, &columns, &self.fallback);

        let mut result = RouteResult::degenerate(origin.clone());
        let mut visited = vec![false; pickups.len()];
        let mut current_row = 0;
        while let Some((next, leg)) = closest(
            &legs,
            current_row,
            visited.iter().map(|seen| !seen).enumerate(),
        ) {
            let (Some(seen), Some(stop)) = (visited.get_mut(next), pickups.get(next)) else {
                break;
            };
            *seen = true;
            result.extend(stop.clone(), leg);
            current_row = next + 1;
        }

        if let Some(destination) = destination {
            let leg = legs.get(current_row, pickups.len());
            result.extend(destination.clone(), leg);
        }
        result
    }
}

/// Pick the open column with the strictly smallest distance from `row`.
///
/// `columns` yields `(column, open)` pairs in input order, so the first of
/// several equal distances wins.
fn closest(
    legs: &LegTable<'_>,
    row: usize,
    columns: impl Iterator<Item = (usize, bool)>,
) -> Option<(usize, Leg)> {
    let mut best: Option<(usize, Leg)> = None;
    for (column, open) in columns {
        if !open {
            continue;
        }
        let leg = legs.get(row, column);
        match best {
            Some((_, current)) if leg.distance_km >= current.distance_km => {}
            _ => best = Some((column, leg)),
        }
    }
    best
}

/// Matrix view substituting geodesic legs for missing or unusable cells.
struct LegTable<'a> {
    matrix: &'a DistanceMatrix,
    rows: &'a [Location],
    columns: &'a [Location],
    fallback: &'a GeodesicProvider,
}

impl<'a> LegTable<'a> {
    fn new(
        matrix: &'a DistanceMatrix,
        rows: &'a [Location],
        columns: &'a [Location],
        fallback: &'a GeodesicProvider,
    ) -> Self {
        if matrix.len() != rows.len() || matrix.iter().any(|row| row.len() != columns.len()) {
            warn!(
                "distance provider returned a malformed matrix; expected {}x{}",
                rows.len(),
                columns.len()
            );
        }
        Self {
            matrix,
            rows,
            columns,
            fallback,
        }
    }

    fn get(&self, row: usize, column: usize) -> Leg {
        let cell = self
            .matrix
            .get(row)
            .and_then(|cells| cells.get(column))
            .copied()
            .filter(Leg::is_reachable);
        if let Some(leg) = cell {
            return leg;
        }
        debug!("substituting geodesic estimate for leg {row}->{column}");
        match (self.rows.get(row), self.columns.get(column)) {
            (Some(from), Some(to)) => self.fallback.leg(from, to),
            _ => Leg::UNREACHABLE,
        }
    }
}
