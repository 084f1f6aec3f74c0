//! [`DistanceProvider`] backed by an external road-distance service.
//!
//! The provider never fails. Invalid locations are never sent to the service
//! and their cells are [`Leg::UNREACHABLE`]. Every other cell holds either the
//! service's driving leg or, when the service cannot supply one, a geodesic
//! estimate at the configured speed.

use foodroute_core::{DistanceMatrix, DistanceProvider, GeodesicProvider, Leg, Location};
use geo::Coord;
use log::{debug, warn};

use super::client::{HttpMatrixClient, MatrixClient, ServiceMatrix};
use super::error::{DistanceServiceError, ProviderBuildError};

/// Per-request limits of the distance service.
///
/// The defaults match the Google Distance Matrix API: at most 25 origins,
/// 25 destinations and 100 elements (origins × destinations) per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkLimits {
    max_origins: usize,
    max_destinations: usize,
    max_elements: usize,
}

impl Default for ChunkLimits {
    fn default() -> Self {
        Self {
            max_origins: 25,
            max_destinations: 25,
            max_elements: 100,
        }
    }
}

impl ChunkLimits {
    /// Create limits, raising any zero value to one.
    #[must_use]
    pub fn new(max_origins: usize, max_destinations: usize, max_elements: usize) -> Self {
        Self {
            max_origins: max_origins.max(1),
            max_destinations: max_destinations.max(1),
            max_elements: max_elements.max(1),
        }
    }

    /// Chunk sizes `(origins, destinations)` for a block of the given shape.
    ///
    /// Destinations are packed first; origins fill the remaining element
    /// budget.
    fn chunk_shape(&self, origins: usize, destinations: usize) -> (usize, usize) {
        let columns = destinations
            .min(self.max_destinations)
            .min(self.max_elements)
            .max(1);
        let rows = origins
            .min(self.max_origins)
            .min(self.max_elements / columns)
            .max(1);
        (rows, columns)
    }
}

/// A valid location together with its position in the caller's slice.
struct Endpoint<'a> {
    index: usize,
    location: &'a Location,
    coord: Coord<f64>,
}

fn endpoints(locations: &[Location]) -> Vec<Endpoint<'_>> {
    locations
        .iter()
        .enumerate()
        .filter_map(|(index, location)| {
            location.coordinates().map(|coord| Endpoint {
                index,
                location,
                coord,
            })
        })
        .collect()
}

/// Road-distance provider using a [`MatrixClient`].
///
/// # Fallback
///
/// - A chunk whose request fails (timeout, network error, HTTP error,
///   non-`OK` status, undecodable body or wrong dimensions) is filled with
///   geodesic estimates for exactly the pairs it covered.
/// - A pair the service could not route is filled with its geodesic estimate;
///   the rest of the chunk keeps the service's values.
///
/// Failures are logged with `warn!` and never reach the caller.
#[derive(Debug)]
pub struct RoadDistanceProvider<C = HttpMatrixClient> {
    client: C,
    fallback: GeodesicProvider,
    limits: ChunkLimits,
}

impl RoadDistanceProvider {
    /// Build a provider talking to the default endpoint with `api_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderBuildError> {
        Ok(Self::with_client(HttpMatrixClient::new(api_key)?))
    }
}

impl<C: MatrixClient> RoadDistanceProvider<C> {
    /// Wrap an existing client with default limits and fallback speed.
    pub fn with_client(client: C) -> Self {
        Self {
            client,
            fallback: GeodesicProvider::default(),
            limits: ChunkLimits::default(),
        }
    }

    /// Use `fallback` for pairs the service cannot supply.
    #[must_use]
    pub fn with_fallback(mut self, fallback: GeodesicProvider) -> Self {
        self.fallback = fallback;
        self
    }

    /// Override the per-request limits.
    #[must_use]
    pub fn with_limits(mut self, limits: ChunkLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    pub fn fallback(&self) -> &GeodesicProvider {
        &self.fallback
    }

    /// Request one chunk and write its legs into `matrix`.
    fn fill_chunk(
        &self,
        matrix: &mut DistanceMatrix,
        sources: &[Endpoint<'_>],
        targets: &[Endpoint<'_>],
    ) {
        let origins: Vec<Coord<f64>> = sources.iter().map(|e| e.coord).collect();
        let destinations: Vec<Coord<f64>> = targets.iter().map(|e| e.coord).collect();

        let fetched = self
            .client
            .fetch_matrix(&origins, &destinations)
            .and_then(|cells| ensure_shape(cells, origins.len(), destinations.len()));

        match fetched {
            Ok(cells) => {
                for (source, row) in sources.iter().zip(cells) {
                    for (target, cell) in targets.iter().zip(row) {
                        let leg = cell.filter(Leg::is_reachable).unwrap_or_else(|| {
                            debug!(
                                "no road leg for pair ({}, {}); using geodesic estimate",
                                source.index, target.index
                            );
                            self.fallback.leg(source.location, target.location)
                        });
                        store(matrix, source.index, target.index, leg);
                    }
                }
            }
            Err(err) => {
                warn!(
                    "distance service request failed: {err}; using geodesic estimates for {} pairs",
                    sources.len() * targets.len()
                );
                for source in sources {
                    for target in targets {
                        let leg = self.fallback.leg(source.location, target.location);
                        store(matrix, source.index, target.index, leg);
                    }
                }
            }
        }
    }
}

impl<C: MatrixClient> DistanceProvider for RoadDistanceProvider<C> {
    fn get_matrix(&self, origins: &[Location], destinations: &[Location]) -> DistanceMatrix {
        let mut matrix = vec![vec![Leg::UNREACHABLE; destinations.len()]; origins.len()];
        let sources = endpoints(origins);
        let targets = endpoints(destinations);
        if sources.is_empty() || targets.is_empty() {
            return matrix;
        }

        let (rows, columns) = self.limits.chunk_shape(sources.len(), targets.len());
        for source_chunk in sources.chunks(rows) {
            for target_chunk in targets.chunks(columns) {
                self.fill_chunk(&mut matrix, source_chunk, target_chunk);
            }
        }
        matrix
    }
}

fn store(matrix: &mut DistanceMatrix, row: usize, column: usize, leg: Leg) {
    if let Some(cell) = matrix.get_mut(row).and_then(|cells| cells.get_mut(column)) {
        *cell = leg;
    }
}

/// Reject service output that does not cover the requested block.
fn ensure_shape(
    cells: ServiceMatrix,
    rows: usize,
    columns: usize,
) -> Result<ServiceMatrix, DistanceServiceError> {
    if cells.len() == rows && cells.iter().all(|row| row.len() == columns) {
        Ok(cells)
    } else {
        Err(DistanceServiceError::DimensionMismatch {
            expected_rows: rows,
            expected_columns: columns,
            rows: cells.len(),
            columns: cells.iter().map(Vec::len).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::test_support::StubMatrixClient;
    use rstest::{fixture, rstest};

    #[fixture]
    fn depot() -> Location {
        Location::new(12.97, 77.59)
    }

    fn line_of_stops(count: u32) -> Vec<Location> {
        (1..=count)
            .map(|i| Location::new(12.97, 77.59 + f64::from(i) * 0.01).with_id(u64::from(i)))
            .collect()
    }

    fn assert_geodesic(leg: Leg, origin: &Location, destination: &Location) {
        let expected = GeodesicProvider::default().leg(origin, destination);
        assert!((leg.distance_km - expected.distance_km).abs() < 1e-9);
        assert!((leg.duration_min - expected.duration_min).abs() < 1e-9);
    }

    #[rstest]
    #[case((30, 30), (4, 25))]
    #[case((1, 8), (1, 8))]
    #[case((8, 1), (8, 1))]
    #[case((40, 3), (25, 3))]
    #[case((3, 200), (3, 25))]
    fn default_limits_pick_chunk_shapes(
        #[case] shape: (usize, usize),
        #[case] expected: (usize, usize),
    ) {
        assert_eq!(ChunkLimits::default().chunk_shape(shape.0, shape.1), expected);
    }

    #[rstest]
    fn zero_limits_are_raised_to_one() {
        assert_eq!(ChunkLimits::new(0, 0, 0).chunk_shape(5, 5), (1, 1));
    }

    #[rstest]
    fn service_legs_fill_the_matrix(depot: Location) {
        let stub = StubMatrixClient::with_uniform_leg(Leg::new(2.5, 7.0));
        let provider = RoadDistanceProvider::with_client(&stub);
        let stops = line_of_stops(3);

        let matrix = provider.get_matrix(std::slice::from_ref(&depot), &stops);

        assert_eq!(matrix, vec![vec![Leg::new(2.5, 7.0); 3]]);
        assert_eq!(stub.calls(), 1);
    }

    #[rstest]
    fn invalid_points_are_unreachable_and_never_sent(depot: Location) {
        let stub = StubMatrixClient::with_uniform_leg(Leg::new(1.0, 1.0));
        let provider = RoadDistanceProvider::with_client(&stub);
        let destinations = vec![Location::unplaced(), Location::new(13.0, 77.6)];

        let matrix = provider.get_matrix(&[depot, Location::unplaced()], &destinations);

        assert_eq!(matrix[0][0], Leg::UNREACHABLE);
        assert_eq!(matrix[0][1], Leg::new(1.0, 1.0));
        assert_eq!(matrix[1], vec![Leg::UNREACHABLE; 2]);
        assert_eq!(stub.request_shapes(), vec![(1, 1)]);
    }

    #[rstest]
    fn nothing_valid_means_no_request() {
        let stub = StubMatrixClient::with_uniform_leg(Leg::ZERO);
        let provider = RoadDistanceProvider::with_client(&stub);

        let matrix = provider.get_matrix(&[Location::unplaced()], &line_of_stops(2));

        assert_eq!(matrix, vec![vec![Leg::UNREACHABLE; 2]]);
        assert_eq!(stub.calls(), 0);
    }

    #[rstest]
    fn large_requests_are_chunked(depot: Location) {
        let stub = StubMatrixClient::with_uniform_leg(Leg::new(1.0, 2.0));
        let provider = RoadDistanceProvider::with_client(&stub);
        let mut origins = vec![depot];
        origins.extend(line_of_stops(29));
        let destinations = line_of_stops(30);

        let matrix = provider.get_matrix(&origins, &destinations);

        assert_eq!(matrix.len(), 30);
        assert!(matrix.iter().flatten().all(|leg| *leg == Leg::new(1.0, 2.0)));
        let shapes = stub.request_shapes();
        assert!(
            shapes
                .iter()
                .all(|&(rows, columns)| rows * columns <= 100 && rows <= 25 && columns <= 25)
        );
        let covered: usize = shapes.iter().map(|&(rows, columns)| rows * columns).sum();
        assert_eq!(covered, 900);
    }

    #[rstest]
    fn failed_chunk_falls_back_to_geodesic(depot: Location) {
        let stub = StubMatrixClient::with_error(DistanceServiceError::Network {
            endpoint: "http://example.com/json".to_owned(),
            message: "connection refused".to_owned(),
        });
        let provider = RoadDistanceProvider::with_client(&stub);
        let stops = line_of_stops(2);

        let matrix = provider.get_matrix(std::slice::from_ref(&depot), &stops);

        assert_geodesic(matrix[0][0], &depot, &stops[0]);
        assert_geodesic(matrix[0][1], &depot, &stops[1]);
    }

    #[rstest]
    fn unroutable_pair_falls_back_alone(depot: Location) {
        let stub = StubMatrixClient::with_matrix(vec![vec![Some(Leg::new(9.0, 9.0)), None]]);
        let provider = RoadDistanceProvider::with_client(&stub);
        let stops = line_of_stops(2);

        let matrix = provider.get_matrix(std::slice::from_ref(&depot), &stops);

        assert_eq!(matrix[0][0], Leg::new(9.0, 9.0));
        assert_geodesic(matrix[0][1], &depot, &stops[1]);
    }

    #[rstest]
    fn wrong_dimensions_fall_back_for_the_chunk(depot: Location) {
        let stub = StubMatrixClient::with_matrix(vec![vec![Some(Leg::new(9.0, 9.0))]]);
        let provider = RoadDistanceProvider::with_client(&stub);
        let stops = line_of_stops(2);

        let matrix = provider.get_matrix(std::slice::from_ref(&depot), &stops);

        assert_geodesic(matrix[0][0], &depot, &stops[0]);
        assert_geodesic(matrix[0][1], &depot, &stops[1]);
    }

    #[rstest]
    fn fallback_uses_configured_speed(depot: Location) {
        let stub = StubMatrixClient::with_error(DistanceServiceError::Parse {
            message: "truncated body".to_owned(),
        });
        let provider =
            RoadDistanceProvider::with_client(&stub).with_fallback(GeodesicProvider::new(60.0));
        let stop = Location::new(13.0, 77.6);

        let leg = provider.get_single(&depot, &stop);

        assert!((leg.duration_min - leg.distance_km).abs() < 1e-9);
    }

    #[rstest]
    fn unreachable_service_falls_back_to_geodesic(depot: Location) {
        let client = HttpMatrixClient::with_config(
            crate::routing::HttpMatrixClientConfig::new("key")
                .with_base_url("http://127.0.0.1:9/json")
                .with_timeout(std::time::Duration::from_secs(2)),
        )
        .expect("client should build");
        let provider = RoadDistanceProvider::with_client(client);
        let stop = Location::new(13.0, 77.6);

        let leg = provider.get_single(&depot, &stop);

        assert_geodesic(leg, &depot, &stop);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unreachable_service_inside_current_thread_runtime_falls_back() {
        let client = HttpMatrixClient::with_config(
            crate::routing::HttpMatrixClientConfig::new("key")
                .with_base_url("http://127.0.0.1:9/json")
                .with_timeout(std::time::Duration::from_secs(2)),
        )
        .expect("client should build");
        let provider = RoadDistanceProvider::with_client(client);
        let origin = Location::new(12.97, 77.59);
        let stop = Location::new(13.0, 77.6);

        let leg = provider.get_single(&origin, &stop);

        assert_geodesic(leg, &origin, &stop);
    }
}
