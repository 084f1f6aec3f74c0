//! Test utilities for road-distance providers.
//!
//! This module provides [`StubMatrixClient`], a [`MatrixClient`] that returns
//! preconfigured responses without network access, for use in unit and
//! behavioural tests.
//!
//! # Example
//!
//! ```
//! use foodroute_core::{DistanceProvider, Leg, Location};
//! use foodroute_data::routing::RoadDistanceProvider;
//! use foodroute_data::routing::test_support::StubMatrixClient;
//!
//! let stub = StubMatrixClient::with_uniform_leg(Leg::new(1.0, 2.0));
//! let provider = RoadDistanceProvider::with_client(&stub);
//!
//! let leg = provider.get_single(&Location::new(0.0, 0.0), &Location::new(1.0, 1.0));
//! assert_eq!(leg, Leg::new(1.0, 2.0));
//! assert_eq!(stub.calls(), 1);
//! ```

use std::sync::Mutex;
use std::sync::PoisonError;
use std::sync::atomic::{AtomicUsize, Ordering};

use foodroute_core::Leg;
use geo::Coord;

use super::client::{MatrixClient, ServiceMatrix};
use super::error::DistanceServiceError;

/// Stub client returning a fixed response and recording request shapes.
#[derive(Debug)]
pub struct StubMatrixClient {
    response: StubResponse,
    calls: AtomicUsize,
    shapes: Mutex<Vec<(usize, usize)>>,
}

#[derive(Debug, Clone)]
enum StubResponse {
    Matrix(ServiceMatrix),
    Uniform(Option<Leg>),
    Error(DistanceServiceError),
}

impl StubMatrixClient {
    fn with_response(response: StubResponse) -> Self {
        Self {
            response,
            calls: AtomicUsize::new(0),
            shapes: Mutex::new(Vec::new()),
        }
    }

    /// Create a client that returns `matrix` verbatim, whatever the request.
    #[must_use]
    pub fn with_matrix(matrix: ServiceMatrix) -> Self {
        Self::with_response(StubResponse::Matrix(matrix))
    }

    /// Create a client that answers every pair with `leg`, sized to the
    /// request.
    #[must_use]
    pub fn with_uniform_leg(leg: Leg) -> Self {
        Self::with_response(StubResponse::Uniform(Some(leg)))
    }

    /// Create a client that reports every pair as unroutable.
    #[must_use]
    pub fn unroutable() -> Self {
        Self::with_response(StubResponse::Uniform(None))
    }

    /// Create a client whose every request fails with `error`.
    #[must_use]
    pub fn with_error(error: DistanceServiceError) -> Self {
        Self::with_response(StubResponse::Error(error))
    }

    /// Number of requests served so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// `(origins, destinations)` of every request, in order.
    pub fn request_shapes(&self) -> Vec<(usize, usize)> {
        self.shapes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl MatrixClient for StubMatrixClient {
    fn fetch_matrix(
        &self,
        origins: &[Coord<f64>],
        destinations: &[Coord<f64>],
    ) -> Result<ServiceMatrix, DistanceServiceError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.shapes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((origins.len(), destinations.len()));

        match &self.response {
            StubResponse::Matrix(matrix) => Ok(matrix.clone()),
            StubResponse::Uniform(cell) => Ok(vec![vec![*cell; destinations.len()]; origins.len()]),
            StubResponse::Error(error) => Err(error.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn coords(count: usize) -> Vec<Coord<f64>> {
        vec![Coord { x: 0.0, y: 0.0 }; count]
    }

    #[rstest]
    fn uniform_leg_matches_request_shape() {
        let stub = StubMatrixClient::with_uniform_leg(Leg::new(1.0, 1.0));

        let matrix = stub
            .fetch_matrix(&coords(2), &coords(3))
            .expect("should succeed");

        assert_eq!(matrix.len(), 2);
        assert!(matrix.iter().all(|row| row.len() == 3));
        assert_eq!(stub.request_shapes(), vec![(2, 3)]);
    }

    #[rstest]
    fn with_error_returns_configured_error() {
        let stub = StubMatrixClient::with_error(DistanceServiceError::Parse {
            message: "bad body".to_owned(),
        });

        let err = stub
            .fetch_matrix(&coords(1), &coords(1))
            .expect_err("should fail");

        assert!(matches!(err, DistanceServiceError::Parse { .. }));
        assert_eq!(stub.calls(), 1);
    }

    #[rstest]
    fn unroutable_marks_every_cell() {
        let stub = StubMatrixClient::unroutable();
        let matrix = stub
            .fetch_matrix(&coords(2), &coords(2))
            .expect("should succeed");
        assert!(matrix.iter().flatten().all(Option::is_none));
    }
}
