//! Response types for the Google Distance Matrix API.
//!
//! Only the fields needed to build a [`Leg`] are decoded. Distances arrive in
//! metres and durations in seconds; `duration_in_traffic` is present only when
//! a departure time was requested for driving mode.
//!
//! See: <https://developers.google.com/maps/documentation/distance-matrix/distance-matrix>

use foodroute_core::Leg;
use serde::Deserialize;

const METRES_PER_KM: f64 = 1_000.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// Status string used by the service for success, both top-level and
/// per element.
const STATUS_OK: &str = "OK";

/// Distance Matrix API response.
#[derive(Debug, Deserialize)]
pub struct MatrixResponse {
    /// Top-level status.
    ///
    /// Common values:
    /// - `"OK"` - the request was valid
    /// - `"INVALID_REQUEST"` - malformed parameters
    /// - `"MAX_ELEMENTS_EXCEEDED"` - origins × destinations above the limit
    /// - `"OVER_QUERY_LIMIT"` / `"REQUEST_DENIED"` - quota or key problems
    pub status: String,

    /// Explanation accompanying a non-`OK` status.
    #[serde(default)]
    pub error_message: Option<String>,

    /// One row per origin, in request order.
    #[serde(default)]
    pub rows: Vec<MatrixRow>,
}

impl MatrixResponse {
    /// Check if the response indicates success.
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == STATUS_OK
    }
}

/// Row of elements for one origin.
#[derive(Debug, Deserialize)]
pub struct MatrixRow {
    /// One element per destination, in request order.
    #[serde(default)]
    pub elements: Vec<MatrixElement>,
}

/// Result for one origin/destination pair.
#[derive(Debug, Deserialize)]
pub struct MatrixElement {
    /// `"OK"`, `"NOT_FOUND"` or `"ZERO_RESULTS"`.
    pub status: String,
    pub distance: Option<Measure>,
    pub duration: Option<Measure>,
    pub duration_in_traffic: Option<Measure>,
}

/// A `{ "value": .., "text": .. }` pair; only the numeric value is kept.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Measure {
    pub value: f64,
}

impl MatrixElement {
    /// Convert the element into a [`Leg`], preferring the traffic-aware
    /// duration.
    ///
    /// Returns `None` when the element status is not `OK` or when a required
    /// value is missing, negative or non-finite.
    #[must_use]
    pub fn leg(&self) -> Option<Leg> {
        if self.status != STATUS_OK {
            return None;
        }
        let metres = usable(self.distance?)?;
        let seconds = self
            .duration_in_traffic
            .and_then(usable)
            .or_else(|| self.duration.and_then(usable))?;
        Some(Leg::new(
            metres / METRES_PER_KM,
            seconds / SECONDS_PER_MINUTE,
        ))
    }
}

fn usable(measure: Measure) -> Option<f64> {
    Some(measure.value).filter(|v| v.is_finite() && *v >= 0.0)
}
