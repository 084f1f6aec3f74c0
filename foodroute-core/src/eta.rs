//! Scalar travel-time estimates.
//!
//! These helpers work from a distance alone and do not consult a
//! [`DistanceProvider`](crate::DistanceProvider).

use crate::DEFAULT_SPEED_KMH;

/// Default dwell time spent at each stop, in minutes.
pub const DEFAULT_PER_STOP_MINUTES: u32 = 5;

const MINUTES_PER_HOUR: f64 = 60.0;

/// Estimate minutes to cover `distance_km` at `speed_kmh` with `stop_count`
/// stops of `per_stop_minutes` each, rounded to the nearest minute.
///
/// Negative or non-finite distances count as zero. A speed that is not a
/// positive finite number is replaced by the 20 km/h default.
///
/// # Examples
/// ```
/// use foodroute_core::estimate_time;
///
/// assert_eq!(estimate_time(10.0, 20.0, 2, 5), 40);
/// ```
pub fn estimate_time(
    distance_km: f64,
    speed_kmh: f64,
    stop_count: usize,
    per_stop_minutes: u32,
) -> u32 {
    let speed = if speed_kmh.is_finite() && speed_kmh > 0.0 {
        speed_kmh
    } else {
        DEFAULT_SPEED_KMH
    };
    let distance = if distance_km.is_finite() {
        distance_km.max(0.0)
    } else {
        0.0
    };
    whole_minutes(distance / speed * MINUTES_PER_HOUR + dwell_minutes(stop_count, per_stop_minutes))
}

/// [`estimate_time`] with the default speed and dwell time.
pub fn estimate_time_default(distance_km: f64, stop_count: usize) -> u32 {
    estimate_time(
        distance_km,
        DEFAULT_SPEED_KMH,
        stop_count,
        DEFAULT_PER_STOP_MINUTES,
    )
}

/// Round a distance to two decimals for display.
///
/// # Examples
/// ```
/// use foodroute_core::round_distance;
///
/// assert_eq!(round_distance(3.14159), 3.14);
/// ```
pub fn round_distance(distance_km: f64) -> f64 {
    (distance_km * 100.0).round() / 100.0
}

pub(crate) fn dwell_minutes(stop_count: usize, per_stop_minutes: u32) -> f64 {
    stop_count as f64 * f64::from(per_stop_minutes)
}

/// Round to whole minutes, clamping negatives and NaN to zero.
pub(crate) fn whole_minutes(minutes: f64) -> u32 {
    // Float-to-int casts saturate, so huge values clamp to u32::MAX.
    minutes.max(0.0).round() as u32
}
