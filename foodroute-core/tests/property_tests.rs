//! Property-based tests for `RouteOptimizer`.
//!
//! # Invariants tested
//!
//! - **Permutation:** the visits are exactly the valid input stops, once each.
//! - **Exclusion:** stops without coordinates never appear.
//! - **Consistency:** reported distance equals the sum of consecutive legs.
//! - **Determinism:** identical inputs give identical outputs.
//! - **Destination:** a valid destination always closes the route.

use std::collections::HashSet;

use foodroute_core::test_support::PlanarDistanceProvider;
use foodroute_core::{DistanceProvider, GeodesicProvider, Location, RouteOptimizer};
use proptest::prelude::*;

/// A stop near the origin whose coordinates may be missing.
fn stop_strategy() -> impl Strategy<Value = (Option<f64>, Option<f64>)> {
    (
        proptest::option::weighted(0.85, -0.5_f64..0.5),
        proptest::option::weighted(0.85, -0.5_f64..0.5),
    )
}

/// Stops with unique ids assigned from their position.
fn stops_strategy(max: usize) -> impl Strategy<Value = Vec<Location>> {
    proptest::collection::vec(stop_strategy(), 0..=max).prop_map(|parts| {
        parts
            .into_iter()
            .zip(1_u64..)
            .map(|((lat, lon), id)| Location::from_parts(lat, lon).with_id(id))
            .collect()
    })
}

fn valid_ids(stops: &[Location]) -> HashSet<u64> {
    stops
        .iter()
        .filter(|s| s.is_valid())
        .filter_map(Location::id)
        .collect()
}

fn origin() -> Location {
    Location::new(0.0, 0.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn visits_are_a_permutation_of_valid_stops(stops in stops_strategy(12)) {
        let optimizer = RouteOptimizer::new(GeodesicProvider::default());
        let result = optimizer.nearest_neighbor_route(&origin(), &stops);

        prop_assert_eq!(result.route.origin(), &origin());
        let visited: Vec<u64> = result.route.visits().iter().filter_map(Location::id).collect();
        let unique: HashSet<u64> = visited.iter().copied().collect();
        prop_assert_eq!(visited.len(), unique.len(), "duplicate stop in route");
        prop_assert_eq!(unique, valid_ids(&stops));
    }

    #[test]
    fn invalid_stops_never_appear(stops in stops_strategy(12)) {
        let optimizer = RouteOptimizer::new(GeodesicProvider::default());
        let result = optimizer.route_with_destination(&origin(), &stops, &Location::new(0.7, 0.7));
        prop_assert!(result.route.iter().all(Location::is_valid));
    }

    #[test]
    fn total_matches_sum_of_legs(stops in stops_strategy(10)) {
        let provider = PlanarDistanceProvider::default();
        let optimizer = RouteOptimizer::new(&provider);
        let result = optimizer.nearest_neighbor_route(&origin(), &stops);

        let route: Vec<&Location> = result.route.iter().collect();
        let sum: f64 = route
            .windows(2)
            .map(|pair| provider.get_single(pair[0], pair[1]).distance_km)
            .sum();
        prop_assert!((result.total_distance_km - sum).abs() < 1e-9);
        prop_assert!(result.total_duration_min >= 0.0);
    }

    #[test]
    fn planning_is_deterministic(stops in stops_strategy(10)) {
        let optimizer = RouteOptimizer::new(GeodesicProvider::default());
        let destination = Location::new(-0.6, 0.2);
        let first = optimizer.route_with_destination(&origin(), &stops, &destination);
        let second = optimizer.route_with_destination(&origin(), &stops, &destination);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn valid_destination_closes_the_route(stops in stops_strategy(10)) {
        let optimizer = RouteOptimizer::new(GeodesicProvider::default());
        let destination = Location::new(0.9, -0.9).with_id(0);
        let result = optimizer.route_with_destination(&origin(), &stops, &destination);
        prop_assert_eq!(result.route.last(), &destination);
        prop_assert_eq!(result.route.visit_count(), valid_ids(&stops).len() + 1);
    }

    #[test]
    fn each_step_takes_the_nearest_remaining_stop(stops in stops_strategy(8)) {
        let provider = PlanarDistanceProvider::default();
        let optimizer = RouteOptimizer::new(&provider);
        let result = optimizer.nearest_neighbor_route(&origin(), &stops);

        let route: Vec<&Location> = result.route.iter().collect();
        for (step, pair) in route.windows(2).enumerate() {
            let chosen = provider.get_single(pair[0], pair[1]).distance_km;
            for later in &route[step + 2..] {
                let alternative = provider.get_single(pair[0], later).distance_km;
                prop_assert!(chosen <= alternative);
            }
        }
    }
}
