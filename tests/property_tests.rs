//! Property tests for the route optimizer, distance function and metrics.

use std::collections::HashSet;

use chrono::{TimeZone, Utc};
use proptest::prelude::*;

use collection_planner::haversine::haversine_km;
use collection_planner::metrics::compute_metrics;
use collection_planner::solver::optimize;
use collection_planner::types::{Contractor, Position, Stop, Vehicle};

fn coordinate() -> impl Strategy<Value = (f64, f64)> {
    (-90.0f64..=90.0, -180.0f64..=180.0)
}

fn stop_set() -> impl Strategy<Value = Vec<Stop>> {
    prop::collection::vec((coordinate(), 0.0f64..=100.0), 0..12).prop_map(|rows| {
        rows.into_iter()
            .enumerate()
            .map(|(i, ((lat, lon), fill))| Stop::new(format!("BIN{i:03}"), lat, lon, fill))
            .collect()
    })
}

fn fleet() -> impl Strategy<Value = (Vec<Position>, Vec<Vehicle>, Vec<Contractor>)> {
    let positions = prop::collection::vec((0i64..8, 0.0f64..40.0), 0..10);
    let vehicles = prop::collection::vec((prop::option::of(0i64..8), prop::option::of(0i64..4)), 0..10);
    let contractors = prop::collection::vec(0i64..4, 0..4);

    (positions, vehicles, contractors).prop_map(|(positions, vehicles, contractors)| {
        let positions = positions
            .into_iter()
            .map(|(device_id, speed)| Position {
                device_id,
                lat: 5.41,
                lon: 100.33,
                speed,
                course: None,
                timestamp: Utc.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap(),
            })
            .collect();
        let vehicles = vehicles
            .into_iter()
            .enumerate()
            .map(|(i, (device_id, contractor_id))| Vehicle {
                id: i as i64,
                plate: format!("PKD {i}"),
                capacity_kg: None,
                contractor_id,
                device_id,
            })
            .collect();
        let contractors = contractors
            .into_iter()
            .map(|id| Contractor {
                id,
                name: format!("Contractor {id}"),
                kpi_on_time_rate: None,
                kpi_collection_efficiency: None,
            })
            .collect();
        (positions, vehicles, contractors)
    })
}

proptest! {
    #[test]
    fn route_is_permutation_of_input(stops in stop_set()) {
        let route = optimize(&stops);

        prop_assert_eq!(route.len(), stops.len());
        let visited: HashSet<&String> = route.ordered_stop_ids.iter().collect();
        let expected: HashSet<&String> = stops.iter().map(|s| &s.id).collect();
        prop_assert_eq!(visited, expected);
    }

    #[test]
    fn route_starts_at_a_fullest_stop(stops in stop_set()) {
        prop_assume!(!stops.is_empty());
        let route = optimize(&stops);

        let max_fill = stops.iter().map(|s| s.fill_level).fold(f64::MIN, f64::max);
        let first = stops.iter().find(|s| s.id == route.ordered_stop_ids[0]).unwrap();
        prop_assert_eq!(first.fill_level, max_fill);
    }

    #[test]
    fn distance_is_sum_of_legs(stops in stop_set()) {
        let route = optimize(&stops);

        let location = |id: &String| {
            let stop = stops.iter().find(|s| &s.id == id).unwrap();
            (stop.lat, stop.lon)
        };
        let legs: f64 = route
            .ordered_stop_ids
            .windows(2)
            .map(|leg| haversine_km(location(&leg[0]), location(&leg[1])))
            .sum();

        prop_assert!(route.total_distance_km >= 0.0);
        prop_assert!((route.total_distance_km - legs).abs() < 1e-6);
        if stops.len() <= 1 {
            prop_assert_eq!(route.total_distance_km, 0.0);
        }
    }

    #[test]
    fn optimization_is_deterministic(stops in stop_set()) {
        prop_assert_eq!(optimize(&stops), optimize(&stops));
    }

    #[test]
    fn haversine_is_symmetric(a in coordinate(), b in coordinate()) {
        let forward = haversine_km(a, b);
        let backward = haversine_km(b, a);

        prop_assert!((forward - backward).abs() < 1e-9);
        prop_assert!(forward >= 0.0);
        prop_assert!(forward <= std::f64::consts::PI * 6371.0 + 1e-6);
    }

    #[test]
    fn haversine_of_same_point_is_zero(a in coordinate()) {
        prop_assert_eq!(haversine_km(a, a), 0.0);
    }

    #[test]
    fn metrics_totals_are_consistent((positions, vehicles, contractors) in fleet()) {
        let metrics = compute_metrics(&positions, &vehicles, &contractors);

        prop_assert_eq!(metrics.totals.vehicles, vehicles.len());
        prop_assert_eq!(metrics.totals.active + metrics.totals.idle, metrics.totals.vehicles);
        prop_assert_eq!(metrics.by_contractor.len(), contractors.len());
        prop_assert!(metrics.totals.active_contractors <= metrics.totals.active);
    }
}
