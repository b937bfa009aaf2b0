//! Route ordering for a set of collection stops.
//!
//! Greedy nearest-neighbour construction seeded at the fullest bin. Operators
//! select small bin subsets per route, so the O(n²) distance matrix is cheap
//! and no improvement phase is run on top of it.

use rayon::prelude::*;
use tracing::debug;

use crate::haversine::HaversineMatrix;
use crate::traits::{DistanceMatrixProvider, Located};
use crate::types::{Route, Stop};

/// Service time budgeted per stop.
pub const DEFAULT_SERVICE_MINUTES_PER_STOP: i64 = 15;
/// Drive time budgeted per kilometre.
pub const DEFAULT_DRIVE_MINUTES_PER_KM: f64 = 3.0;
/// Fill level at which a collection task becomes high priority.
pub const DEFAULT_HIGH_PRIORITY_FILL: f64 = 75.0;
/// Fill level at which a bin is reported as critical.
pub const DEFAULT_CRITICAL_FILL: f64 = 90.0;

/// Tunable planning parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct PlanOptions {
    /// Minutes spent at each stop; also the spacing between task slots.
    pub service_minutes_per_stop: i64,
    /// Minutes of driving per kilometre of route.
    pub drive_minutes_per_km: f64,
    pub high_priority_fill: f64,
    pub critical_fill: f64,
}

impl Default for PlanOptions {
    fn default() -> Self {
        Self {
            service_minutes_per_stop: DEFAULT_SERVICE_MINUTES_PER_STOP,
            drive_minutes_per_km: DEFAULT_DRIVE_MINUTES_PER_KM,
            high_priority_fill: DEFAULT_HIGH_PRIORITY_FILL,
            critical_fill: DEFAULT_CRITICAL_FILL,
        }
    }
}

/// Order `stops` into an open tour using haversine distances.
pub fn optimize(stops: &[Stop]) -> Route {
    optimize_with(stops, &HaversineMatrix)
}

/// Order `stops` into an open tour using distances from `matrix_provider`.
///
/// The tour starts at the stop with the highest fill level (first one wins a
/// tie) and then repeatedly moves to the nearest unvisited stop (first one in
/// input order wins a tie). The total is the sum of the legs travelled; there
/// is no return leg.
pub fn optimize_with<M>(stops: &[Stop], matrix_provider: &M) -> Route
where
    M: DistanceMatrixProvider,
{
    if stops.len() <= 1 {
        return Route {
            ordered_stop_ids: stops.iter().map(|stop| stop.id.clone()).collect(),
            total_distance_km: 0.0,
        };
    }

    let locations: Vec<(f64, f64)> = stops.iter().map(Located::location).collect();
    let matrix = matrix_provider.matrix_for(&locations);
    let order = nearest_neighbour_order(stops, &matrix);

    let total_distance_km: f64 = order
        .windows(2)
        .map(|leg| matrix[leg[0]][leg[1]])
        .sum();

    debug!(stops = stops.len(), total_distance_km, "optimized route");

    Route {
        ordered_stop_ids: order.iter().map(|&i| stops[i].id.clone()).collect(),
        total_distance_km,
    }
}

/// Optimize independent stop sets in parallel.
///
/// Each set is planned exactly as [`optimize`] would; results keep the input
/// order.
pub fn optimize_all(stop_sets: &[Vec<Stop>]) -> Vec<Route> {
    stop_sets.par_iter().map(|stops| optimize(stops)).collect()
}

/// Index of the fullest stop. Earlier stops win ties.
pub fn seed_index(stops: &[Stop]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, stop) in stops.iter().enumerate() {
        let fuller = match best {
            None => true,
            Some(b) => {
                let current = stops[b].fill_level;
                stop.fill_level > current || (current.is_nan() && !stop.fill_level.is_nan())
            }
        };
        if fuller {
            best = Some(i);
        }
    }
    best
}

fn nearest_neighbour_order(stops: &[Stop], matrix: &[Vec<f64>]) -> Vec<usize> {
    let Some(start) = seed_index(stops) else {
        return Vec::new();
    };

    let mut order = Vec::with_capacity(stops.len());
    let mut visited = vec![false; stops.len()];
    let mut current = start;
    visited[current] = true;
    order.push(current);

    while order.len() < stops.len() {
        let mut nearest: Option<(usize, f64)> = None;
        for candidate in (0..stops.len()).filter(|&i| !visited[i]) {
            let distance = matrix[current][candidate];
            match nearest {
                None => nearest = Some((candidate, distance)),
                Some((_, best)) if distance < best => nearest = Some((candidate, distance)),
                Some(_) => {}
            }
        }

        // Loop condition guarantees at least one unvisited stop.
        let Some((next, _)) = nearest else { break };
        visited[next] = true;
        order.push(next);
        current = next;
    }

    order
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_prefers_first_of_equal_fill() {
        let stops = vec![
            Stop::new("a", 5.40, 100.30, 50.0),
            Stop::new("b", 5.41, 100.31, 80.0),
            Stop::new("c", 5.42, 100.32, 80.0),
        ];
        assert_eq!(seed_index(&stops), Some(1));
    }

    #[test]
    fn test_seed_of_empty_is_none() {
        assert_eq!(seed_index(&[]), None);
    }

    #[test]
    fn test_seed_skips_nan_fill() {
        let stops = vec![
            Stop::new("a", 5.40, 100.30, f64::NAN),
            Stop::new("b", 5.41, 100.31, 10.0),
        ];
        assert_eq!(seed_index(&stops), Some(1));
    }

    #[test]
    fn test_seed_ignores_later_nan_fill() {
        let stops = vec![
            Stop::new("a", 5.40, 100.30, 10.0),
            Stop::new("b", 5.41, 100.31, f64::NAN),
        ];
        assert_eq!(seed_index(&stops), Some(0));
    }

    #[test]
    fn test_default_options() {
        let options = PlanOptions::default();
        assert_eq!(options.service_minutes_per_stop, 15);
        assert_eq!(options.drive_minutes_per_km, 3.0);
        assert_eq!(options.high_priority_fill, 75.0);
        assert_eq!(options.critical_fill, 90.0);
    }
}
