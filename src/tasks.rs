//! Collection tasks derived from an ordered route.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use crate::error::PlanError;
use crate::solver::PlanOptions;
use crate::types::{Assignment, Priority, Route, Stop, Task, TaskStatus};

/// Estimated route duration in whole minutes.
///
/// A throughput heuristic: per-stop service time plus per-km drive time,
/// simply summed and rounded. It models no traffic, dwell variance or
/// overlap between driving and servicing.
pub fn estimated_duration_minutes(stop_count: usize, total_distance_km: f64, options: &PlanOptions) -> i64 {
    let service = stop_count as f64 * options.service_minutes_per_stop as f64;
    let driving = total_distance_km * options.drive_minutes_per_km;
    (service + driving).round() as i64
}

pub fn priority_for(fill_level: f64, options: &PlanOptions) -> Priority {
    if fill_level >= options.high_priority_fill {
        Priority::High
    } else {
        Priority::Normal
    }
}

/// Turn a route into one pending task per stop.
///
/// Task `i` is scheduled `i` service slots after `start`. Every task carries
/// the route-level assignment.
pub fn materialize(
    route: &Route,
    stops: &[Stop],
    assignment: Assignment,
    start: DateTime<Utc>,
    options: &PlanOptions,
) -> Result<Vec<Task>, PlanError> {
    let mut by_id: HashMap<&str, &Stop> = HashMap::with_capacity(stops.len());
    for stop in stops {
        by_id.entry(stop.id.as_str()).or_insert(stop);
    }

    route
        .ordered_stop_ids
        .iter()
        .enumerate()
        .map(|(index, stop_id)| {
            let stop = by_id
                .get(stop_id.as_str())
                .ok_or_else(|| PlanError::UnknownStop(stop_id.clone()))?;
            let offset = Duration::minutes(index as i64 * options.service_minutes_per_stop);

            Ok(Task {
                stop_id: stop_id.clone(),
                vehicle_id: assignment.vehicle_id,
                contractor_id: assignment.contractor_id,
                priority: priority_for(stop.fill_level, options),
                status: TaskStatus::Pending,
                scheduled_time: start + offset,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap()
    }

    fn assignment() -> Assignment {
        Assignment {
            vehicle_id: 1,
            contractor_id: 10,
        }
    }

    #[test]
    fn test_priority_threshold_is_inclusive() {
        let options = PlanOptions::default();
        assert_eq!(priority_for(75.0, &options), Priority::High);
        assert_eq!(priority_for(74.9, &options), Priority::Normal);
        assert_eq!(priority_for(100.0, &options), Priority::High);
    }

    #[test]
    fn test_tasks_are_staggered_by_service_time() {
        let stops = vec![
            Stop::new("B1", 5.40, 100.30, 95.0),
            Stop::new("B2", 5.41, 100.31, 40.0),
        ];
        let route = Route {
            ordered_stop_ids: vec!["B1".to_string(), "B2".to_string()],
            total_distance_km: 1.5,
        };

        let tasks = materialize(&route, &stops, assignment(), start(), &PlanOptions::default()).unwrap();

        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].scheduled_time, start());
        assert_eq!(tasks[1].scheduled_time, start() + Duration::minutes(15));
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[1].priority, Priority::Normal);
        assert!(tasks.iter().all(|t| t.status == TaskStatus::Pending));
        assert!(tasks.iter().all(|t| t.vehicle_id == 1 && t.contractor_id == 10));
    }

    #[test]
    fn test_empty_route_has_no_tasks() {
        let tasks = materialize(&Route::empty(), &[], assignment(), start(), &PlanOptions::default()).unwrap();
        assert!(tasks.is_empty());
    }

    #[test]
    fn test_unknown_stop_is_rejected() {
        let route = Route {
            ordered_stop_ids: vec!["B9".to_string()],
            total_distance_km: 0.0,
        };
        let result = materialize(&route, &[], assignment(), start(), &PlanOptions::default());
        assert!(matches!(result, Err(PlanError::UnknownStop(id)) if id == "B9"));
    }

    #[test]
    fn test_duration_formula() {
        let options = PlanOptions::default();
        assert_eq!(estimated_duration_minutes(0, 0.0, &options), 0);
        assert_eq!(estimated_duration_minutes(4, 10.0, &options), 90);
        // 2 * 15 + 1.2 * 3 = 33.6
        assert_eq!(estimated_duration_minutes(2, 1.2, &options), 34);
    }

    #[test]
    fn test_custom_service_time_spacing() {
        let options = PlanOptions {
            service_minutes_per_stop: 20,
            ..PlanOptions::default()
        };
        let stops = vec![Stop::new("a", 5.4, 100.3, 10.0), Stop::new("b", 5.5, 100.3, 10.0)];
        let route = Route {
            ordered_stop_ids: vec!["b".to_string(), "a".to_string()],
            total_distance_km: 11.1,
        };
        let tasks = materialize(&route, &stops, assignment(), start(), &options).unwrap();
        assert_eq!(tasks[1].scheduled_time - tasks[0].scheduled_time, Duration::minutes(20));
        assert_eq!(tasks[0].stop_id, "b");
    }
}
