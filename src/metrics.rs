//! Fleet KPIs from live telemetry and the vehicle/contractor registry.

use std::collections::{HashMap, HashSet};

use crate::ids::{ContractorId, DeviceId};
use crate::solver::PlanOptions;
use crate::types::{
    ContractorCount, Contractor, FillBuckets, FillLevelSummary, FleetTotals, Metrics, Position, Stop, Vehicle,
};

/// Correlate `positions` against the registry.
///
/// A vehicle is active iff a position for its device reports a speed above
/// zero. A vehicle whose device has no position, or that has no device at all,
/// is idle. `by_contractor` is registry fleet size per contractor, in registry
/// order, independent of activity.
pub fn compute_metrics(positions: &[Position], vehicles: &[Vehicle], contractors: &[Contractor]) -> Metrics {
    let active_devices: HashSet<DeviceId> = positions
        .iter()
        .filter(|position| position.speed > 0.0)
        .map(|position| position.device_id)
        .collect();

    let mut active = 0;
    let mut active_contractors: HashSet<ContractorId> = HashSet::new();
    let mut fleet_sizes: HashMap<ContractorId, usize> = HashMap::new();

    for vehicle in vehicles {
        if let Some(contractor_id) = vehicle.contractor_id {
            *fleet_sizes.entry(contractor_id).or_default() += 1;
        }

        let is_active = vehicle
            .device_id
            .is_some_and(|device_id| active_devices.contains(&device_id));
        if is_active {
            active += 1;
            if let Some(contractor_id) = vehicle.contractor_id {
                active_contractors.insert(contractor_id);
            }
        }
    }

    let by_contractor = contractors
        .iter()
        .map(|contractor| ContractorCount {
            contractor_id: contractor.id,
            name: contractor.name.clone(),
            vehicle_count: fleet_sizes.get(&contractor.id).copied().unwrap_or(0),
        })
        .collect();

    Metrics {
        totals: FleetTotals {
            vehicles: vehicles.len(),
            active,
            idle: vehicles.len() - active,
            active_contractors: active_contractors.len(),
        },
        by_contractor,
    }
}

/// Count bins by fill level for the dashboard.
pub fn summarize_fill_levels(stops: &[Stop], options: &PlanOptions) -> FillLevelSummary {
    let mut summary = FillLevelSummary {
        total: stops.len(),
        ..FillLevelSummary::default()
    };

    for stop in stops {
        let fill = stop.fill_level;
        if fill >= options.critical_fill {
            summary.critical += 1;
        } else if fill >= options.high_priority_fill {
            summary.high_fill += 1;
        }

        let bucket = &mut summary.buckets;
        match fill {
            f if f < 25.0 => bucket.low += 1,
            f if f < 50.0 => bucket.medium += 1,
            f if f < 75.0 => bucket.high += 1,
            f if f >= 75.0 => bucket.critical += 1,
            // NaN lands in no bucket.
            _ => {}
        }
    }

    summary
}

impl FillBuckets {
    pub fn total(&self) -> usize {
        self.low + self.medium + self.high + self.critical
    }
}
