//! Domain data model.
//!
//! Registry records and telemetry snapshots are read-only inputs to one
//! invocation. `Route`, `Task` and `PlannedRoute` are create-only outputs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ids::{ContractorId, DeviceId, VehicleId};
use crate::traits::Located;

/// A collection point (waste bin).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stop {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    /// Percent full, 0..=100.
    pub fill_level: f64,
    pub capacity_kg: f64,
}

impl Stop {
    pub fn new(id: impl Into<String>, lat: f64, lon: f64, fill_level: f64) -> Self {
        Self {
            id: id.into(),
            lat,
            lon,
            fill_level,
            capacity_kg: 0.0,
        }
    }

    pub fn with_capacity(mut self, capacity_kg: f64) -> Self {
        self.capacity_kg = capacity_kg;
        self
    }
}

impl Located for Stop {
    fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    pub id: VehicleId,
    pub plate: String,
    pub capacity_kg: Option<f64>,
    pub contractor_id: Option<ContractorId>,
    /// Telemetry device used to correlate with live positions.
    pub device_id: Option<DeviceId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contractor {
    pub id: ContractorId,
    pub name: String,
    /// Fraction in [0, 1].
    pub kpi_on_time_rate: Option<f64>,
    /// Fraction in [0, 1].
    pub kpi_collection_efficiency: Option<f64>,
}

/// One live GPS report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub device_id: DeviceId,
    pub lat: f64,
    pub lon: f64,
    /// km/h, never negative.
    pub speed: f64,
    pub course: Option<f64>,
    pub timestamp: DateTime<Utc>,
}

impl Located for Position {
    fn location(&self) -> (f64, f64) {
        (self.lat, self.lon)
    }
}

/// A tracked device as known to the telemetry provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub unique_id: String,
}

/// An open tour over a set of stops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub ordered_stop_ids: Vec<String>,
    pub total_distance_km: f64,
}

impl Route {
    pub fn empty() -> Self {
        Self {
            ordered_stop_ids: Vec::new(),
            total_distance_km: 0.0,
        }
    }

    pub fn len(&self) -> usize {
        self.ordered_stop_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered_stop_ids.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Normal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

/// Vehicle and contractor a whole route is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub vehicle_id: VehicleId,
    pub contractor_id: ContractorId,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub stop_id: String,
    pub vehicle_id: VehicleId,
    pub contractor_id: ContractorId,
    pub priority: Priority,
    pub status: TaskStatus,
    pub scheduled_time: DateTime<Utc>,
}

/// Output of a full "optimize route" operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedRoute {
    pub route: Route,
    pub estimated_duration_minutes: i64,
    pub assignment: Assignment,
    pub tasks: Vec<Task>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetTotals {
    pub vehicles: usize,
    pub active: usize,
    pub idle: usize,
    pub active_contractors: usize,
}

/// Registry fleet size for one contractor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractorCount {
    pub contractor_id: ContractorId,
    pub name: String,
    pub vehicle_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metrics {
    pub totals: FleetTotals,
    pub by_contractor: Vec<ContractorCount>,
}

/// Bin counts by fill level, as shown on the operations dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillLevelSummary {
    pub total: usize,
    /// At or above the critical threshold.
    pub critical: usize,
    /// At or above the high-priority threshold but below critical.
    pub high_fill: usize,
    pub buckets: FillBuckets,
}

/// Fixed quarter buckets: <25, 25..50, 50..75, >=75.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FillBuckets {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub critical: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FleetOverview {
    pub metrics: Metrics,
    pub bins: FillLevelSummary,
}
