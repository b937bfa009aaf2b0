//! Planning and monitoring operations over the adapters.
//!
//! These fetch a snapshot from the collaborators, hand it to the pure core,
//! and pass results on. No state is kept between calls.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::{AdapterError, PlanError};
use crate::haversine::is_valid_coordinate;
use crate::metrics::{compute_metrics, summarize_fill_levels};
use crate::solver::{PlanOptions, optimize};
use crate::tasks::{estimated_duration_minutes, materialize};
use crate::traits::{RegistryAdapter, RouteSink, TelemetryAdapter};
use crate::types::{Assignment, FleetOverview, Metrics, PlannedRoute, Stop};

/// An operator's request to route a set of bins with one vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub selected_stop_ids: Vec<String>,
    pub assignment: Assignment,
}

/// Optimize, estimate and materialize a route over an in-memory stop set.
///
/// An empty stop set yields an empty route with no tasks.
pub fn plan_route(
    stops: &[Stop],
    assignment: Assignment,
    start: DateTime<Utc>,
    options: &PlanOptions,
) -> Result<PlannedRoute, PlanError> {
    validate_coordinates(stops)?;

    let route = optimize(stops);
    let estimated_duration_minutes = estimated_duration_minutes(route.len(), route.total_distance_km, options);
    let tasks = materialize(&route, stops, assignment, start, options)?;

    Ok(PlannedRoute {
        route,
        estimated_duration_minutes,
        assignment,
        tasks,
    })
}

/// Reject stops whose coordinates are not finite WGS84 values.
pub fn validate_coordinates(stops: &[Stop]) -> Result<(), PlanError> {
    match stops.iter().find(|stop| !is_valid_coordinate(stop.lat, stop.lon)) {
        Some(stop) => Err(PlanError::MalformedCoordinate {
            stop_id: stop.id.clone(),
            lat: stop.lat,
            lon: stop.lon,
        }),
        None => Ok(()),
    }
}

pub struct RoutePlanner<R, S> {
    registry: R,
    sink: S,
    options: PlanOptions,
}

impl<R, S> RoutePlanner<R, S>
where
    R: RegistryAdapter,
    S: RouteSink,
{
    pub fn new(registry: R, sink: S, options: PlanOptions) -> Self {
        Self {
            registry,
            sink,
            options,
        }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Plan a route over the selected bins and hand it to the sink.
    ///
    /// An empty selection, or one where none of the bins exist, is rejected
    /// with [`PlanError::NoStops`].
    pub fn plan(&self, request: &RouteRequest, start: DateTime<Utc>) -> Result<PlannedRoute, PlanError> {
        if request.selected_stop_ids.is_empty() {
            return Err(PlanError::NoStops);
        }

        let stops = self
            .registry
            .stops(&request.selected_stop_ids)
            .map_err(PlanError::Registry)?;

        let missing: Vec<&String> = request
            .selected_stop_ids
            .iter()
            .filter(|id| !stops.iter().any(|stop| &stop.id == *id))
            .collect();
        if !missing.is_empty() {
            warn!(?missing, "selected bins not found in registry");
        }
        if stops.is_empty() {
            return Err(PlanError::NoStops);
        }

        let plan = plan_route(&stops, request.assignment, start, &self.options)?;
        self.sink.save(&plan).map_err(PlanError::Persist)?;

        info!(
            vehicle_id = plan.assignment.vehicle_id,
            contractor_id = plan.assignment.contractor_id,
            stops = plan.route.len(),
            total_distance_km = plan.route.total_distance_km,
            estimated_duration_minutes = plan.estimated_duration_minutes,
            "planned collection route"
        );
        Ok(plan)
    }
}

pub struct FleetMonitor<T, R> {
    telemetry: T,
    registry: R,
    options: PlanOptions,
}

impl<T, R> FleetMonitor<T, R>
where
    T: TelemetryAdapter,
    R: RegistryAdapter,
{
    pub fn new(telemetry: T, registry: R, options: PlanOptions) -> Self {
        Self {
            telemetry,
            registry,
            options,
        }
    }

    /// Fleet KPIs from a fresh telemetry poll.
    pub fn metrics(&self) -> Result<Metrics, AdapterError> {
        let positions = self.telemetry.latest_positions()?;
        let vehicles = self.registry.vehicles()?;
        let contractors = self.registry.contractors()?;

        let metrics = compute_metrics(&positions, &vehicles, &contractors);
        debug!(
            positions = positions.len(),
            vehicles = metrics.totals.vehicles,
            active = metrics.totals.active,
            "computed fleet metrics"
        );
        Ok(metrics)
    }

    /// Fleet KPIs plus bin fill-level counts.
    pub fn overview(&self) -> Result<FleetOverview, AdapterError> {
        let metrics = self.metrics()?;
        let stops = self.registry.all_stops()?;
        Ok(FleetOverview {
            metrics,
            bins: summarize_fill_levels(&stops, &self.options),
        })
    }
}
