//! Ports between the planning core and its collaborators.
//!
//! The core only ever sees already-resolved, in-memory collections. Anything
//! that talks to a store or a tracking provider sits behind one of these.

use crate::error::AdapterError;
use crate::types::{Contractor, Device, PlannedRoute, Position, Stop, Vehicle};

/// Anything with a WGS84 location.
pub trait Located {
    /// Location coordinates (lat, lng) in degrees.
    fn location(&self) -> (f64, f64);
}

/// Provides a pairwise distance matrix (km) for a set of locations.
///
/// The matrix is indexed by the provided location order.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, locations: &[(f64, f64)]) -> Vec<Vec<f64>>;
}

/// Durable store of vehicles, contractors and bins.
pub trait RegistryAdapter {
    fn vehicles(&self) -> Result<Vec<Vehicle>, AdapterError>;

    fn contractors(&self) -> Result<Vec<Contractor>, AdapterError>;

    /// Bins whose identifier is in `ids`. Unknown ids are simply absent from
    /// the result.
    fn stops(&self, ids: &[String]) -> Result<Vec<Stop>, AdapterError>;

    fn all_stops(&self) -> Result<Vec<Stop>, AdapterError>;
}

/// Live tracking provider.
pub trait TelemetryAdapter {
    /// Most recent position per tracked device.
    fn latest_positions(&self) -> Result<Vec<Position>, AdapterError>;

    fn devices(&self) -> Result<Vec<Device>, AdapterError>;
}

/// Receives the artifacts of one optimization run. Nothing is read back.
pub trait RouteSink {
    fn save(&self, plan: &PlannedRoute) -> Result<(), AdapterError>;
}
