//! Explicit fallback between two collaborators.
//!
//! Nothing in the crate substitutes demo data on its own. A caller that wants
//! the old "show something anyway" behaviour wraps its adapters in
//! [`WithFallback`], and every substitution is logged.

use tracing::warn;

use crate::error::AdapterError;
use crate::traits::{RegistryAdapter, TelemetryAdapter};
use crate::types::{Contractor, Device, Position, Stop, Vehicle};

#[derive(Debug, Clone)]
pub struct WithFallback<P, F> {
    primary: P,
    fallback: F,
}

impl<P, F> WithFallback<P, F> {
    pub fn new(primary: P, fallback: F) -> Self {
        Self { primary, fallback }
    }

    fn attempt<T>(
        &self,
        what: &'static str,
        primary: impl FnOnce(&P) -> Result<T, AdapterError>,
        fallback: impl FnOnce(&F) -> Result<T, AdapterError>,
    ) -> Result<T, AdapterError> {
        match primary(&self.primary) {
            Ok(value) => Ok(value),
            Err(err) => {
                warn!(error = %err, what, "primary source failed, using fallback");
                fallback(&self.fallback)
            }
        }
    }
}

impl<P: TelemetryAdapter, F: TelemetryAdapter> TelemetryAdapter for WithFallback<P, F> {
    fn latest_positions(&self) -> Result<Vec<Position>, AdapterError> {
        self.attempt("positions", P::latest_positions, F::latest_positions)
    }

    fn devices(&self) -> Result<Vec<Device>, AdapterError> {
        self.attempt("devices", P::devices, F::devices)
    }
}

impl<P: RegistryAdapter, F: RegistryAdapter> RegistryAdapter for WithFallback<P, F> {
    fn vehicles(&self) -> Result<Vec<Vehicle>, AdapterError> {
        self.attempt("vehicles", P::vehicles, F::vehicles)
    }

    fn contractors(&self) -> Result<Vec<Contractor>, AdapterError> {
        self.attempt("contractors", P::contractors, F::contractors)
    }

    fn stops(&self, ids: &[String]) -> Result<Vec<Stop>, AdapterError> {
        self.attempt("stops", |p| p.stops(ids), |f| f.stops(ids))
    }

    fn all_stops(&self) -> Result<Vec<Stop>, AdapterError> {
        self.attempt("all stops", P::all_stops, F::all_stops)
    }
}

/// An absent collaborator: every call fails with `NotConfigured`, so a
/// wrapping [`WithFallback`] takes over.
impl<T: TelemetryAdapter> TelemetryAdapter for Option<T> {
    fn latest_positions(&self) -> Result<Vec<Position>, AdapterError> {
        match self {
            Some(inner) => inner.latest_positions(),
            None => Err(AdapterError::NotConfigured("telemetry provider")),
        }
    }

    fn devices(&self) -> Result<Vec<Device>, AdapterError> {
        match self {
            Some(inner) => inner.devices(),
            None => Err(AdapterError::NotConfigured("telemetry provider")),
        }
    }
}
