//! In-memory registry and sink.
//!
//! Used for tests, for seed files, and as the explicit demo fallback when no
//! hosted store is configured.

use std::io::Read;
use std::sync::{Mutex, PoisonError};

use serde::Deserialize;

use crate::error::AdapterError;
use crate::records::{self, BinRecord, ContractorRecord, VehicleRecord};
use crate::traits::{RegistryAdapter, RouteSink};
use crate::types::{Contractor, PlannedRoute, Stop, Vehicle};

#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    vehicles: Vec<Vehicle>,
    contractors: Vec<Contractor>,
    stops: Vec<Stop>,
}

/// Seed file layout: `{"vehicles": [...], "contractors": [...], "bins": [...]}`.
#[derive(Debug, Default, Deserialize)]
struct SeedFile {
    #[serde(default)]
    vehicles: Vec<VehicleRecord>,
    #[serde(default)]
    contractors: Vec<ContractorRecord>,
    #[serde(default)]
    bins: Vec<BinRecord>,
}

impl InMemoryRegistry {
    pub fn new(vehicles: Vec<Vehicle>, contractors: Vec<Contractor>, stops: Vec<Stop>) -> Self {
        Self {
            vehicles,
            contractors,
            stops,
        }
    }

    /// Load a JSON seed file, normalizing identifiers the same way the hosted
    /// store adapter does.
    pub fn from_seed_reader<R: Read>(reader: R) -> Result<Self, AdapterError> {
        let seed: SeedFile = serde_json::from_reader(reader)?;
        Ok(Self {
            vehicles: records::convert_all(seed.vehicles)?,
            contractors: records::convert_all(seed.contractors)?,
            stops: records::convert_all(seed.bins)?,
        })
    }

    /// Small George Town fleet and bin set.
    pub fn demo() -> Self {
        let stops = vec![
            Stop::new("BIN001", 5.4376, 100.3098, 85.0).with_capacity(100.0),
            Stop::new("BIN002", 5.3325, 100.3067, 45.0).with_capacity(100.0),
            Stop::new("BIN003", 5.4123, 100.3254, 95.0).with_capacity(120.0),
            Stop::new("BIN004", 5.4140, 100.3290, 72.0).with_capacity(150.0),
            Stop::new("BIN005", 5.4710, 100.2770, 38.0).with_capacity(80.0),
        ];
        let contractors = vec![
            Contractor {
                id: 1,
                name: "Penang Green Services".to_string(),
                kpi_on_time_rate: Some(0.94),
                kpi_collection_efficiency: Some(0.88),
            },
            Contractor {
                id: 2,
                name: "Island Waste Management".to_string(),
                kpi_on_time_rate: Some(0.87),
                kpi_collection_efficiency: Some(0.91),
            },
        ];
        let vehicles = vec![
            Vehicle {
                id: 1,
                plate: "PKA 1001".to_string(),
                capacity_kg: Some(8000.0),
                contractor_id: Some(1),
                device_id: Some(1),
            },
            Vehicle {
                id: 2,
                plate: "PKA 1002".to_string(),
                capacity_kg: Some(8000.0),
                contractor_id: Some(1),
                device_id: Some(2),
            },
            Vehicle {
                id: 3,
                plate: "PKB 2001".to_string(),
                capacity_kg: Some(5000.0),
                contractor_id: Some(2),
                device_id: None,
            },
        ];
        Self::new(vehicles, contractors, stops)
    }
}

impl RegistryAdapter for InMemoryRegistry {
    fn vehicles(&self) -> Result<Vec<Vehicle>, AdapterError> {
        Ok(self.vehicles.clone())
    }

    fn contractors(&self) -> Result<Vec<Contractor>, AdapterError> {
        Ok(self.contractors.clone())
    }

    fn stops(&self, ids: &[String]) -> Result<Vec<Stop>, AdapterError> {
        Ok(self
            .stops
            .iter()
            .filter(|stop| ids.contains(&stop.id))
            .cloned()
            .collect())
    }

    fn all_stops(&self) -> Result<Vec<Stop>, AdapterError> {
        Ok(self.stops.clone())
    }
}

/// Keeps every saved plan in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    saved: Mutex<Vec<PlannedRoute>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn saved(&self) -> Vec<PlannedRoute> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl RouteSink for RecordingSink {
    fn save(&self, plan: &PlannedRoute) -> Result<(), AdapterError> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(plan.clone());
        Ok(())
    }
}
