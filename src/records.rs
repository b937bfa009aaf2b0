//! Store rows as they arrive on the wire, and their conversion into domain
//! types.
//!
//! Rows come from two generations of the schema: the seed files use
//! `contractorId`/`deviceId`, the hosted tables use `contractor_id` and
//! `traccar_device_id`. Identifiers may be numbers or numeric strings.

use serde::{Deserialize, Serialize};

use crate::error::AdapterError;
use crate::ids::{self, RawId};
use crate::types::{Contractor, Stop, Vehicle};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VehicleRecord {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default, alias = "plate_number")]
    pub plate: Option<String>,
    #[serde(default)]
    pub capacity_kg: Option<f64>,
    #[serde(default)]
    pub contractor_id: Option<RawId>,
    #[serde(default, rename = "contractorId")]
    pub contractor_id_legacy: Option<RawId>,
    #[serde(default)]
    pub traccar_device_id: Option<RawId>,
    #[serde(default, rename = "deviceId")]
    pub device_id_legacy: Option<RawId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContractorRecord {
    #[serde(default)]
    pub id: Option<RawId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub kpi_on_time_rate: Option<f64>,
    #[serde(default)]
    pub kpi_collection_efficiency: Option<f64>,
}

/// A `smart_bins` row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BinRecord {
    #[serde(alias = "id")]
    pub bin_id: String,
    #[serde(alias = "lat")]
    pub latitude: f64,
    #[serde(alias = "lon", alias = "lng")]
    pub longitude: f64,
    #[serde(alias = "fill_level")]
    pub current_fill_level: f64,
    #[serde(default)]
    pub capacity_kg: Option<f64>,
}

impl TryFrom<VehicleRecord> for Vehicle {
    type Error = AdapterError;

    fn try_from(record: VehicleRecord) -> Result<Self, Self::Error> {
        let id = ids::normalize(record.id, "vehicle id")?;
        let plate = record.plate.map(|p| p.trim().to_string()).unwrap_or_default();
        if plate.is_empty() {
            return Err(AdapterError::InvalidRecord(format!("vehicle {id} has no plate")));
        }

        let contractor_id = ids::normalize_optional(record.contractor_id.or(record.contractor_id_legacy))?;
        let device_id = ids::normalize_device(record.traccar_device_id.or(record.device_id_legacy))?;

        Ok(Vehicle {
            id,
            plate,
            capacity_kg: record.capacity_kg,
            contractor_id,
            device_id,
        })
    }
}

impl TryFrom<ContractorRecord> for Contractor {
    type Error = AdapterError;

    fn try_from(record: ContractorRecord) -> Result<Self, Self::Error> {
        let id = ids::normalize(record.id, "contractor id")?;
        let name = record.name.map(|n| n.trim().to_string()).unwrap_or_default();
        if name.is_empty() {
            return Err(AdapterError::InvalidRecord(format!("contractor {id} has no name")));
        }

        for (field, value) in [
            ("kpi_on_time_rate", record.kpi_on_time_rate),
            ("kpi_collection_efficiency", record.kpi_collection_efficiency),
        ] {
            if let Some(value) = value {
                if !(0.0..=1.0).contains(&value) {
                    return Err(AdapterError::InvalidRecord(format!(
                        "contractor {id} {field}={value} is outside [0, 1]"
                    )));
                }
            }
        }

        Ok(Contractor {
            id,
            name,
            kpi_on_time_rate: record.kpi_on_time_rate,
            kpi_collection_efficiency: record.kpi_collection_efficiency,
        })
    }
}

impl TryFrom<BinRecord> for Stop {
    type Error = AdapterError;

    fn try_from(record: BinRecord) -> Result<Self, Self::Error> {
        if !(0.0..=100.0).contains(&record.current_fill_level) {
            return Err(AdapterError::InvalidRecord(format!(
                "bin {} fill level {} is outside [0, 100]",
                record.bin_id, record.current_fill_level
            )));
        }

        Ok(Stop {
            id: record.bin_id,
            lat: record.latitude,
            lon: record.longitude,
            fill_level: record.current_fill_level,
            capacity_kg: record.capacity_kg.unwrap_or(0.0),
        })
    }
}

/// Convert a batch of rows, failing on the first invalid one.
pub fn convert_all<R, T>(records: Vec<R>) -> Result<Vec<T>, AdapterError>
where
    T: TryFrom<R, Error = AdapterError>,
{
    records.into_iter().map(T::try_from).collect()
}
