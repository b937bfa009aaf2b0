//! Identifier normalization.
//!
//! Store rows and telemetry payloads carry the same identifiers as JSON
//! numbers in one place and numeric strings in another. Everything is folded
//! into `i64` here, before it reaches the core, so correlation is a plain
//! integer comparison.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type VehicleId = i64;
pub type ContractorId = i64;
pub type DeviceId = i64;

/// Identifier exactly as it appeared on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawId {
    Int(i64),
    Float(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    #[error("identifier is empty")]
    Empty,
    #[error("identifier {0:?} is not numeric")]
    NotNumeric(String),
    #[error("identifier {0} is not a whole number")]
    Fractional(String),
    #[error("missing {0}")]
    Missing(&'static str),
}

impl TryFrom<RawId> for i64 {
    type Error = IdError;

    fn try_from(raw: RawId) -> Result<Self, Self::Error> {
        match raw {
            RawId::Int(value) => Ok(value),
            RawId::Float(value) => float_to_id(value),
            RawId::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(IdError::Empty);
                }
                if let Ok(value) = trimmed.parse::<i64>() {
                    return Ok(value);
                }
                match trimmed.parse::<f64>() {
                    Ok(value) => float_to_id(value),
                    Err(_) => Err(IdError::NotNumeric(text)),
                }
            }
        }
    }
}

fn float_to_id(value: f64) -> Result<i64, IdError> {
    if !value.is_finite() {
        return Err(IdError::NotNumeric(value.to_string()));
    }
    if value.fract() != 0.0 || value.abs() > i64::MAX as f64 {
        return Err(IdError::Fractional(value.to_string()));
    }
    Ok(value as i64)
}

/// Normalize a required identifier.
pub fn normalize(raw: Option<RawId>, field: &'static str) -> Result<i64, IdError> {
    let raw = raw.ok_or(IdError::Missing(field))?;
    i64::try_from(raw)
}

/// Normalize an optional reference (e.g. a vehicle's contractor).
///
/// Null and blank strings mean "unassigned".
pub fn normalize_optional(raw: Option<RawId>) -> Result<Option<i64>, IdError> {
    match raw {
        None => Ok(None),
        Some(RawId::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(raw) => i64::try_from(raw).map(Some),
    }
}

/// Normalize a telemetry device reference.
///
/// Tracking providers never hand out device `0`, and the legacy store uses it
/// as "no device", so it is treated the same as null.
pub fn normalize_device(raw: Option<RawId>) -> Result<Option<DeviceId>, IdError> {
    Ok(normalize_optional(raw)?.filter(|id| *id != 0))
}
