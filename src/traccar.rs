//! Traccar HTTP adapter for live positions.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::debug;

use crate::error::AdapterError;
use crate::ids::{self, RawId};
use crate::traits::TelemetryAdapter;
use crate::types::{Device, Position};

/// Traccar reports speed in knots.
const KNOTS_TO_KMH: f64 = 1.852;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraccarConfig {
    pub base_url: String,
    pub username: String,
    pub password: String,
    pub timeout_secs: u64,
}

impl TraccarConfig {
    pub fn new(base_url: impl Into<String>, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            username: username.into(),
            password: password.into(),
            timeout_secs: 10,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[derive(Debug, Clone)]
pub struct TraccarClient {
    config: TraccarConfig,
    client: reqwest::blocking::Client,
}

impl TraccarClient {
    pub fn new(config: TraccarConfig) -> Result<Self, AdapterError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| AdapterError::Http {
                url: config.base_url.clone(),
                source,
            })?;

        Ok(Self { config, client })
    }

    fn get(&self, path: &str) -> Result<String, AdapterError> {
        let url = self.config.url(path);
        let response = self
            .client
            .get(&url)
            .basic_auth(&self.config.username, Some(&self.config.password))
            .header("Accept", "application/json")
            .send()
            .map_err(|source| AdapterError::Http {
                url: url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AdapterError::Status {
                url,
                status: status.as_u16(),
            });
        }

        response.text().map_err(|source| AdapterError::Http { url, source })
    }
}

impl TelemetryAdapter for TraccarClient {
    fn latest_positions(&self) -> Result<Vec<Position>, AdapterError> {
        let body = self.get("/api/positions")?;
        let positions = decode_positions(&body)?;
        debug!(count = positions.len(), "fetched traccar positions");
        Ok(positions)
    }

    fn devices(&self) -> Result<Vec<Device>, AdapterError> {
        let body = self.get("/api/devices")?;
        decode_devices(&body)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TraccarPosition {
    device_id: Option<RawId>,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    speed: Option<f64>,
    #[serde(default)]
    course: Option<f64>,
    #[serde(default)]
    fix_time: Option<DateTime<Utc>>,
    #[serde(default)]
    device_time: Option<DateTime<Utc>>,
    #[serde(default)]
    server_time: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TraccarDevice {
    id: Option<RawId>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    unique_id: String,
}

/// Decode a `/api/positions` body into domain positions.
pub fn decode_positions(body: &str) -> Result<Vec<Position>, AdapterError> {
    let raw: Vec<TraccarPosition> = serde_json::from_str(body)?;
    raw.into_iter()
        .map(|p| -> Result<Position, AdapterError> {
            let device_id = ids::normalize(p.device_id, "position deviceId")?;
            let timestamp = p
                .fix_time
                .or(p.device_time)
                .or(p.server_time)
                .ok_or_else(|| AdapterError::InvalidRecord(format!("position for device {device_id} has no time")))?;

            Ok(Position {
                device_id,
                lat: p.latitude,
                lon: p.longitude,
                speed: p.speed.unwrap_or(0.0).max(0.0) * KNOTS_TO_KMH,
                course: p.course,
                timestamp,
            })
        })
        .collect()
}

/// Decode a `/api/devices` body.
pub fn decode_devices(body: &str) -> Result<Vec<Device>, AdapterError> {
    let raw: Vec<TraccarDevice> = serde_json::from_str(body)?;
    raw.into_iter()
        .map(|d| -> Result<Device, AdapterError> {
            Ok(Device {
                id: ids::normalize(d.id, "device id")?,
                name: d.name,
                unique_id: d.unique_id,
            })
        })
        .collect()
}

/// Deterministic stand-in for an unconfigured tracking provider: two George
/// Town trucks, one moving and one parked.
#[derive(Debug, Clone)]
pub struct FallbackTelemetry {
    observed_at: DateTime<Utc>,
}

impl FallbackTelemetry {
    pub fn new(observed_at: DateTime<Utc>) -> Self {
        Self { observed_at }
    }
}

impl Default for FallbackTelemetry {
    fn default() -> Self {
        Self::new(Utc::now())
    }
}

impl TelemetryAdapter for FallbackTelemetry {
    fn latest_positions(&self) -> Result<Vec<Position>, AdapterError> {
        Ok(vec![
            Position {
                device_id: 1,
                lat: 5.417,
                lon: 100.329,
                speed: 12.3,
                course: Some(90.0),
                timestamp: self.observed_at,
            },
            Position {
                device_id: 2,
                lat: 5.420,
                lon: 100.315,
                speed: 0.0,
                course: Some(0.0),
                timestamp: self.observed_at,
            },
        ])
    }

    fn devices(&self) -> Result<Vec<Device>, AdapterError> {
        Ok(vec![
            Device {
                id: 1,
                name: "Truck 01".to_string(),
                unique_id: "TRUCK01".to_string(),
            },
            Device {
                id: 2,
                name: "Truck 02".to_string(),
                unique_id: "TRUCK02".to_string(),
            },
        ])
    }
}
