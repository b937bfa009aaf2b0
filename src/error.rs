//! Error types for adapters, planning and configuration.

use thiserror::Error;

use crate::ids::IdError;

/// Failure reported by a registry, telemetry or persistence collaborator.
#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid record: {0}")]
    InvalidRecord(String),

    #[error(transparent)]
    Identifier(#[from] IdError),
}

/// Failure of a route planning operation.
#[derive(Debug, Error)]
pub enum PlanError {
    /// The caller asked for a route over an empty bin selection.
    #[error("no bins selected")]
    NoStops,

    #[error("stop {stop_id} has a malformed coordinate ({lat}, {lon})")]
    MalformedCoordinate { stop_id: String, lat: f64, lon: f64 },

    /// An ordered identifier does not belong to the stop set it was
    /// materialized against.
    #[error("stop {0} is not part of the route's stop set")]
    UnknownStop(String),

    #[error("failed to fetch from registry: {0}")]
    Registry(#[source] AdapterError),

    #[error("failed to persist route: {0}")]
    Persist(#[source] AdapterError),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{key}={value:?} is invalid: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}
