//! collection-planner core
//!
//! Route ordering for waste-collection stops and fleet metrics computed from
//! live telemetry against a vehicle/contractor registry.

pub mod config;
pub mod error;
pub mod fallback;
pub mod haversine;
pub mod ids;
pub mod memory;
pub mod metrics;
pub mod records;
pub mod service;
pub mod solver;
pub mod supabase;
pub mod tasks;
pub mod traccar;
pub mod traits;
pub mod types;
