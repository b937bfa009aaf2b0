//! Supabase (PostgREST) adapter for the registry and for saving planned
//! routes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::error::AdapterError;
use crate::ids::{ContractorId, VehicleId};
use crate::records::{self, BinRecord, ContractorRecord, VehicleRecord};
use crate::traits::{RegistryAdapter, RouteSink};
use crate::types::{Contractor, PlannedRoute, Priority, Stop, TaskStatus, Vehicle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
    /// Needed for writes and for tables hidden from the anonymous role.
    pub service_role_key: Option<String>,
    pub timeout_secs: u64,
}

impl SupabaseConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            anon_key: anon_key.into(),
            service_role_key: None,
            timeout_secs: 10,
        }
    }

    pub fn with_service_role_key(mut self, key: impl Into<String>) -> Self {
        self.service_role_key = Some(key.into());
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.url.trim_end_matches('/'), table)
    }

    fn read_key(&self) -> &str {
        self.service_role_key.as_deref().unwrap_or(&self.anon_key)
    }
}

#[derive(Debug, Clone)]
pub struct SupabaseClient {
    config: SupabaseConfig,
    client: reqwest::blocking::Client,
}

impl SupabaseClient {
    pub fn new(config: SupabaseConfig) -> Result<Self, AdapterError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|source| AdapterError::Http {
                url: config.url.clone(),
                source,
            })?;

        Ok(Self { config, client })
    }

    fn select<T: DeserializeOwned>(&self, table: &str, filters: &[(&str, String)]) -> Result<Vec<T>, AdapterError> {
        let url = self.config.table_url(table);
        let key = self.config.read_key();

        let mut query: Vec<(&str, String)> = vec![("select", "*".to_string())];
        query.extend(filters.iter().cloned());

        let response = self
            .client
            .get(&url)
            .query(&query)
            .header("apikey", key)
            .bearer_auth(key)
            .send()
            .map_err(|source| AdapterError::Http {
                url: url.clone(),
                source,
            })?;

        let body = check_status(response, &url)?
            .text()
            .map_err(|source| AdapterError::Http { url, source })?;
        Ok(serde_json::from_str(&body)?)
    }

    fn insert<T: Serialize>(&self, table: &str, rows: &[T]) -> Result<(), AdapterError> {
        let key = self
            .config
            .service_role_key
            .as_deref()
            .ok_or(AdapterError::NotConfigured("supabase service role key"))?;
        let url = self.config.table_url(table);

        let response = self
            .client
            .post(&url)
            .header("apikey", key)
            .bearer_auth(key)
            .header("Prefer", "return=minimal")
            .json(rows)
            .send()
            .map_err(|source| AdapterError::Http {
                url: url.clone(),
                source,
            })?;

        check_status(response, &url)?;
        debug!(table, rows = rows.len(), "inserted rows");
        Ok(())
    }
}

fn check_status(
    response: reqwest::blocking::Response,
    url: &str,
) -> Result<reqwest::blocking::Response, AdapterError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(AdapterError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

/// PostgREST `in` filter over bin identifiers.
pub fn in_filter(ids: &[String]) -> String {
    let quoted: Vec<String> = ids
        .iter()
        .map(|id| format!("\"{}\"", id.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("in.({})", quoted.join(","))
}

impl RegistryAdapter for SupabaseClient {
    fn vehicles(&self) -> Result<Vec<Vehicle>, AdapterError> {
        let rows: Vec<VehicleRecord> = self.select("vehicles", &[])?;
        records::convert_all(rows)
    }

    fn contractors(&self) -> Result<Vec<Contractor>, AdapterError> {
        let rows: Vec<ContractorRecord> = self.select("contractors", &[])?;
        records::convert_all(rows)
    }

    fn stops(&self, ids: &[String]) -> Result<Vec<Stop>, AdapterError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows: Vec<BinRecord> = self.select(
            "smart_bins",
            &[("bin_id", in_filter(ids)), ("order", "bin_id".to_string())],
        )?;
        records::convert_all(rows)
    }

    fn all_stops(&self) -> Result<Vec<Stop>, AdapterError> {
        let rows: Vec<BinRecord> = self.select("smart_bins", &[("order", "bin_id".to_string())])?;
        records::convert_all(rows)
    }
}

/// A `collection_routes` row.
#[derive(Debug, Serialize)]
pub struct RouteRow<'a> {
    pub route_name: String,
    pub contractor_id: ContractorId,
    pub vehicle_id: VehicleId,
    pub route_order: &'a [String],
    pub estimated_duration_minutes: i64,
    pub total_distance_km: f64,
    pub status: &'static str,
}

/// A `collection_tasks` row.
#[derive(Debug, Serialize)]
pub struct TaskRow<'a> {
    pub bin_id: &'a str,
    pub vehicle_id: VehicleId,
    pub assigned_contractor_id: ContractorId,
    pub task_type: &'static str,
    pub priority: Priority,
    pub status: TaskStatus,
    pub scheduled_time: DateTime<Utc>,
}

pub fn route_row(plan: &PlannedRoute, created_at: DateTime<Utc>) -> RouteRow<'_> {
    RouteRow {
        route_name: format!(
            "Optimized Route {}",
            created_at.to_rfc3339_opts(SecondsFormat::Millis, true)
        ),
        contractor_id: plan.assignment.contractor_id,
        vehicle_id: plan.assignment.vehicle_id,
        route_order: &plan.route.ordered_stop_ids,
        estimated_duration_minutes: plan.estimated_duration_minutes,
        total_distance_km: plan.route.total_distance_km,
        status: "planned",
    }
}

pub fn task_rows(plan: &PlannedRoute) -> Vec<TaskRow<'_>> {
    plan.tasks
        .iter()
        .map(|task| TaskRow {
            bin_id: &task.stop_id,
            vehicle_id: task.vehicle_id,
            assigned_contractor_id: task.contractor_id,
            task_type: "collection",
            priority: task.priority,
            status: task.status,
            scheduled_time: task.scheduled_time,
        })
        .collect()
}

impl RouteSink for SupabaseClient {
    fn save(&self, plan: &PlannedRoute) -> Result<(), AdapterError> {
        self.insert("collection_routes", &[route_row(plan, Utc::now())])?;
        if !plan.tasks.is_empty() {
            self.insert("collection_tasks", &task_rows(plan))?;
        }
        info!(
            vehicle_id = plan.assignment.vehicle_id,
            tasks = plan.tasks.len(),
            "saved planned route"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    use crate::types::{Assignment, Route, Task};

    fn plan() -> PlannedRoute {
        let at = Utc.with_ymd_and_hms(2026, 3, 2, 7, 0, 0).unwrap();
        PlannedRoute {
            route: Route {
                ordered_stop_ids: vec!["BIN003".to_string(), "BIN004".to_string()],
                total_distance_km: 0.42,
            },
            estimated_duration_minutes: 31,
            assignment: Assignment {
                vehicle_id: 1,
                contractor_id: 10,
            },
            tasks: vec![Task {
                stop_id: "BIN003".to_string(),
                vehicle_id: 1,
                contractor_id: 10,
                priority: Priority::High,
                status: TaskStatus::Pending,
                scheduled_time: at,
            }],
        }
    }

    #[test]
    fn test_in_filter_quotes_ids() {
        let ids = vec!["BIN001".to_string(), "BIN,2".to_string()];
        assert_eq!(in_filter(&ids), r#"in.("BIN001","BIN,2")"#);
    }

    #[test]
    fn test_table_url() {
        let config = SupabaseConfig::new("https://example.supabase.co/", "anon");
        assert_eq!(config.table_url("vehicles"), "https://example.supabase.co/rest/v1/vehicles");
    }

    #[test]
    fn test_read_key_prefers_service_role() {
        let config = SupabaseConfig::new("https://example.supabase.co", "anon");
        assert_eq!(config.read_key(), "anon");
        let config = config.with_service_role_key("service");
        assert_eq!(config.read_key(), "service");
    }

    #[test]
    fn test_route_row_shape() {
        let plan = plan();
        let created = Utc.with_ymd_and_hms(2026, 3, 2, 6, 59, 0).unwrap();
        let row = serde_json::to_value(route_row(&plan, created)).unwrap();

        assert_eq!(row["route_name"], "Optimized Route 2026-03-02T06:59:00.000Z");
        assert_eq!(row["route_order"], serde_json::json!(["BIN003", "BIN004"]));
        assert_eq!(row["estimated_duration_minutes"], 31);
        assert_eq!(row["status"], "planned");
    }

    #[test]
    fn test_task_rows_shape() {
        let plan = plan();
        let rows = serde_json::to_value(task_rows(&plan)).unwrap();

        assert_eq!(rows[0]["bin_id"], "BIN003");
        assert_eq!(rows[0]["assigned_contractor_id"], 10);
        assert_eq!(rows[0]["task_type"], "collection");
        assert_eq!(rows[0]["priority"], "high");
        assert_eq!(rows[0]["status"], "pending");
    }

    #[test]
    fn test_save_without_service_key_is_not_configured() {
        let client = SupabaseClient::new(SupabaseConfig::new("http://127.0.0.1:9", "anon")).unwrap();
        assert!(matches!(
            client.save(&plan()),
            Err(AdapterError::NotConfigured("supabase service role key"))
        ));
    }
}
