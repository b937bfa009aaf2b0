//! Configuration from the environment.

use std::str::FromStr;

use crate::error::ConfigError;
use crate::solver::PlanOptions;
use crate::supabase::SupabaseConfig;
use crate::traccar::TraccarConfig;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    /// Present only when base URL, username and password are all set.
    pub traccar: Option<TraccarConfig>,
    /// Present only when URL and anon key are both set.
    pub supabase: Option<SupabaseConfig>,
    pub plan: PlanOptions,
}

impl Config {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let traccar = match (get("TRACCAR_BASE_URL"), get("TRACCAR_USERNAME"), get("TRACCAR_PASSWORD")) {
            (Some(base_url), Some(username), Some(password)) => {
                let mut config = TraccarConfig::new(base_url, username, password);
                if let Some(timeout) = parse(&get, "TRACCAR_TIMEOUT_SECS")? {
                    config.timeout_secs = timeout;
                }
                Some(config)
            }
            _ => None,
        };

        let supabase = match (get("SUPABASE_URL"), get("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => {
                let mut config = SupabaseConfig::new(url, anon_key);
                config.service_role_key = get("SUPABASE_SERVICE_ROLE_KEY");
                Some(config)
            }
            _ => None,
        };

        let defaults = PlanOptions::default();
        let plan = PlanOptions {
            service_minutes_per_stop: parse(&get, "PLANNER_SERVICE_MINUTES_PER_STOP")?
                .unwrap_or(defaults.service_minutes_per_stop),
            drive_minutes_per_km: parse(&get, "PLANNER_DRIVE_MINUTES_PER_KM")?
                .unwrap_or(defaults.drive_minutes_per_km),
            high_priority_fill: parse(&get, "PLANNER_HIGH_PRIORITY_FILL")?.unwrap_or(defaults.high_priority_fill),
            critical_fill: parse(&get, "PLANNER_CRITICAL_FILL")?.unwrap_or(defaults.critical_fill),
        };
        validate_plan(&plan)?;

        Ok(Self {
            traccar,
            supabase,
            plan,
        })
    }
}

fn parse<T, G>(get: &G, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    G: Fn(&str) -> Option<String>,
{
    match get(key) {
        None => Ok(None),
        Some(value) => value.parse::<T>().map(Some).map_err(|err| ConfigError::Invalid {
            key,
            reason: err.to_string(),
            value,
        }),
    }
}

fn validate_plan(plan: &PlanOptions) -> Result<(), ConfigError> {
    let invalid = |key: &'static str, value: String, reason: &str| ConfigError::Invalid {
        key,
        value,
        reason: reason.to_string(),
    };

    if plan.service_minutes_per_stop < 0 {
        return Err(invalid(
            "PLANNER_SERVICE_MINUTES_PER_STOP",
            plan.service_minutes_per_stop.to_string(),
            "must not be negative",
        ));
    }
    if !plan.drive_minutes_per_km.is_finite() || plan.drive_minutes_per_km < 0.0 {
        return Err(invalid(
            "PLANNER_DRIVE_MINUTES_PER_KM",
            plan.drive_minutes_per_km.to_string(),
            "must be a non-negative number",
        ));
    }
    for (key, value) in [
        ("PLANNER_HIGH_PRIORITY_FILL", plan.high_priority_fill),
        ("PLANNER_CRITICAL_FILL", plan.critical_fill),
    ] {
        if !(0.0..=100.0).contains(&value) {
            return Err(invalid(key, value.to_string(), "must be a percentage in [0, 100]"));
        }
    }
    Ok(())
}
