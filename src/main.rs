use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use collection_planner::config::Config;
use collection_planner::error::AdapterError;
use collection_planner::fallback::WithFallback;
use collection_planner::memory::{InMemoryRegistry, RecordingSink};
use collection_planner::service::{FleetMonitor, RoutePlanner, RouteRequest, plan_route};
use collection_planner::supabase::SupabaseClient;
use collection_planner::traccar::{FallbackTelemetry, TraccarClient};
use collection_planner::traits::RegistryAdapter;
use collection_planner::types::{Assignment, Contractor, Stop, Vehicle};

#[derive(Debug, Parser)]
#[command(name = "collection-planner", about = "Waste-collection route planning and fleet metrics")]
struct Cli {
    /// Read vehicles, contractors and bins from a JSON seed file instead of
    /// the hosted store.
    #[arg(long, global = true)]
    seed: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Active/idle counts and per-contractor fleet sizes.
    Metrics,
    /// Fleet metrics plus bin fill-level counts.
    Overview,
    /// Order the selected bins into a route and create its tasks.
    Optimize {
        #[arg(long = "bin", required = true)]
        bins: Vec<String>,
        #[arg(long)]
        vehicle: i64,
        #[arg(long)]
        contractor: i64,
        /// Print the plan without saving it.
        #[arg(long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::from_env().context("invalid configuration")?;

    let registry = build_registry(&config, cli.seed.as_ref())?;

    match cli.command {
        Command::Metrics => {
            let monitor = FleetMonitor::new(build_telemetry(&config)?, registry, config.plan.clone());
            print_json(&monitor.metrics().context("failed to compute metrics")?)
        }
        Command::Overview => {
            let monitor = FleetMonitor::new(build_telemetry(&config)?, registry, config.plan.clone());
            print_json(&monitor.overview().context("failed to build overview")?)
        }
        Command::Optimize {
            bins,
            vehicle,
            contractor,
            dry_run,
        } => {
            let assignment = Assignment {
                vehicle_id: vehicle,
                contractor_id: contractor,
            };

            if dry_run {
                let stops = registry.stops(&bins).context("failed to fetch bins")?;
                let plan = plan_route(&stops, assignment, Utc::now(), &config.plan)?;
                return print_json(&plan);
            }

            let request = RouteRequest {
                selected_stop_ids: bins,
                assignment,
            };
            let plan = match &config.supabase {
                Some(supabase) => {
                    let sink = SupabaseClient::new(supabase.clone())?;
                    RoutePlanner::new(registry, sink, config.plan.clone()).plan(&request, Utc::now())?
                }
                None => {
                    warn!("no hosted store configured, plan is kept in memory only");
                    RoutePlanner::new(registry, RecordingSink::new(), config.plan.clone()).plan(&request, Utc::now())?
                }
            };
            print_json(&plan)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Registry source: seed file, hosted store, or the demo data when neither is
/// given.
enum Registry {
    Memory(InMemoryRegistry),
    Hosted(SupabaseClient),
}

fn build_registry(config: &Config, seed: Option<&PathBuf>) -> Result<Registry> {
    if let Some(path) = seed {
        let file = File::open(path).with_context(|| format!("failed to open seed file {}", path.display()))?;
        let registry = InMemoryRegistry::from_seed_reader(BufReader::new(file))
            .with_context(|| format!("failed to load seed file {}", path.display()))?;
        return Ok(Registry::Memory(registry));
    }

    match &config.supabase {
        Some(supabase) => Ok(Registry::Hosted(SupabaseClient::new(supabase.clone())?)),
        None => {
            warn!("SUPABASE_URL/SUPABASE_ANON_KEY not set, using demo registry");
            Ok(Registry::Memory(InMemoryRegistry::demo()))
        }
    }
}

fn build_telemetry(config: &Config) -> Result<WithFallback<Option<TraccarClient>, FallbackTelemetry>> {
    let primary = match &config.traccar {
        Some(traccar) => Some(TraccarClient::new(traccar.clone())?),
        None => {
            warn!("TRACCAR_BASE_URL/USERNAME/PASSWORD not set, using demo positions");
            None
        }
    };
    Ok(WithFallback::new(primary, FallbackTelemetry::default()))
}

impl RegistryAdapter for Registry {
    fn vehicles(&self) -> Result<Vec<Vehicle>, AdapterError> {
        match self {
            Registry::Memory(r) => r.vehicles(),
            Registry::Hosted(r) => r.vehicles(),
        }
    }

    fn contractors(&self) -> Result<Vec<Contractor>, AdapterError> {
        match self {
            Registry::Memory(r) => r.contractors(),
            Registry::Hosted(r) => r.contractors(),
        }
    }

    fn stops(&self, ids: &[String]) -> Result<Vec<Stop>, AdapterError> {
        match self {
            Registry::Memory(r) => r.stops(ids),
            Registry::Hosted(r) => r.stops(ids),
        }
    }

    fn all_stops(&self) -> Result<Vec<Stop>, AdapterError> {
        match self {
            Registry::Memory(r) => r.all_stops(),
            Registry::Hosted(r) => r.all_stops(),
        }
    }
}
