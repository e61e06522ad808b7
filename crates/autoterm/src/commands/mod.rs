pub mod check;
pub mod plan;
pub mod run;

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use chrono::{DateTime, Utc};

use autoterm_core::AutotermConfig;
use autoterm_engine::{FleetOrchestrator, ResourceProcessor};
use autoterm_inventory::InMemoryFleet;

/// Load `autoterm.toml`, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<AutotermConfig> {
    match path {
        Some(p) => AutotermConfig::from_file(p)
            .with_context(|| format!("loading config {}", p.display())),
        None => Ok(AutotermConfig::default()),
    }
}

pub fn open_fleet(path: &Path) -> anyhow::Result<InMemoryFleet> {
    InMemoryFleet::open(path).with_context(|| format!("loading inventory {}", path.display()))
}

/// Evaluation instant from `--at`, or the current time.
pub fn resolve_at(at: Option<&str>) -> anyhow::Result<DateTime<Utc>> {
    match at {
        Some(raw) => Ok(DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("--at {raw:?} is not an RFC 3339 timestamp"))?
            .with_timezone(&Utc)),
        None => Ok(Utc::now()),
    }
}

/// Wire the in-memory fleet into a processor and orchestrator.
pub fn build_orchestrator(
    config: &AutotermConfig,
    fleet: &InMemoryFleet,
    dry_run: bool,
) -> anyhow::Result<FleetOrchestrator> {
    let processor = Arc::new(
        ResourceProcessor::new(config, Arc::new(fleet.clone()), Arc::new(fleet.clone()))
            .with_dry_run(dry_run),
    );
    let orchestrator =
        FleetOrchestrator::from_config(&config.fleet, Arc::new(fleet.clone()), processor)?;
    Ok(orchestrator)
}
