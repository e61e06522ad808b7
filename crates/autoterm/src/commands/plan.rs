use autoterm_engine::CycleReport;

use super::{build_orchestrator, load_config, open_fleet, resolve_at};
use crate::Common;
use crate::output::format_report;

/// Run one dry cycle against the inventory.
pub async fn plan_report(common: &Common) -> anyhow::Result<CycleReport> {
    let config = load_config(common.config.as_deref())?;
    let fleet = open_fleet(&common.inventory)?;
    let now = resolve_at(common.at.as_deref())?;
    Ok(build_orchestrator(&config, &fleet, true)?.run_cycle(now).await)
}

pub async fn plan(common: &Common, format: &str) -> anyhow::Result<()> {
    let report = plan_report(common).await?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => {
            println!("{}", format_report(&report));
        }
    }

    Ok(())
}
