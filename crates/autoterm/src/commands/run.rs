use std::time::Duration;

use anyhow::{Context, bail};
use tokio::sync::watch;
use tracing::{error, info};

use autoterm_core::config::parse_duration;

use super::{build_orchestrator, load_config, open_fleet, resolve_at};
use crate::Common;
use crate::output::format_report;

pub async fn run(common: &Common, interval: Option<&str>, save: bool) -> anyhow::Result<()> {
    let config = load_config(common.config.as_deref())?;
    let fleet = open_fleet(&common.inventory)?;
    let orchestrator = build_orchestrator(&config, &fleet, false)?;

    match interval {
        None => {
            let now = resolve_at(common.at.as_deref())?;
            let report = orchestrator.run_cycle(now).await;
            println!("{}", format_report(&report));
        }
        Some(raw) => {
            if common.at.is_some() {
                bail!("--at pins a single instant and cannot be combined with --interval");
            }
            let interval = parse_interval(raw)?;
            let (shutdown_tx, shutdown_rx) = watch::channel(false);

            tokio::spawn(async move {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    error!(error = %e, "failed to listen for Ctrl-C");
                    return;
                }
                info!("shutdown signal received");
                let _ = shutdown_tx.send(true);
            });

            orchestrator.run(interval, shutdown_rx).await;
        }
    }

    if save {
        fleet
            .save(&common.inventory)
            .await
            .with_context(|| format!("saving inventory {}", common.inventory.display()))?;
        info!(path = %common.inventory.display(), "inventory saved");
    }
    Ok(())
}

fn parse_interval(raw: &str) -> anyhow::Result<Duration> {
    match parse_duration(raw) {
        Some(d) if !d.is_zero() => Ok(d),
        _ => bail!("--interval {raw:?} is not a positive duration like \"30s\" or \"1m\""),
    }
}
