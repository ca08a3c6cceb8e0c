use crate::application::{
    agent,
    deployment::{self, DeploymentReport},
    watcher::EventWatcher,
};
use crate::config::Config;
use crate::domain::{
    campaign::{active_campaigns, Campaign},
    marketplace::SubmissionReceipt,
};
use crate::infrastructure::observability;
use crate::startup::App;
use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde_json::Value;
use std::fmt::Write as _;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Connects the configured wallet and records `description` on-chain.
pub async fn submit(app: &App, description: &str) -> Result<SubmissionReceipt> {
    let account = app.session.connect().await?;
    info!(session_id = %app.session.id(), "Submitting as {:?}", account);
    let receipt = app.session.submit_description(description).await?;
    Ok(receipt)
}

/// Reads entry `index` and sends the agent's verdict for it.
pub async fn respond(app: &App, index: u32, is_valid: bool) -> Result<SubmissionReceipt> {
    app.session.connect().await?;
    let contract = app.session.bound_contract()?;
    let receipt = agent::respond_to_data(app.reader.as_ref(), contract.as_ref(), index, is_valid).await?;
    Ok(receipt)
}

pub async fn verify(app: &App) -> Result<DeploymentReport> {
    let descriptor = app
        .config
        .deployment_descriptor()?
        .context("verify needs a deployment section in the config")?;
    let contract = app.config.marketplace_address()?;
    let report = deployment::verify_deployment(app.reader.as_ref(), contract, &descriptor).await?;
    Ok(report)
}

pub fn deployment_params(cfg: &Config) -> Result<Value> {
    let descriptor = cfg
        .deployment_descriptor()?
        .context("deployment-params needs a deployment section in the config")?;
    Ok(descriptor.ignition_parameters())
}

/// Polls marketplace events until `shutdown` fires.
pub async fn watch(app: &App, from_block: Option<u64>, shutdown: CancellationToken) -> Result<()> {
    if let Some(metrics) = &app.config.metrics {
        let handle = observability::init_metrics()?;
        let port = metrics.port;
        tokio::spawn(async move {
            if let Err(e) = observability::start_metrics_server(handle, port).await {
                error!("Metrics server failed: {:#}", e);
            }
        });
    }

    let interval = Duration::from_secs(app.config.watch.poll_interval_secs);
    let mut watcher = match from_block {
        Some(block) => EventWatcher::new(app.reader.clone(), interval, block),
        None => EventWatcher::from_lookback(app.reader.clone(), interval, app.config.watch.lookback_blocks)
            .await
            .context("read current block")?,
    }
    .with_max_block_range(app.config.watch.max_block_range);

    info!("Starting DataMarketplace event watcher");
    watcher.run(shutdown).await;
    Ok(())
}

/// Active campaigns, narrowed to those whose deadline has not passed on `open_on`.
pub fn list_campaigns(cfg: &Config, open_on: Option<NaiveDate>) -> Vec<Campaign> {
    let campaigns = cfg.campaigns();
    active_campaigns(&campaigns)
        .into_iter()
        .filter(|c| open_on.map_or(true, |day| c.is_open_on(day)))
        .cloned()
        .collect()
}

pub fn render_campaigns(campaigns: &[Campaign]) -> String {
    let mut out = String::from("Active Campaigns\n");
    for c in campaigns {
        let _ = writeln!(out, "\n[{}] {} ({})", c.id, c.title, c.category);
        let _ = writeln!(out, "    {}", c.description);
        let _ = writeln!(out, "    Deadline: {}", c.deadline);
        let _ = writeln!(
            out,
            "    {} / {} submissions ({}%)",
            c.submissions_count,
            c.required_submissions,
            c.progress_percent()
        );
    }
    out
}
