use anyhow::Result;
use clap::{Parser, Subcommand};
use datamarket_rs::{
    commands, config,
    infrastructure::observability,
    startup,
};
use chrono::NaiveDate;
use dotenvy::dotenv;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// Client for the DataMarketplace contract.
#[derive(Parser, Debug)]
#[command(name = "datamarket", version)]
struct Args {
    #[arg(long)]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Connect the wallet and record a description on-chain
    Submit {
        #[arg(long)]
        description: String,
    },
    /// List active data-collection campaigns
    Campaigns {
        #[arg(long)]
        json: bool,
        /// Only campaigns still accepting data on this day (YYYY-MM-DD)
        #[arg(long)]
        open_on: Option<NaiveDate>,
    },
    /// Follow NewDataCreated and AIAgentResponded events
    Watch {
        #[arg(long)]
        from_block: Option<u64>,
    },
    /// Respond to a data entry as the AI agent
    Respond {
        #[arg(long)]
        index: u32,
        #[arg(long)]
        invalid: bool,
    },
    /// Check the deployed contract against the deployment descriptor
    Verify,
    /// Print Hardhat Ignition parameters for the deployment descriptor
    DeploymentParams,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    observability::init_tracing();

    let args = Args::parse();

    match args.command {
        Command::Campaigns { json, open_on } => {
            let cfg = config::load_config(&args.config)?;
            let active = commands::list_campaigns(&cfg, open_on);
            if json {
                println!("{}", serde_json::to_string_pretty(&active)?);
            } else {
                print!("{}", commands::render_campaigns(&active));
            }
        }
        Command::DeploymentParams => {
            let cfg = config::load_config(&args.config)?;
            println!("{}", serde_json::to_string_pretty(&commands::deployment_params(&cfg)?)?);
        }
        Command::Submit { description } => {
            let app = startup::build(&args.config)?;
            let receipt = commands::submit(&app, &description).await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        Command::Respond { index, invalid } => {
            let app = startup::build(&args.config)?;
            let receipt = commands::respond(&app, index, !invalid).await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        Command::Verify => {
            let app = startup::build(&args.config)?;
            let report = commands::verify(&app).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
            if !report.is_consistent() {
                anyhow::bail!("deployed aiAgent does not match the deployment descriptor");
            }
        }
        Command::Watch { from_block } => {
            let app = startup::build(&args.config)?;
            let shutdown = CancellationToken::new();
            tokio::spawn(forward_signals(shutdown.clone()));
            commands::watch(&app, from_block, shutdown).await?;
        }
    }

    Ok(())
}

async fn forward_signals(shutdown: CancellationToken) {
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut s) => {
                s.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => { info!("Ctrl-C received, shutting down"); },
        _ = sigterm => { info!("SIGTERM received, shutting down"); },
    }
    shutdown.cancel();
}
