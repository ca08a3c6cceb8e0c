use crate::{
    application::{
        ports::{MarketplaceReader, WalletProvider},
        session::{SessionOptions, SubmissionSession},
    },
    config::{self, Config, WalletMode},
    contracts::DataMarketplace,
    infrastructure::{
        ethereum_adapter::EthersMarketplaceReader, wallet_key::PrivateKeyWallet,
        wallet_rpc::RpcWallet,
    },
};
use anyhow::{Context, Result};
use ethers::prelude::*;
use std::{path::Path, sync::Arc, time::Duration};
use tracing::info;

/// Everything a command needs, wired from one config file.
pub struct App {
    pub config: Config,
    pub session: Arc<SubmissionSession>,
    pub reader: Arc<dyn MarketplaceReader>,
}

pub fn build(config_path: impl AsRef<Path>) -> Result<App> {
    let cfg = config::load_config(config_path)?;
    build_from(cfg)
}

pub fn build_from(cfg: Config) -> Result<App> {
    let provider = Provider::<Http>::try_from(cfg.network.rpc_url.as_str())
        .with_context(|| format!("Invalid rpc_url {}", cfg.network.rpc_url))?
        .interval(Duration::from_millis(cfg.network.poll_interval_ms));
    let marketplace = cfg.marketplace_address()?;
    let confirmations = cfg.submission.confirmations;

    let wallet: Arc<dyn WalletProvider> = match cfg.wallet.mode {
        WalletMode::Rpc => {
            info!("Using node-managed accounts at {}", cfg.network.rpc_url);
            Arc::new(RpcWallet::new(provider.clone(), confirmations))
        }
        WalletMode::PrivateKey => {
            info!("Using private key from env {}", cfg.wallet.private_key_env);
            Arc::new(PrivateKeyWallet::new(
                provider.clone(),
                cfg.wallet.private_key_env.clone(),
                cfg.network.chain_id,
                confirmations,
            ))
        }
    };

    let reader = Arc::new(EthersMarketplaceReader::new(DataMarketplace::new(
        marketplace,
        Arc::new(provider),
    )));

    let session = Arc::new(SubmissionSession::new(
        wallet,
        SessionOptions {
            contract_address: marketplace,
            confirmation_timeout: cfg.submission.timeout(),
        },
    ));

    Ok(App {
        config: cfg,
        session,
        reader,
    })
}
