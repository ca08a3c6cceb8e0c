use crate::application::ports::{MarketplaceSigner, WalletProvider};
use crate::domain::errors::DomainError;
use crate::infrastructure::ethereum_adapter::EthersSigner;
use async_trait::async_trait;
use ethers::prelude::*;
use std::sync::Arc;

pub const DEFAULT_KEY_ENV: &str = "MARKETPLACE_PRIVATE_KEY";

/// Wallet backed by a private key taken from the environment; signs locally.
pub struct PrivateKeyWallet<P: JsonRpcClient> {
    provider: Provider<P>,
    key_env: String,
    chain_id: u64,
    confirmations: usize,
}

impl<P: JsonRpcClient + Clone + 'static> PrivateKeyWallet<P> {
    pub fn new(provider: Provider<P>, key_env: impl Into<String>, chain_id: u64, confirmations: usize) -> Self {
        Self {
            provider,
            key_env: key_env.into(),
            chain_id,
            confirmations,
        }
    }

    fn load_wallet(&self) -> Result<LocalWallet, DomainError> {
        let pk = std::env::var(&self.key_env).map_err(|_| {
            DomainError::WalletUnavailable(format!(
                "Missing env {} (DO NOT put private keys in yaml)",
                self.key_env
            ))
        })?;
        let wallet = pk.trim().parse::<LocalWallet>().map_err(|e| {
            DomainError::Config(format!("Invalid private key in {}: {}", self.key_env, e))
        })?;
        Ok(wallet.with_chain_id(self.chain_id))
    }
}

#[async_trait]
impl<P: JsonRpcClient + Clone + 'static> WalletProvider for PrivateKeyWallet<P> {
    async fn request_accounts(&self) -> Result<Vec<Address>, DomainError> {
        let wallet = self.load_wallet()?;
        let chain_id = self
            .provider
            .get_chainid()
            .await
            .map_err(|e| DomainError::WalletUnavailable(e.to_string()))?;
        if chain_id != U256::from(self.chain_id) {
            return Err(DomainError::Config(format!(
                "node reports chain id {} but config expects {}",
                chain_id, self.chain_id
            )));
        }
        Ok(vec![wallet.address()])
    }

    async fn signer(&self, account: Address) -> Result<Arc<dyn MarketplaceSigner>, DomainError> {
        let wallet = self.load_wallet()?;
        if wallet.address() != account {
            return Err(DomainError::WalletUnavailable(format!(
                "account {:?} is not managed by this wallet",
                account
            )));
        }
        let client = SignerMiddleware::new(self.provider.clone(), wallet);
        Ok(Arc::new(EthersSigner::new(
            Arc::new(client),
            account,
            self.confirmations,
        )))
    }
}
