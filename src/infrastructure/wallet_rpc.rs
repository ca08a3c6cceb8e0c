use crate::application::ports::{MarketplaceSigner, WalletProvider};
use crate::domain::errors::DomainError;
use crate::infrastructure::ethereum_adapter::EthersSigner;
use async_trait::async_trait;
use ethers::prelude::*;
use ethers::providers::RpcError;
use std::sync::Arc;
use tracing::debug;

/// EIP-1193 "User Rejected Request".
pub const USER_REJECTED: i64 = 4001;
const METHOD_NOT_FOUND: i64 = -32601;

/// Wallet whose keys live behind the JSON-RPC endpoint (browser bridge, dev node).
/// Transactions go out through `eth_sendTransaction` and are signed remotely.
pub struct RpcWallet<P: JsonRpcClient> {
    provider: Arc<Provider<P>>,
    confirmations: usize,
}

impl<P: JsonRpcClient + 'static> RpcWallet<P> {
    pub fn new(provider: Provider<P>, confirmations: usize) -> Self {
        Self {
            provider: Arc::new(provider),
            confirmations,
        }
    }
}

fn rpc_code(e: &ProviderError) -> Option<i64> {
    RpcError::as_error_response(e).map(|r| r.code)
}

fn wallet_error(e: ProviderError) -> DomainError {
    match rpc_code(&e) {
        Some(USER_REJECTED) => DomainError::UserRejected,
        _ => DomainError::WalletUnavailable(e.to_string()),
    }
}

#[async_trait]
impl<P: JsonRpcClient + 'static> WalletProvider for RpcWallet<P> {
    async fn request_accounts(&self) -> Result<Vec<Address>, DomainError> {
        match self
            .provider
            .request::<_, Vec<Address>>("eth_requestAccounts", ())
            .await
        {
            Ok(accounts) => Ok(accounts),
            Err(e) if rpc_code(&e) == Some(METHOD_NOT_FOUND) => {
                debug!("eth_requestAccounts unsupported, falling back to eth_accounts");
                self.provider.get_accounts().await.map_err(wallet_error)
            }
            Err(e) => Err(wallet_error(e)),
        }
    }

    async fn signer(&self, account: Address) -> Result<Arc<dyn MarketplaceSigner>, DomainError> {
        Ok(Arc::new(EthersSigner::new(
            self.provider.clone(),
            account,
            self.confirmations,
        )))
    }
}
