use crate::domain::{
    errors::DomainError,
    marketplace::{DataRecord, MarketplaceEvent, SubmissionReceipt},
};
use async_trait::async_trait;
use ethers::types::Address;
use std::sync::Arc;

/// Source of authorized accounts and of the capability to sign for them.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Asks the wallet for authorized accounts. May prompt the user.
    async fn request_accounts(&self) -> Result<Vec<Address>, DomainError>;

    /// Acquires a transaction-authoring capability bound to `account`.
    async fn signer(&self, account: Address) -> Result<Arc<dyn MarketplaceSigner>, DomainError>;
}

/// Signing capability handed out by a wallet.
#[cfg_attr(test, mockall::automock)]
pub trait MarketplaceSigner: Send + Sync {
    fn address(&self) -> Address;

    /// References the deployed marketplace at `contract`, authoring calls as this signer.
    fn bind(&self, contract: Address) -> Arc<dyn MarketplaceContract>;
}

/// State-changing entry points of the marketplace contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketplaceContract: Send + Sync {
    /// Calls `createNewData(description)` and waits until the transaction is mined.
    async fn create_new_data(&self, description: &str) -> Result<SubmissionReceipt, DomainError>;

    /// Calls `respondToNewData(data, index, isValid)` and waits until the transaction is mined.
    async fn respond_to_new_data(
        &self,
        record: DataRecord,
        data_index: u32,
        is_valid: bool,
    ) -> Result<SubmissionReceipt, DomainError>;
}

/// Read-only view of the marketplace contract and its chain.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MarketplaceReader: Send + Sync {
    async fn ai_agent(&self) -> Result<Address, DomainError>;
    async fn latest_data_num(&self) -> Result<u32, DomainError>;
    async fn data_at(&self, index: u32) -> Result<DataRecord, DomainError>;
    async fn block_number(&self) -> Result<u64, DomainError>;

    /// Marketplace events in the inclusive block range, ordered by block.
    async fn events(&self, from_block: u64, to_block: u64) -> Result<Vec<MarketplaceEvent>, DomainError>;
}
