use crate::application::ports::{MarketplaceContract, MarketplaceReader, MarketplaceSigner};
use crate::contracts::{Data, DataMarketplace};
use crate::domain::{
    errors::{DomainError, TxFailure},
    marketplace::{DataRecord, MarketplaceEvent, SubmissionReceipt},
};
use async_trait::async_trait;
use chrono::Utc;
use ethers::abi::Detokenize;
use ethers::prelude::*;
use std::sync::Arc;
use tracing::{info, warn};

/// Signing capability over any ethers middleware that can author transactions.
pub struct EthersSigner<M: Middleware> {
    client: Arc<M>,
    address: Address,
    confirmations: usize,
}

impl<M: Middleware + 'static> EthersSigner<M> {
    pub fn new(client: Arc<M>, address: Address, confirmations: usize) -> Self {
        Self {
            client,
            address,
            confirmations,
        }
    }
}

impl<M: Middleware + 'static> MarketplaceSigner for EthersSigner<M> {
    fn address(&self) -> Address {
        self.address
    }

    fn bind(&self, contract: Address) -> Arc<dyn MarketplaceContract> {
        let marketplace = DataMarketplace::new(contract, self.client.clone());
        Arc::new(EthersMarketplace {
            contract: marketplace,
            account: self.address,
            confirmations: self.confirmations,
        })
    }
}

pub struct EthersMarketplace<M: Middleware> {
    contract: DataMarketplace<M>,
    account: Address,
    confirmations: usize,
}

impl<M: Middleware + 'static> EthersMarketplace<M> {
    async fn send_and_confirm<D: Detokenize + Send + Sync>(
        &self,
        call: ContractCall<M, D>,
    ) -> Result<SubmissionReceipt, DomainError> {
        let pending = call
            .send()
            .await
            .map_err(|e| TxFailure::Send(e.to_string()))?;
        let tx_hash = pending.tx_hash();
        info!("Transaction broadcasted. tx={:?}", tx_hash);

        let receipt = pending
            .confirmations(self.confirmations)
            .await
            .map_err(|e| TxFailure::Confirmation(e.to_string()))?
            .ok_or(TxFailure::Dropped { tx_hash })?;

        // 1 = success, 0 = failure; missing status means a pre-Byzantium chain
        if let Some(status) = receipt.status {
            if status.as_u64() != 1 {
                warn!("Tx {:?} reverted!", tx_hash);
                return Err(TxFailure::Reverted { tx_hash }.into());
            }
        }

        Ok(SubmissionReceipt {
            account: self.account,
            tx_hash: receipt.transaction_hash,
            block_number: receipt.block_number.map(|b| b.as_u64()),
            gas_used: receipt.gas_used.map(|g| g.as_u64()),
            confirmed_at: Utc::now(),
        })
    }
}

#[async_trait]
impl<M: Middleware + 'static> MarketplaceContract for EthersMarketplace<M> {
    async fn create_new_data(&self, description: &str) -> Result<SubmissionReceipt, DomainError> {
        let call = self
            .contract
            .create_new_data(description.to_owned())
            .from(self.account);
        self.send_and_confirm(call).await
    }

    async fn respond_to_new_data(
        &self,
        record: DataRecord,
        data_index: u32,
        is_valid: bool,
    ) -> Result<SubmissionReceipt, DomainError> {
        let data = Data {
            description: record.description,
            user: record.user,
        };
        let call = self
            .contract
            .respond_to_new_data(data, data_index, is_valid)
            .from(self.account);
        self.send_and_confirm(call).await
    }
}

/// Read-only marketplace access; needs no signer.
pub struct EthersMarketplaceReader<M: Middleware> {
    contract: DataMarketplace<M>,
    client: Arc<M>,
}

impl<M: Middleware + 'static> EthersMarketplaceReader<M> {
    pub fn new(contract: DataMarketplace<M>) -> Self {
        let client = contract.client();
        Self { contract, client }
    }
}

/// Block number, then index of the log within that block.
type LogPosition = (U64, U256);

fn log_position(meta: &LogMeta) -> LogPosition {
    (meta.block_number, meta.log_index)
}

/// Merges separately queried event streams back into chain order.
fn in_log_order(mut keyed: Vec<(LogPosition, MarketplaceEvent)>) -> Vec<MarketplaceEvent> {
    keyed.sort_by_key(|(position, _)| *position);
    keyed.into_iter().map(|(_, event)| event).collect()
}

fn provider_error(e: impl std::fmt::Display) -> DomainError {
    DomainError::Provider(e.to_string())
}

#[cfg(not(tarpaulin_include))]
#[async_trait]
impl<M: Middleware + 'static> MarketplaceReader for EthersMarketplaceReader<M> {
    async fn ai_agent(&self) -> Result<Address, DomainError> {
        self.contract.ai_agent().call().await.map_err(provider_error)
    }

    async fn latest_data_num(&self) -> Result<u32, DomainError> {
        self.contract
            .latest_data_num()
            .call()
            .await
            .map_err(provider_error)
    }

    async fn data_at(&self, index: u32) -> Result<DataRecord, DomainError> {
        let (description, user) = self
            .contract
            .ai_training_data(U256::from(index))
            .call()
            .await
            .map_err(provider_error)?;
        Ok(DataRecord { description, user })
    }

    async fn block_number(&self) -> Result<u64, DomainError> {
        self.client
            .get_block_number()
            .await
            .map(|n| n.as_u64())
            .map_err(provider_error)
    }

    async fn events(&self, from_block: u64, to_block: u64) -> Result<Vec<MarketplaceEvent>, DomainError> {
        let created = self
            .contract
            .new_data_created_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query_with_meta()
            .await
            .map_err(provider_error)?;

        let responded = self
            .contract
            .ai_agent_responded_filter()
            .from_block(from_block)
            .to_block(to_block)
            .query_with_meta()
            .await
            .map_err(provider_error)?;

        let mut keyed: Vec<(LogPosition, MarketplaceEvent)> = created
            .into_iter()
            .map(|(ev, meta)| {
                let event = MarketplaceEvent::NewDataCreated {
                    data_index: ev.data_index,
                    record: DataRecord {
                        description: ev.data.description,
                        user: ev.data.user,
                    },
                    block_number: meta.block_number.as_u64(),
                    tx_hash: meta.transaction_hash,
                };
                (log_position(&meta), event)
            })
            .collect();

        keyed.extend(responded.into_iter().map(|(ev, meta)| {
            let event = MarketplaceEvent::AiAgentResponded {
                data_index: ev.data_index,
                record: DataRecord {
                    description: ev.data.description,
                    user: ev.data.user,
                },
                ai_agent: ev.ai_agent,
                is_valid: ev.is_valid,
                block_number: meta.block_number.as_u64(),
                tx_hash: meta.transaction_hash,
            };
            (log_position(&meta), event)
        }));

        Ok(in_log_order(keyed))
    }
}
