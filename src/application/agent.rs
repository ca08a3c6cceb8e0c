use crate::application::ports::{MarketplaceContract, MarketplaceReader};
use crate::domain::{errors::DomainError, marketplace::SubmissionReceipt};
use metrics::counter;
use tracing::info;

/// Reads entry `data_index` and records the agent's verdict on it.
#[tracing::instrument(skip(reader, contract))]
pub async fn respond_to_data(
    reader: &dyn MarketplaceReader,
    contract: &dyn MarketplaceContract,
    data_index: u32,
    is_valid: bool,
) -> Result<SubmissionReceipt, DomainError> {
    let record = reader.data_at(data_index).await?;
    info!(description = %record.description, user = ?record.user, "Responding to data entry");

    let receipt = contract
        .respond_to_new_data(record, data_index, is_valid)
        .await?;
    counter!("agent_responses_total", "valid" => is_valid.to_string()).increment(1);
    Ok(receipt)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::{MockMarketplaceContract, MockMarketplaceReader};
    use crate::domain::marketplace::DataRecord;
    use chrono::Utc;
    use ethers::types::{Address, H256};
    use mockall::predicate::eq;

    fn record() -> DataRecord {
        DataRecord {
            description: "Test".into(),
            user: Address::repeat_byte(0x3c),
        }
    }

    #[tokio::test]
    async fn test_respond_forwards_stored_record() {
        let mut reader = MockMarketplaceReader::new();
        reader
            .expect_data_at()
            .with(eq(2u32))
            .returning(|_| Ok(record()));

        let mut contract = MockMarketplaceContract::new();
        contract
            .expect_respond_to_new_data()
            .with(eq(record()), eq(2u32), eq(true))
            .times(1)
            .returning(|_, _, _| {
                Ok(SubmissionReceipt {
                    account: Address::repeat_byte(0x70),
                    tx_hash: H256::repeat_byte(1),
                    block_number: Some(3),
                    gas_used: None,
                    confirmed_at: Utc::now(),
                })
            });

        let receipt = respond_to_data(&reader, &contract, 2, true).await.unwrap();
        assert_eq!(receipt.block_number, Some(3));
    }

    #[tokio::test]
    async fn test_missing_entry_skips_transaction() {
        let mut reader = MockMarketplaceReader::new();
        reader
            .expect_data_at()
            .returning(|_| Err(DomainError::Provider("execution reverted".into())));

        let mut contract = MockMarketplaceContract::new();
        contract.expect_respond_to_new_data().never();

        let err = respond_to_data(&reader, &contract, 99, false).await.unwrap_err();
        assert!(matches!(err, DomainError::Provider(_)));
    }
}
