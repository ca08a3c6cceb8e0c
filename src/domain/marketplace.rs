use chrono::{DateTime, Utc};
use ethers::types::{Address, H256};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One `aiTrainingData` entry as stored by the marketplace contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataRecord {
    pub description: String,
    pub user: Address,
}

/// Proof that a contract call was mined successfully.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub account: Address,
    pub tx_hash: H256,
    pub block_number: Option<u64>,
    pub gas_used: Option<u64>,
    pub confirmed_at: DateTime<Utc>,
}

impl fmt::Display for SubmissionReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tx={:?} from={:?}", self.tx_hash, self.account)?;
        if let Some(block) = self.block_number {
            write!(f, " block={}", block)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MarketplaceEvent {
    NewDataCreated {
        data_index: u32,
        record: DataRecord,
        block_number: u64,
        tx_hash: H256,
    },
    AiAgentResponded {
        data_index: u32,
        record: DataRecord,
        ai_agent: Address,
        is_valid: bool,
        block_number: u64,
        tx_hash: H256,
    },
}

impl MarketplaceEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            MarketplaceEvent::NewDataCreated { .. } => "new_data_created",
            MarketplaceEvent::AiAgentResponded { .. } => "ai_agent_responded",
        }
    }

    pub fn block_number(&self) -> u64 {
        match self {
            MarketplaceEvent::NewDataCreated { block_number, .. }
            | MarketplaceEvent::AiAgentResponded { block_number, .. } => *block_number,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_display_includes_block_when_known() {
        let receipt = SubmissionReceipt {
            account: Address::zero(),
            tx_hash: H256::zero(),
            block_number: Some(42),
            gas_used: None,
            confirmed_at: Utc::now(),
        };
        assert!(receipt.to_string().ends_with("block=42"));

        let pending = SubmissionReceipt { block_number: None, ..receipt };
        assert!(!pending.to_string().contains("block="));
    }

    #[test]
    fn test_event_serializes_with_kind_tag() {
        let event = MarketplaceEvent::NewDataCreated {
            data_index: 3,
            record: DataRecord {
                description: "Test".into(),
                user: Address::zero(),
            },
            block_number: 10,
            tx_hash: H256::zero(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "new_data_created");
        assert_eq!(json["data_index"], 3);
        assert_eq!(event.kind(), "new_data_created");
        assert_eq!(event.block_number(), 10);
    }
}
