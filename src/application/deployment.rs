use crate::application::ports::MarketplaceReader;
use crate::domain::{deployment::DeploymentDescriptor, errors::DomainError};
use ethers::types::Address;
use serde::Serialize;
use tracing::{info, warn};

/// Outcome of comparing a deployment descriptor with what is live on-chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeploymentReport {
    pub contract: Address,
    pub expected_ai_agent: Address,
    pub on_chain_ai_agent: Address,
    pub latest_data_num: u32,
}

impl DeploymentReport {
    pub fn is_consistent(&self) -> bool {
        self.expected_ai_agent == self.on_chain_ai_agent
    }
}

pub async fn verify_deployment(
    reader: &dyn MarketplaceReader,
    contract: Address,
    descriptor: &DeploymentDescriptor,
) -> Result<DeploymentReport, DomainError> {
    let on_chain_ai_agent = reader.ai_agent().await?;
    let latest_data_num = reader.latest_data_num().await?;

    let report = DeploymentReport {
        contract,
        expected_ai_agent: descriptor.ai_agent,
        on_chain_ai_agent,
        latest_data_num,
    };

    if report.is_consistent() {
        info!(contract = ?contract, entries = latest_data_num, "Deployment matches descriptor");
    } else {
        warn!(
            "Contract {:?} was deployed with AI agent {:?}, descriptor says {:?}",
            contract, on_chain_ai_agent, descriptor.ai_agent
        );
    }
    Ok(report)
}
