use crate::application::watcher::DEFAULT_MAX_BLOCK_RANGE;
use crate::domain::campaign::{default_campaigns, Campaign};
use crate::domain::deployment::{DeploymentDescriptor, DEFAULT_CONTRACT, DEFAULT_MODULE};
use crate::infrastructure::wallet_key::DEFAULT_KEY_ENV;
use anyhow::{Context, Result};
use ethers::types::Address;
use serde::Deserialize;
use std::{fs, path::Path, time::Duration};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub network: Network,
    pub contracts: Contracts,
    pub wallet: WalletConfig,
    #[serde(default)]
    pub submission: SubmissionConfig,
    pub deployment: Option<DeploymentConfig>,
    #[serde(default)]
    pub watch: WatchConfig,
    pub metrics: Option<MetricsConfig>,
    #[serde(default)]
    pub campaigns: Vec<Campaign>,
}

#[derive(Debug, Deserialize)]
pub struct Network {
    pub rpc_url: String,
    pub chain_id: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

#[derive(Debug, Deserialize)]
pub struct Contracts {
    pub marketplace: String,
}

#[derive(Debug, Deserialize, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum WalletMode {
    /// Accounts managed by the node behind `rpc_url` (`eth_requestAccounts`).
    Rpc,
    /// Local key read from `private_key_env`.
    PrivateKey,
}

#[derive(Debug, Deserialize)]
pub struct WalletConfig {
    pub mode: WalletMode,
    #[serde(default = "default_key_env")]
    pub private_key_env: String,
}

fn default_key_env() -> String {
    DEFAULT_KEY_ENV.to_string()
}

#[derive(Debug, Deserialize)]
pub struct SubmissionConfig {
    #[serde(default = "default_confirmations")]
    pub confirmations: usize,
    pub timeout_secs: Option<u64>,
}

fn default_confirmations() -> usize {
    1
}

impl Default for SubmissionConfig {
    fn default() -> Self {
        Self {
            confirmations: default_confirmations(),
            timeout_secs: None,
        }
    }
}

impl SubmissionConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default = "default_module")]
    pub module: String,
    #[serde(default = "default_contract")]
    pub contract: String,
    /// Constructor argument: the address allowed to respond to submissions.
    pub ai_agent: String,
}

fn default_module() -> String {
    DEFAULT_MODULE.to_string()
}

fn default_contract() -> String {
    DEFAULT_CONTRACT.to_string()
}

#[derive(Debug, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_watch_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_lookback")]
    pub lookback_blocks: u64,
    /// Upper bound on the block span of a single log query.
    #[serde(default = "default_max_block_range")]
    pub max_block_range: u64,
}

fn default_watch_interval() -> u64 {
    10
}

fn default_lookback() -> u64 {
    1_000
}

fn default_max_block_range() -> u64 {
    DEFAULT_MAX_BLOCK_RANGE
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: default_watch_interval(),
            lookback_blocks: default_lookback(),
            max_block_range: default_max_block_range(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct MetricsConfig {
    pub port: u16,
}

impl Config {
    pub fn marketplace_address(&self) -> Result<Address> {
        self.contracts
            .marketplace
            .parse()
            .context("Invalid marketplace address")
    }

    pub fn deployment_descriptor(&self) -> Result<Option<DeploymentDescriptor>> {
        self.deployment
            .as_ref()
            .map(|d| {
                let ai_agent = d
                    .ai_agent
                    .parse::<Address>()
                    .context("Invalid deployment.ai_agent address")?;
                Ok(DeploymentDescriptor {
                    module: d.module.clone(),
                    contract: d.contract.clone(),
                    ai_agent,
                })
            })
            .transpose()
    }

    /// Configured campaigns, or the built-in mock listing when none are given.
    pub fn campaigns(&self) -> Vec<Campaign> {
        if self.campaigns.is_empty() {
            default_campaigns()
        } else {
            self.campaigns.clone()
        }
    }
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)
        .with_context(|| format!("read config yaml {}", path.display()))?;
    let cfg: Config = serde_yaml::from_str(&raw).context("parse yaml")?;
    validate_config(&cfg)?;
    Ok(cfg)
}

fn validate_config(cfg: &Config) -> Result<()> {
    cfg.marketplace_address()?;
    // Not compared with contracts.marketplace; the two are independent settings.
    cfg.deployment_descriptor()?;

    if cfg.submission.confirmations == 0 {
        anyhow::bail!("submission.confirmations must be at least 1");
    }
    if cfg.submission.timeout_secs == Some(0) {
        anyhow::bail!("submission.timeout_secs must be positive when set");
    }
    if cfg.watch.poll_interval_secs == 0 {
        anyhow::bail!("watch.poll_interval_secs must be positive");
    }
    if cfg.watch.max_block_range == 0 {
        anyhow::bail!("watch.max_block_range must be positive");
    }
    if let Some(c) = cfg.campaigns.iter().find(|c| c.required_submissions == 0) {
        anyhow::bail!("campaign {} needs required_submissions > 0", c.id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::campaign::CampaignCategory;

    const BASE: &str = r#"
network:
  rpc_url: "http://localhost:8545"
  chain_id: 31337
contracts:
  marketplace: "0x5FbDB2315678afecb367f032d93F642f64180aa3"
wallet:
  mode: "rpc"
"#;

    fn parse(extra: &str) -> Config {
        serde_yaml::from_str(&format!("{BASE}{extra}")).unwrap()
    }

    #[test]
    fn test_minimal_config_defaults() {
        let cfg = parse("");
        assert!(validate_config(&cfg).is_ok());
        assert_eq!(cfg.wallet.mode, WalletMode::Rpc);
        assert_eq!(cfg.wallet.private_key_env, "MARKETPLACE_PRIVATE_KEY");
        assert_eq!(cfg.network.poll_interval_ms, 2_000);
        assert_eq!(cfg.submission.confirmations, 1);
        assert_eq!(cfg.submission.timeout(), None);
        assert_eq!(cfg.watch.lookback_blocks, 1_000);
        assert_eq!(cfg.watch.max_block_range, 1_000);
        assert!(cfg.deployment_descriptor().unwrap().is_none());
        assert_eq!(cfg.campaigns().len(), 3);
    }

    #[test]
    fn test_private_key_wallet_and_timeout() {
        let yaml = r#"
network:
  rpc_url: "https://api.calibration.node.glif.io/rpc/v1"
  chain_id: 314159
contracts:
  marketplace: "0x10502f20179230c67b17531355d7e439A27Fc924"
wallet:
  mode: "private_key"
  private_key_env: "CALIBRATION_KEY"
submission:
  confirmations: 2
  timeout_secs: 120
"#;
        let cfg: Config = serde_yaml::from_str(yaml).unwrap();
        assert!(validate_config(&cfg).is_ok());
        assert_eq!(cfg.wallet.mode, WalletMode::PrivateKey);
        assert_eq!(cfg.wallet.private_key_env, "CALIBRATION_KEY");
        assert_eq!(cfg.submission.timeout(), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_deployment_descriptor_independent_of_contract_address() {
        let cfg = parse(
            r#"
deployment:
  ai_agent: "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
"#,
        );
        assert!(validate_config(&cfg).is_ok());
        let d = cfg.deployment_descriptor().unwrap().unwrap();
        assert_eq!(d.module, "DataMarketplaceModule");
        assert_eq!(d.contract, "DataMarketplace");
        assert_ne!(d.ai_agent, cfg.marketplace_address().unwrap());
    }

    #[test]
    fn test_invalid_marketplace_address() {
        let yaml = BASE.replace("0x5FbDB2315678afecb367f032d93F642f64180aa3", "not_an_address");
        let cfg: Config = serde_yaml::from_str(&yaml).unwrap();
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_invalid_ai_agent_address() {
        let cfg = parse(
            r#"
deployment:
  ai_agent: "0x1234"
"#,
        );
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_zero_confirmations_rejected() {
        let cfg = parse(
            r#"
submission:
  confirmations: 0
"#,
        );
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_watch_block_range() {
        let cfg = parse(
            r#"
watch:
  max_block_range: 100
"#,
        );
        assert!(validate_config(&cfg).is_ok());
        assert_eq!(cfg.watch.max_block_range, 100);
        assert_eq!(cfg.watch.poll_interval_secs, 10);

        let cfg = parse(
            r#"
watch:
  max_block_range: 0
"#,
        );
        assert!(validate_config(&cfg).is_err());
    }

    #[test]
    fn test_unknown_wallet_mode_rejected() {
        let yaml = BASE.replace("mode: \"rpc\"", "mode: \"metamask\"");
        assert!(serde_yaml::from_str::<Config>(&yaml).is_err());
    }

    #[test]
    fn test_configured_campaigns_replace_defaults() {
        let cfg = parse(
            r#"
campaigns:
  - id: 9
    title: "Receipts OCR"
    description: "Scanned shop receipts"
    deadline: "2026-12-01"
    submissions_count: 0
    required_submissions: 10
    category: image
"#,
        );
        assert!(validate_config(&cfg).is_ok());
        let campaigns = cfg.campaigns();
        assert_eq!(campaigns.len(), 1);
        assert_eq!(campaigns[0].category, CampaignCategory::Image);
    }

    #[test]
    fn test_campaign_without_target_rejected() {
        let cfg = parse(
            r#"
campaigns:
  - id: 9
    title: "Receipts OCR"
    description: "Scanned shop receipts"
    deadline: "2026-12-01"
    submissions_count: 0
    required_submissions: 0
    category: image
"#,
        );
        assert!(validate_config(&cfg).is_err());
    }
}
