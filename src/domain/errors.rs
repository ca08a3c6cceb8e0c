use ethers::types::H256;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Wallet unavailable: {0}")]
    WalletUnavailable(String),
    #[error("Wallet authorization was rejected by the user")]
    UserRejected,
    #[error("Wallet is not connected")]
    NotConnected,
    #[error("Description must not be empty")]
    EmptyInput,
    #[error("A submission is already in flight")]
    SubmissionInFlight,
    #[error("Transaction failed: {0}")]
    TransactionFailed(#[from] TxFailure),
    #[error("Provider error: {0}")]
    Provider(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Cause of a failed contract call, from broadcast through inclusion.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TxFailure {
    #[error("send failed: {0}")]
    Send(String),
    #[error("reverted on-chain (tx {tx_hash:?})")]
    Reverted { tx_hash: H256 },
    #[error("dropped from mempool (tx {tx_hash:?})")]
    Dropped { tx_hash: H256 },
    #[error("confirmation wait failed: {0}")]
    Confirmation(String),
    #[error("not confirmed within {0:?}")]
    TimedOut(Duration),
    #[error("abandoned before confirmation")]
    Abandoned,
}
