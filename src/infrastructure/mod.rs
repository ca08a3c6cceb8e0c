pub mod ethereum_adapter;
pub mod observability;
pub mod wallet_key;
pub mod wallet_rpc;
