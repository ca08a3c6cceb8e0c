#![allow(dead_code)]

use ethers::types::{Address, Block, FeeHistory, Transaction, TransactionReceipt, H256, U256, U64};
use serde_json::{json, Value};
use std::io::Write;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const MARKETPLACE: &str = "0x5FbDB2315678afecb367f032d93F642f64180aa3";
pub const TEST_KEY: &str = "0x0102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f20";

pub async fn mount_rpc_result(server: &MockServer, rpc_method: &str, result: Value) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": result
        })))
        .mount(server)
        .await;
}

pub async fn mount_rpc_error(server: &MockServer, rpc_method: &str, code: i64, message: &str) {
    Mock::given(method("POST"))
        .and(body_partial_json(json!({ "method": rpc_method })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": code, "message": message }
        })))
        .mount(server)
        .await;
}

/// A dev node that accepts `account`'s transactions and mines them at block 100
/// with the given receipt status.
pub async fn mount_dev_node(server: &MockServer, account: Address, tx_hash: H256, status: u64) {
    mount_rpc_result(server, "eth_chainId", json!("0x7a69")).await;
    mount_rpc_result(server, "eth_requestAccounts", json!([account])).await;
    mount_rpc_result(server, "eth_getTransactionCount", json!("0x0")).await;

    let block = Block::<H256> {
        base_fee_per_gas: Some(U256::from(100)),
        ..Default::default()
    };
    mount_rpc_result(server, "eth_getBlockByNumber", serde_json::to_value(block).unwrap()).await;

    let history = FeeHistory {
        oldest_block: U256::zero(),
        base_fee_per_gas: vec![U256::from(100); 11],
        gas_used_ratio: vec![0.5; 10],
        reward: vec![],
    };
    mount_rpc_result(server, "eth_feeHistory", serde_json::to_value(history).unwrap()).await;
    mount_rpc_result(server, "eth_estimateGas", json!("0x186a0")).await;
    mount_rpc_result(server, "eth_sendTransaction", json!(tx_hash)).await;
    mount_rpc_result(server, "eth_sendRawTransaction", json!(tx_hash)).await;

    let tx = Transaction {
        hash: tx_hash,
        from: account,
        block_number: Some(U64::from(100)),
        ..Default::default()
    };
    mount_rpc_result(server, "eth_getTransactionByHash", serde_json::to_value(tx).unwrap()).await;

    let receipt = TransactionReceipt {
        transaction_hash: tx_hash,
        from: account,
        status: Some(U64::from(status)),
        block_number: Some(U64::from(100)),
        gas_used: Some(U256::from(52_000)),
        ..Default::default()
    };
    mount_rpc_result(server, "eth_getTransactionReceipt", serde_json::to_value(receipt).unwrap()).await;
    mount_rpc_result(server, "eth_blockNumber", json!("0x65")).await;
}

pub fn config_file(rpc_url: &str, wallet: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
network:
  rpc_url: "{rpc_url}"
  chain_id: 31337
  poll_interval_ms: 10
contracts:
  marketplace: "{MARKETPLACE}"
{wallet}
deployment:
  ai_agent: "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
"#
    )
    .unwrap();
    file
}

pub async fn requests_for(server: &MockServer, rpc_method: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter_map(|r| serde_json::from_slice::<Value>(&r.body).ok())
        .filter(|body| body["method"] == rpc_method)
        .collect()
}
