use ethers::abi::{self, Token};
use ethers::types::Bytes;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// ABI-encodes `tokens` the way a node returns them from `eth_call`.
pub fn encode_result(tokens: &[Token]) -> Value {
    serde_json::to_value(Bytes::from(abi::encode(tokens))).unwrap()
}

/// Answers every JSON-RPC request for `rpc_method` with `result`.
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

/// Answers every JSON-RPC request for `rpc_method` with an error object.
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
