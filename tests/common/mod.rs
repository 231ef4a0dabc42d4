//! Shared fixtures: canned receipts and a scripted JSON-RPC node
#![allow(dead_code)]

use alloy_primitives::{address, b256, Address, Bytes, B256};
use alloy_rpc_types_eth::TransactionReceipt;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;

pub const TX_HASH: B256 =
    b256!("5e1a7b3c2d4f6a8b9c0d1e2f3a4b5c6d7e8f9a0b1c2d3e4f5a6b7c8d9e0f1a2b");
pub const NODE_ACCOUNT: Address = address!("00000000000000000000000000000000000000cc");

/// Receipt JSON as a node returns it for a successful EIP-1559 transaction
pub fn mined_receipt_json(tx_hash: B256) -> Value {
    json!({
        "type": "0x2",
        "status": "0x1",
        "cumulativeGasUsed": "0xb4d2",
        "logs": [],
        "logsBloom": format!("0x{}", "00".repeat(256)),
        "transactionHash": tx_hash,
        "transactionIndex": "0x0",
        "blockHash": b256!("00000000000000000000000000000000000000000000000000000000000000b1"),
        "blockNumber": "0x11",
        "gasUsed": "0xb4d2",
        "effectiveGasPrice": "0x3b9aca00",
        "from": NODE_ACCOUNT,
        "to": address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"),
        "contractAddress": null
    })
}

pub fn mined_receipt(tx_hash: B256) -> TransactionReceipt {
    serde_json::from_value(mined_receipt_json(tx_hash)).unwrap()
}

/// JSON-RPC node answering from a script.
///
/// `eth_getTransactionReceipt` answers with the queued values in order and repeats the last
/// one once the queue is down to it. Every request is recorded.
pub struct StubNode {
    receipts: Mutex<VecDeque<Value>>,
    call_output: Bytes,
    requests: Mutex<Vec<(String, Value)>>,
}

impl StubNode {
    /// Serve on an ephemeral local port; returns the node and its URL
    pub async fn start(receipts: Vec<Value>, call_output: impl Into<Bytes>) -> (Arc<Self>, String) {
        let node = Arc::new(Self {
            receipts: Mutex::new(receipts.into()),
            call_output: call_output.into(),
            requests: Mutex::new(Vec::new()),
        });

        let app = Router::new()
            .route("/", post(handle_rpc))
            .with_state(Arc::clone(&node));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        (node, format!("http://{}", addr))
    }

    /// Params of every recorded request for `method`
    pub fn requests(&self, method: &str) -> Vec<Value> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(m, _)| m == method)
            .map(|(_, params)| params.clone())
            .collect()
    }

    fn respond(&self, method: &str) -> Value {
        match method {
            "eth_sendTransaction" => json!(TX_HASH),
            "eth_getTransactionReceipt" => {
                let mut receipts = self.receipts.lock().unwrap();
                if receipts.len() > 1 {
                    receipts.pop_front().unwrap_or(Value::Null)
                } else {
                    receipts.front().cloned().unwrap_or(Value::Null)
                }
            }
            "eth_call" => json!(self.call_output),
            "eth_estimateGas" => json!("0x5208"),
            "eth_blockNumber" => json!("0x11"),
            _ => Value::Null,
        }
    }
}

async fn handle_rpc(State(node): State<Arc<StubNode>>, Json(request): Json<Value>) -> Json<Value> {
    let method = request["method"].as_str().unwrap_or_default().to_string();
    node.requests
        .lock()
        .unwrap()
        .push((method.clone(), request["params"].clone()));

    Json(json!({
        "jsonrpc": "2.0",
        "id": request["id"].clone(),
        "result": node.respond(&method),
    }))
}
