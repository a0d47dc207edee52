//! JSON-RPC read gateway client.

use super::{CallArg, CallResult, ChainReadError, ChainReader, MoveCall};
use crate::domain::Address;
use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

/// Chain reader backed by a JSON-RPC read gateway.
///
/// Balances use the standard `suix_getBalance` method. Contract reads use
/// `chainflow_inspectMoveCall`, which the gateway answers with a dev-inspect
/// shaped payload (`results[].returnValues[][0]` as byte arrays).
#[derive(Debug, Clone)]
pub struct GatewayChainReader {
    client: Client,
    base_url: String,
}

impl GatewayChainReader {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }

    async fn post_rpc(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ChainReadError> {
        let payload = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.base_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ChainReadError::NetworkError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ChainReadError::HttpError {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("request failed")
                    .to_string(),
            });
        }

        let body = response
            .json::<serde_json::Value>()
            .await
            .map_err(|e| ChainReadError::ParseError(e.to_string()))?;

        unwrap_rpc_result(body)
    }
}

#[async_trait]
impl ChainReader for GatewayChainReader {
    async fn fetch_balance(
        &self,
        owner: &Address,
        coin_type: &str,
    ) -> Result<u128, ChainReadError> {
        debug!(owner = %owner, coin_type, "Fetching balance");

        let result = self
            .post_rpc("suix_getBalance", serde_json::json!([owner.as_str(), coin_type]))
            .await?;
        parse_total_balance(&result)
    }

    async fn inspect_call(
        &self,
        sender: &Address,
        call: &MoveCall,
    ) -> Result<Vec<CallResult>, ChainReadError> {
        debug!(sender = %sender, target = %call.target(), "Inspecting contract call");

        let arguments: Vec<serde_json::Value> = call
            .arguments
            .iter()
            .map(|arg| match arg {
                CallArg::Object(id) => serde_json::json!({"object": id.as_str()}),
                CallArg::U64(v) => serde_json::json!({"pure": v.to_string(), "type": "u64"}),
            })
            .collect();

        let result = self
            .post_rpc(
                "chainflow_inspectMoveCall",
                serde_json::json!({
                    "sender": sender.as_str(),
                    "package": call.package,
                    "module": call.module,
                    "function": call.function,
                    "arguments": arguments,
                }),
            )
            .await?;
        parse_inspect_results(&result)
    }
}

fn unwrap_rpc_result(body: serde_json::Value) -> Result<serde_json::Value, ChainReadError> {
    if let Some(err) = body.get("error") {
        return Err(ChainReadError::RpcError {
            code: err.get("code").and_then(|c| c.as_i64()).unwrap_or(0),
            message: err
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown error")
                .to_string(),
        });
    }
    body.get("result")
        .cloned()
        .ok_or_else(|| ChainReadError::ParseError("Missing result field".to_string()))
}

fn parse_total_balance(result: &serde_json::Value) -> Result<u128, ChainReadError> {
    let total = result
        .get("totalBalance")
        .ok_or_else(|| ChainReadError::ParseError("Missing totalBalance field".to_string()))?;

    // Nodes report u128 balances as strings; accept bare numbers too.
    match total {
        serde_json::Value::String(s) => s
            .parse::<u128>()
            .map_err(|e| ChainReadError::ParseError(format!("Invalid totalBalance: {}", e))),
        serde_json::Value::Number(n) => n
            .as_u64()
            .map(u128::from)
            .ok_or_else(|| ChainReadError::ParseError("Invalid totalBalance".to_string())),
        _ => Err(ChainReadError::ParseError(
            "Invalid totalBalance type".to_string(),
        )),
    }
}

fn parse_inspect_results(result: &serde_json::Value) -> Result<Vec<CallResult>, ChainReadError> {
    if let Some(err) = result.get("error").and_then(|e| e.as_str()) {
        return Err(ChainReadError::RpcError {
            code: 0,
            message: err.to_string(),
        });
    }

    let Some(results) = result.get("results").and_then(|r| r.as_array()) else {
        return Ok(Vec::new());
    };

    results
        .iter()
        .map(|entry| -> Result<CallResult, ChainReadError> {
            let values = entry
                .get("returnValues")
                .and_then(|v| v.as_array())
                .cloned()
                .unwrap_or_default();
            let return_values = values
                .iter()
                .map(|value| -> Result<Vec<u8>, ChainReadError> {
                    let bytes = value
                        .get(0)
                        .and_then(|b| b.as_array())
                        .ok_or_else(|| {
                            ChainReadError::ParseError("Malformed return value".to_string())
                        })?;
                    bytes
                        .iter()
                        .map(|b| {
                            b.as_u64()
                                .and_then(|b| u8::try_from(b).ok())
                                .ok_or_else(|| {
                                    ChainReadError::ParseError(
                                        "Return byte out of range".to_string(),
                                    )
                                })
                        })
                        .collect()
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(CallResult { return_values })
        })
        .collect()
}
