use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::client::LedgerClient;
use crate::types::{Address, BlockTag, CallRequest, FeeSignals, FinalityReport};
use crate::util::{parse_hex_u64, parse_hex_u128};
use crate::LedgerError;

static RPC_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a, T> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: T,
}

#[derive(Debug, Deserialize)]
#[allow(dead_code)]
struct JsonRpcResponse<T> {
    jsonrpc: Option<String>,
    id: Option<u64>,
    result: Option<T>,
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    data: Option<serde_json::Value>,
}

/// Plain JSON-RPC transport over HTTP.
#[derive(Clone)]
pub struct RpcClient {
    url: String,
    client: reqwest::Client,
}

impl RpcClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            client: reqwest::Client::new(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn request<P, R>(&self, method: &str, params: P) -> Result<R, LedgerError>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        let id = RPC_ID.fetch_add(1, Ordering::Relaxed);
        let payload = JsonRpcRequest {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response = self
            .client
            .post(&self.url)
            .header("Content-Type", "application/json")
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LedgerError::Http(format!("HTTP {} from {}", status, self.url)));
        }

        let body: JsonRpcResponse<R> = response.json().await?;
        if let Some(error) = body.error {
            return Err(LedgerError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }

        body.result.ok_or(LedgerError::MissingResult)
    }
}

const NO_PARAMS: Vec<serde_json::Value> = Vec::new();

/// [`LedgerClient`] implementation backed by a JSON-RPC endpoint.
///
/// Submission goes through `eth_sendTransaction`: the node's keystore owns
/// the account and signs, so the submitting process never holds a key.
#[derive(Clone)]
pub struct RpcLedger {
    rpc: RpcClient,
    receipt_poll: Duration,
}

impl RpcLedger {
    pub fn new(url: impl Into<String>, receipt_poll: Duration) -> Self {
        Self {
            rpc: RpcClient::new(url),
            receipt_poll,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.rpc.url()
    }

    async fn latest_base_fee(&self) -> Result<Option<u128>, LedgerError> {
        let block: serde_json::Value = self
            .rpc
            .request("eth_getBlockByNumber", (BlockTag::Latest.to_param(), false))
            .await?;
        match block.get("baseFeePerGas").and_then(|v| v.as_str()) {
            Some(raw) => Ok(Some(parse_hex_u128(raw)?)),
            None => Ok(None),
        }
    }
}

#[async_trait]
impl LedgerClient for RpcLedger {
    async fn chain_id(&self) -> Result<u64, LedgerError> {
        let result: String = self.rpc.request("eth_chainId", NO_PARAMS).await?;
        parse_hex_u64(&result)
    }

    async fn fee_signals(&self) -> Result<FeeSignals, LedgerError> {
        let base_fee = self.latest_base_fee().await?;

        // Not every node serves eth_maxPriorityFeePerGas; a method-level
        // rejection degrades to "no signal" rather than failing the fetch.
        let priority_fee = match self
            .rpc
            .request::<_, String>("eth_maxPriorityFeePerGas", NO_PARAMS)
            .await
        {
            Ok(raw) => Some(parse_hex_u128(&raw)?),
            Err(LedgerError::Rpc { code, message, .. }) => {
                debug!(code, %message, "no priority fee signal from node");
                None
            }
            Err(other) => return Err(other),
        };

        // eth_gasPrice is universally supported, so any failure here means
        // the endpoint itself is unhealthy and must surface.
        let legacy: String = self.rpc.request("eth_gasPrice", NO_PARAMS).await?;
        let legacy_gas_price = Some(parse_hex_u128(&legacy)?);

        Ok(FeeSignals {
            base_fee,
            priority_fee,
            legacy_gas_price,
        })
    }

    async fn balance(&self, account: &Address) -> Result<u128, LedgerError> {
        let params = vec![
            serde_json::Value::String(account.to_string()),
            BlockTag::Latest.to_param(),
        ];
        let result: String = self.rpc.request("eth_getBalance", params).await?;
        parse_hex_u128(&result)
    }

    async fn pending_nonce(&self, account: &Address) -> Result<u64, LedgerError> {
        let params = vec![
            serde_json::Value::String(account.to_string()),
            BlockTag::Pending.to_param(),
        ];
        let result: String = self.rpc.request("eth_getTransactionCount", params).await?;
        parse_hex_u64(&result)
    }

    async fn simulate(&self, call: &CallRequest) -> Result<u64, LedgerError> {
        let params = vec![serde_json::to_value(call)?, BlockTag::Latest.to_param()];
        let result: String = self.rpc.request("eth_estimateGas", params).await?;
        parse_hex_u64(&result)
    }

    async fn submit(&self, call: &CallRequest) -> Result<String, LedgerError> {
        let params = vec![serde_json::to_value(call)?];
        self.rpc.request("eth_sendTransaction", params).await
    }

    async fn await_finality(&self, tx_hash: &str) -> Result<FinalityReport, LedgerError> {
        loop {
            // Nodes answer `null` until the transaction is included, which
            // surfaces here as either a null value or a missing result.
            let receipt = match self
                .rpc
                .request::<_, serde_json::Value>("eth_getTransactionReceipt", vec![tx_hash])
                .await
            {
                Ok(value) if !value.is_null() => value,
                Ok(_) | Err(LedgerError::MissingResult) => {
                    debug!(%tx_hash, "receipt not yet available");
                    tokio::time::sleep(self.receipt_poll).await;
                    continue;
                }
                Err(other) => return Err(other),
            };

            let ok = receipt
                .get("status")
                .and_then(|v| v.as_str())
                .map(|raw| parse_hex_u64(raw).unwrap_or(0) == 1)
                .unwrap_or(false);
            let block_number = receipt
                .get("blockNumber")
                .and_then(|v| v.as_str())
                .and_then(|raw| parse_hex_u64(raw).ok());

            return Ok(FinalityReport {
                ok,
                block_number,
                tx_hash: tx_hash.to_string(),
            });
        }
    }
}
