use std::time::Duration;

use reqwest::Client;
use serde_json::{json, Value};
use url::Url;

use crate::hex;
use crate::models::{Block, NormalizedTx};

/// Upper bound on transactions surfaced per block for the dashboard.
pub const MAX_TXS_PER_BLOCK: usize = 10;

/// Fallback block time when the sample blocks cannot be fetched.
pub const DEFAULT_BLOCK_TIME_SECS: f64 = 13.2;

/// Height distance between the two blocks sampled for the average block time.
const BLOCK_TIME_SAMPLE_SPAN: u64 = 100;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(thiserror::Error, Debug)]
pub enum ClientError {
    /// The HTTP layer reported a non-success status.
    #[error("transport error: http status {0}")]
    Transport(u16),
    /// The request never produced a response (connect failure, timeout, ...).
    #[error("transport error: {0}")]
    Http(#[from] reqwest::Error),
    /// The endpoint answered with a JSON-RPC error object.
    #[error("rpc error: {0}")]
    Rpc(String),
    #[error("unexpected response shape: {0}")]
    Decode(String),
    #[error(transparent)]
    Quantity(#[from] hex::InvalidQuantity),
    #[error("invalid rpc url: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

/// JSON-RPC client for a single chain endpoint. Stateless between calls; clone
/// freely, the underlying connection pool is shared.
#[derive(Clone)]
pub struct ChainClient {
    http: Client,
    url: Url,
}

impl ChainClient {
    pub fn new(rpc_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        let url = Url::parse(rpc_url)?;
        Ok(Self { http, url })
    }

    /// Posts a JSON-RPC 2.0 envelope and returns the raw `result` value.
    ///
    /// Non-2xx statuses map to [`ClientError::Transport`], a remote `error`
    /// object to [`ClientError::Rpc`] with the remote-supplied message.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value, ClientError> {
        let payload = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1,
        });

        let response = self
            .http
            .post(self.url.clone())
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::Transport(status.as_u16()));
        }

        let body: Value = response.json().await?;
        if let Some(err) = body.get("error") {
            let message = err
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("unknown rpc failure")
                .to_string();
            return Err(ClientError::Rpc(message));
        }

        Ok(body.get("result").cloned().unwrap_or(Value::Null))
    }

    /// Current chain height via `eth_blockNumber`.
    pub async fn block_number(&self) -> Result<u64, ClientError> {
        let result = self.call("eth_blockNumber", json!([])).await?;
        let raw = result.as_str().ok_or_else(|| {
            ClientError::Decode("eth_blockNumber did not return a string".to_string())
        })?;
        Ok(hex::quantity_u64(raw)?)
    }

    /// Latest block with full transaction objects. `Ok(None)` when the
    /// endpoint reports no block.
    pub async fn latest_block(&self) -> Result<Option<Block>, ClientError> {
        self.block_by_param(json!("latest")).await
    }

    /// Block at the given height. `Ok(None)` past the current tip.
    pub async fn block_by_number(&self, height: u64) -> Result<Option<Block>, ClientError> {
        self.block_by_param(json!(format!("{height:#x}"))).await
    }

    async fn block_by_param(&self, block_param: Value) -> Result<Option<Block>, ClientError> {
        let result = self
            .call("eth_getBlockByNumber", json!([block_param, true]))
            .await?;
        if result.is_null() {
            return Ok(None);
        }
        let block = serde_json::from_value(result).map_err(|e| ClientError::Decode(e.to_string()))?;
        Ok(Some(block))
    }

    /// Fetches up to `count` blocks walking backward from `from_height`, most
    /// recent first. Stops cleanly when the height would go negative or the
    /// endpoint reports a missing block; each fetch is its own round trip.
    pub async fn blocks_range(
        &self,
        from_height: u64,
        count: usize,
    ) -> Result<Vec<Block>, ClientError> {
        let mut out = Vec::with_capacity(count);
        for step in 0..count as u64 {
            let Some(height) = from_height.checked_sub(step) else {
                break;
            };
            match self.block_by_number(height).await? {
                Some(block) => out.push(block),
                None => break,
            }
        }
        Ok(out)
    }

    pub async fn try_gas_price(&self) -> Result<u128, ClientError> {
        let result = self.call("eth_gasPrice", json!([])).await?;
        let raw = result.as_str().ok_or_else(|| {
            ClientError::Decode("eth_gasPrice did not return a string".to_string())
        })?;
        Ok(hex::quantity(raw)?)
    }

    /// Degraded variant of [`Self::try_gas_price`]: the dashboard shows a zero
    /// price rather than an error.
    pub async fn gas_price(&self) -> u128 {
        degrade("gas price", 0, self.try_gas_price().await)
    }

    /// Average seconds per block over the last 100 heights. `Ok(None)` when
    /// either sample block is missing or the height delta is zero.
    pub async fn try_average_block_time(
        &self,
        latest_height: u64,
    ) -> Result<Option<f64>, ClientError> {
        let newest = self.block_by_number(latest_height).await?;
        let oldest = self
            .block_by_number(latest_height.saturating_sub(BLOCK_TIME_SAMPLE_SPAN))
            .await?;

        let (Some(newest), Some(oldest)) = (newest, oldest) else {
            return Ok(None);
        };

        let height_diff = newest.number.saturating_sub(oldest.number);
        if height_diff == 0 {
            return Ok(None);
        }
        let time_diff = newest.timestamp.saturating_sub(oldest.timestamp);
        Ok(Some(time_diff as f64 / height_diff as f64))
    }

    /// Degraded variant of [`Self::try_average_block_time`]: falls back to
    /// [`DEFAULT_BLOCK_TIME_SECS`] when the sample is unavailable.
    pub async fn average_block_time(&self, latest_height: u64) -> f64 {
        degrade(
            "average block time",
            None,
            self.try_average_block_time(latest_height).await,
        )
        .unwrap_or(DEFAULT_BLOCK_TIME_SECS)
    }
}

/// Extracts a block's transactions stamped with the block timestamp, truncated
/// to [`MAX_TXS_PER_BLOCK`] for display.
pub fn transactions_for_block(block: &Block) -> Vec<NormalizedTx> {
    block
        .transactions
        .iter()
        .take(MAX_TXS_PER_BLOCK)
        .map(|tx| NormalizedTx {
            hash: tx.hash.clone(),
            from: tx.from.clone(),
            to: tx.to.clone(),
            value_wei: tx.value,
            timestamp: block.timestamp,
        })
        .collect()
}

/// Substitutes a fallback for a failed auxiliary query, logging the swallowed
/// error. Critical queries must propagate instead of routing through here.
fn degrade<T>(query: &str, fallback: T, result: Result<T, ClientError>) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!("{} unavailable, using fallback: {}", query, err);
            fallback
        }
    }
}
