use serde::{Deserialize, Serialize};

use crate::hex;

/// A block as returned by `eth_getBlockByNumber` with full transaction objects,
/// hex quantities already decoded. Hashes and addresses stay hex strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    #[serde(deserialize_with = "hex::deserialize_u64")]
    pub number: u64,
    pub hash: String,
    pub parent_hash: String,
    /// Unix seconds.
    #[serde(deserialize_with = "hex::deserialize_u64")]
    pub timestamp: u64,
    pub miner: String,
    #[serde(deserialize_with = "hex::deserialize_u128")]
    pub gas_used: u128,
    #[serde(deserialize_with = "hex::deserialize_u128")]
    pub gas_limit: u128,
    /// Block size in bytes.
    #[serde(deserialize_with = "hex::deserialize_u64")]
    pub size: u64,
    pub nonce: String,
    pub extra_data: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// A transaction embedded in a block. `to` is absent for contract creation.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub hash: String,
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(deserialize_with = "hex::deserialize_u128")]
    pub value: u128,
}

/// A block transaction stamped with its parent block's timestamp, which
/// transactions do not carry natively.
#[derive(Debug, Clone, Serialize)]
pub struct NormalizedTx {
    pub hash: String,
    pub from: String,
    pub to: Option<String>,
    pub value_wei: u128,
    pub timestamp: u64,
}

/// The per-block fields the dashboard lists render.
#[derive(Debug, Clone, Serialize)]
pub struct BlockSummary {
    pub number: u64,
    pub hash: String,
    pub timestamp: u64,
    pub miner: String,
    pub tx_count: usize,
    pub gas_used: u128,
    pub gas_limit: u128,
    pub size: u64,
}

impl From<&Block> for BlockSummary {
    fn from(block: &Block) -> Self {
        Self {
            number: block.number,
            hash: block.hash.clone(),
            timestamp: block.timestamp,
            miner: block.miner.clone(),
            tx_count: block.transactions.len(),
            gas_used: block.gas_used,
            gas_limit: block.gas_limit,
            size: block.size,
        }
    }
}

/// Everything one poll cycle produces for the dashboard, replaced wholesale on
/// the next cycle.
#[derive(Debug, Clone, Serialize)]
pub struct ChainSnapshot {
    pub chain_id: u64,
    pub symbol: String,
    pub latest_height: u64,
    pub latest_block: BlockSummary,
    pub recent_blocks: Vec<BlockSummary>,
    pub recent_transactions: Vec<NormalizedTx>,
    /// Heuristic extrapolation (height x sampled txs per block), not a real count.
    pub total_transactions: u64,
    pub average_block_time_secs: f64,
    pub gas_price_wei: u128,
    pub gas_price_display: String,
    /// Unix seconds at which this snapshot was assembled.
    pub fetched_at: u64,
}
