//! Assembles dashboard snapshots and re-runs the pipeline on a fixed interval.

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use tokio::sync::RwLock;
use tokio::time::{self, MissedTickBehavior};

use crate::config::Config;
use crate::format;
use crate::models::{BlockSummary, ChainSnapshot};
use crate::poll_stats::POLL_STATS;
use crate::rpc::{self, ChainClient};

/// How many recent blocks each snapshot carries.
pub const RECENT_BLOCK_COUNT: usize = 10;

/// Per-block transaction count assumed when the sampled block is empty.
const FALLBACK_TXS_PER_BLOCK: u64 = 10;

/// Latest snapshot shared between the poll loop and the HTTP handlers.
/// `None` until the first cycle succeeds.
pub type SharedSnapshot = Arc<RwLock<Option<ChainSnapshot>>>;

/// Extrapolates a chain-wide transaction total from the latest block. A
/// heuristic for the dashboard, not an authoritative count.
pub fn estimate_total_transactions(height: u64, sampled_tx_count: usize) -> u64 {
    let per_block = if sampled_tx_count == 0 {
        FALLBACK_TXS_PER_BLOCK
    } else {
        sampled_tx_count as u64
    };
    height.saturating_mul(per_block)
}

/// Runs the full fetch pipeline once: height, latest block, recent blocks,
/// auxiliary metrics, and the derived totals.
pub async fn fetch_snapshot(client: &ChainClient, config: &Config) -> Result<ChainSnapshot> {
    let latest_height = client
        .block_number()
        .await
        .context("failed to fetch latest block height")?;

    let latest_block = client
        .latest_block()
        .await
        .context("failed to fetch latest block")?
        .context("endpoint reported no latest block")?;

    let recent_blocks = client
        .blocks_range(latest_height, RECENT_BLOCK_COUNT)
        .await
        .context("failed to fetch recent blocks")?;

    // Auxiliary metrics degrade to fixed fallbacks instead of failing the cycle.
    let average_block_time = client.average_block_time(latest_height).await;
    let gas_price_wei = client.gas_price().await;

    let recent_transactions = rpc::transactions_for_block(&latest_block);
    let total_transactions =
        estimate_total_transactions(latest_block.number, latest_block.transactions.len());

    POLL_STATS.inc_blocks_fetched(recent_blocks.len() as u64 + 1);
    POLL_STATS.inc_transactions_seen(recent_transactions.len() as u64);

    Ok(ChainSnapshot {
        chain_id: config.chain_id,
        symbol: config.symbol.clone(),
        latest_height,
        latest_block: BlockSummary::from(&latest_block),
        recent_blocks: recent_blocks.iter().map(BlockSummary::from).collect(),
        recent_transactions,
        total_transactions,
        average_block_time_secs: average_block_time,
        gas_price_wei,
        gas_price_display: format::format_gas_price(gas_price_wei),
        fetched_at: unix_now(),
    })
}

/// One poll cycle: fetch, then apply. A failed cycle keeps the previous
/// snapshot so the dashboard shows last-known-good data instead of blanking.
pub async fn run_cycle(client: &ChainClient, config: &Config, state: &SharedSnapshot) {
    match fetch_snapshot(client, config).await {
        Ok(snapshot) => {
            POLL_STATS.inc_cycles_completed();
            tracing::info!("applied snapshot at height {}", snapshot.latest_height);
            *state.write().await = Some(snapshot);
        }
        Err(err) => {
            POLL_STATS.inc_cycles_failed();
            tracing::warn!("poll cycle failed, keeping previous snapshot: {:#}", err);
        }
    }
}

/// The poll loop. Cycles are single-flight: a cycle must finish before the
/// next tick fires, so two pipelines never race to apply their results.
pub async fn run(client: ChainClient, config: Config, state: SharedSnapshot) {
    let mut ticker = time::interval(Duration::from_secs(config.poll_interval_secs));
    // A slow cycle delays the next tick instead of stacking a second fetch.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        run_cycle(&client, &config, &state).await;
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}
