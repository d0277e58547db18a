use anyhow::Context;
use clap::Parser;

use chainpulse::api::{self, AppState};
use chainpulse::cli::{Cli, Commands};
use chainpulse::config::Config;
use chainpulse::format;
use chainpulse::poller::{self, SharedSnapshot};
use chainpulse::rpc::ChainClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = Config::from_env().context("failed to load configuration")?;
    let client = ChainClient::new(&config.rpc_url).context("failed to build rpc client")?;

    match cli.command {
        Commands::Serve { addr } => {
            let bind = addr.unwrap_or_else(|| config.http_bind_addr.clone());
            let state = SharedSnapshot::default();

            let poll = tokio::spawn(poller::run(client, config, state.clone()));
            let served = api::run_http_server(&bind, AppState { snapshot: state }).await;
            poll.abort();
            served?;
        }
        Commands::Snapshot => {
            let snapshot = poller::fetch_snapshot(&client, &config).await?;
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        Commands::Blocks { count } => {
            let latest = client
                .block_number()
                .await
                .context("failed to fetch latest block height")?;
            let blocks = client.blocks_range(latest, count).await?;
            for block in &blocks {
                println!(
                    "#{} {} txs={} gas={}/{}",
                    block.number,
                    block.hash,
                    block.transactions.len(),
                    block.gas_used,
                    block.gas_limit
                );
            }
        }
        Commands::GasPrice => {
            let wei = client.gas_price().await;
            println!("{} wei ({})", wei, format::format_gas_price(wei));
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();
}
