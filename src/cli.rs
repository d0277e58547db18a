use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "chainpulse", version, about = "EVM network stats poller and dashboard API")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the chain and serve dashboard stats over HTTP
    Serve {
        /// Override bind address, e.g. 0.0.0.0:8080
        #[arg(long)]
        addr: Option<String>,
    },
    /// Fetch one snapshot and print it as JSON
    Snapshot,
    /// Print summaries of the most recent blocks
    Blocks {
        #[arg(long, default_value_t = 10)]
        count: usize,
    },
    /// Print the current gas price
    GasPrice,
}
