use std::env;

/// CoinEx Smart Chain mainnet endpoint, used unless `RPC_URL` overrides it.
pub const DEFAULT_RPC_URL: &str = "https://rpc.coinex.net";
pub const CHAIN_ID: u64 = 52;
pub const NATIVE_SYMBOL: &str = "CET";

const DEFAULT_POLL_INTERVAL_SECS: u64 = 15;

#[derive(Debug, Clone)]
pub struct Config {
    pub rpc_url: String,
    pub http_bind_addr: String,
    pub poll_interval_secs: u64,
    pub chain_id: u64,
    pub symbol: String,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("invalid POLL_INTERVAL_SECS value {0:?}")]
    InvalidPollInterval(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let rpc_url = env::var("RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
        let http_bind_addr = env::var("HTTP_BIND").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
        let poll_interval_secs = match env::var("POLL_INTERVAL_SECS") {
            Ok(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => return Err(ConfigError::InvalidPollInterval(raw)),
            },
            Err(_) => DEFAULT_POLL_INTERVAL_SECS,
        };

        Ok(Self {
            rpc_url,
            http_bind_addr,
            poll_interval_secs,
            chain_id: CHAIN_ID,
            symbol: NATIVE_SYMBOL.to_string(),
        })
    }
}
