//! Externally supplied deployment parameters: ledger endpoint, program
//! identifier, and the marketplace singleton account.

use std::env;
use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;

use crate::errors::{Error, Result};

/// Devnet endpoint the deployment runs against.
pub const DEFAULT_RPC_URL: &str = "https://api.devnet.solana.com";
/// The marketplace singleton account.
pub const DEFAULT_MARKET: &str = "EQkCga3Rtkt4AFhJToY6jsstGzRHkDp6asgLxu6srkJc";
/// The deployed marketplace program.
pub const DEFAULT_PROGRAM_ID: &str = "4mgMZmcKv2dmFzVhAy9tBLQU3AJACYixWrSwGP1mFY5m";

#[derive(Debug, Clone)]
pub struct MarketConfig {
    pub rpc_url: String,
    pub program_id: Pubkey,
    pub market: Pubkey,
}

impl MarketConfig {
    pub fn new(rpc_url: impl Into<String>, program_id: Pubkey, market: Pubkey) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            program_id,
            market,
        }
    }

    /// Reads `MARKETPLACE_RPC_URL`, `MARKETPLACE_PROGRAM_ID` and
    /// `MARKETPLACE_MARKET`, falling back to the deployment defaults.
    pub fn from_env() -> Result<Self> {
        let rpc_url =
            env::var("MARKETPLACE_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());
        let program_id = env::var("MARKETPLACE_PROGRAM_ID");
        let market = env::var("MARKETPLACE_MARKET");
        Ok(Self {
            rpc_url,
            program_id: parse_key(program_id.as_deref().unwrap_or(DEFAULT_PROGRAM_ID))?,
            market: parse_key(market.as_deref().unwrap_or(DEFAULT_MARKET))?,
        })
    }
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            rpc_url: DEFAULT_RPC_URL.to_string(),
            // Both constants are valid base58; parsing them cannot fail.
            program_id: Pubkey::from_str(DEFAULT_PROGRAM_ID).unwrap_or_default(),
            market: Pubkey::from_str(DEFAULT_MARKET).unwrap_or_default(),
        }
    }
}

fn parse_key(raw: &str) -> Result<Pubkey> {
    Pubkey::from_str(raw).map_err(|err| Error::Config(format!("{raw}: {err}")))
}
