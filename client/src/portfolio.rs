//! Wallet profiling: split a wallet's token holdings into fungible and
//! non-fungible partitions.

use solana_sdk::pubkey::Pubkey;

use crate::errors::Result;
use crate::ledger::Ledger;

/// One token balance owned by a wallet. Read-only from the client's side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenHolding {
    pub address: Pubkey,
    pub mint: Pubkey,
    pub amount: u64,
}

/// Aggregated wallet view, rebuilt from scratch on every connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletProfile {
    pub wallet: Pubkey,
    pub fungible: Vec<TokenHolding>,
    pub non_fungible: Vec<TokenHolding>,
}

/// A holding counts as non-fungible when the mint's entire supply is one
/// unit and this wallet holds it. Heuristic, not a guarantee: a fungible
/// mint issued in a single unit classifies the same way. Input order is
/// preserved within each partition.
pub async fn classify<L: Ledger>(ledger: &L, wallet: &Pubkey) -> Result<WalletProfile> {
    let holdings = ledger.token_holdings(wallet).await?;
    let mut profile = WalletProfile {
        wallet: *wallet,
        ..WalletProfile::default()
    };
    // TODO: batch the supply lookups through one getMultipleAccounts call;
    // one request per held mint dominates profiling latency.
    for holding in holdings {
        let supply = ledger.mint_supply(&holding.mint).await?;
        if supply == 1 && holding.amount == 1 {
            profile.non_fungible.push(holding);
        } else {
            profile.fungible.push(holding);
        }
    }
    Ok(profile)
}
