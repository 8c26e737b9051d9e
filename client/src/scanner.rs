//! Marketplace discovery: rebuild listing state from the full set of
//! program-owned accounts.

use log::debug;
use solana_sdk::pubkey::Pubkey;

use crate::errors::Result;
use crate::ledger::Ledger;
use crate::state::{Decoded, Listing};

/// Aggregated view of program state at scan time. Rebuilt wholesale on
/// every scan; both lists keep bulk-query order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarketplaceSnapshot {
    pub active_listings: Vec<Listing>,
    pub user_listings: Vec<Listing>,
}

/// One bulk query, then a local decode pass with no further I/O.
///
/// Accounts that fail the discriminator check are the program's other
/// record types and are skipped; a failed bulk query fails the scan as a
/// whole and no partial snapshot is produced.
pub async fn scan<L: Ledger>(
    ledger: &L,
    program_id: &Pubkey,
    current_wallet: &Pubkey,
) -> Result<MarketplaceSnapshot> {
    let accounts = ledger.program_accounts(program_id).await?;
    let mut snapshot = MarketplaceSnapshot::default();
    for (address, data) in accounts {
        match Listing::decode(&data)? {
            Decoded::Listing(listing) => {
                if listing.seller == *current_wallet {
                    snapshot.user_listings.push(listing.clone());
                }
                snapshot.active_listings.push(listing);
            }
            Decoded::Foreign => debug!("skipping non-listing account {address}"),
        }
    }
    Ok(snapshot)
}
