//! Deterministic address derivation for the marketplace program.
//!
//! Seed order and tag strings are wire protocol: the program recomputes the
//! same derivations and rejects any account whose address does not match.

use anchor_spl::token::spl_token::native_mint;
use solana_sdk::pubkey::Pubkey;

use crate::errors::{Error, Result};
use crate::state::Listing;

/// Tag shared by both vault kinds.
pub const VAULT_SEED_PREFIX: &[u8; 5] = b"vault";

/// Listing PDA: seeds = ["listing", market, nft_mint, seller].
pub fn listing_address(
    program_id: &Pubkey,
    market: &Pubkey,
    nft_mint: &Pubkey,
    seller: &Pubkey,
) -> Result<(Pubkey, u8)> {
    derive(
        &[
            Listing::SEED_PREFIX,
            market.as_ref(),
            nft_mint.as_ref(),
            seller.as_ref(),
        ],
        program_id,
    )
}

/// Per-listing NFT vault PDA: seeds = ["vault", nft_mint].
pub fn nft_vault_address(program_id: &Pubkey, nft_mint: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(&[VAULT_SEED_PREFIX, nft_mint.as_ref()], program_id)
}

/// Market proceeds vault PDA: seeds = ["vault", market, native mint].
pub fn market_vault_address(program_id: &Pubkey, market: &Pubkey) -> Result<(Pubkey, u8)> {
    derive(
        &[VAULT_SEED_PREFIX, market.as_ref(), native_mint::ID.as_ref()],
        program_id,
    )
}

/// Canonical bump search: the first bump walking down from 255 whose
/// candidate falls off the ed25519 curve. Exhausting the range is treated
/// as fatal even though no practical seed set does.
pub fn derive(seeds: &[&[u8]], program_id: &Pubkey) -> Result<(Pubkey, u8)> {
    Pubkey::try_find_program_address(seeds, program_id).ok_or(Error::Derivation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derivation_is_deterministic() {
        let program_id = Pubkey::new_unique();
        let market = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let seller = Pubkey::new_unique();

        let first = listing_address(&program_id, &market, &mint, &seller).unwrap();
        let second = listing_address(&program_id, &market, &mint, &seller).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn changing_one_seed_changes_the_address() {
        let program_id = Pubkey::new_unique();
        let market = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let seller_a = Pubkey::new_unique();
        let seller_b = Pubkey::new_unique();
        let (addr_a, _) = listing_address(&program_id, &market, &mint, &seller_a).unwrap();
        let (addr_b, _) = listing_address(&program_id, &market, &mint, &seller_b).unwrap();
        assert_ne!(addr_a, addr_b);

        let (addr_a_again, _) = listing_address(&program_id, &market, &mint, &seller_a).unwrap();
        assert_eq!(addr_a, addr_a_again);
    }

    #[test]
    fn vault_kinds_do_not_collide() {
        let program_id = Pubkey::new_unique();
        let market = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let (nft_vault, _) = nft_vault_address(&program_id, &mint).unwrap();
        let (market_vault, _) = market_vault_address(&program_id, &market).unwrap();
        assert_ne!(nft_vault, market_vault);
    }

    #[test]
    fn matches_the_sdk_search() {
        let program_id = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let expected =
            Pubkey::find_program_address(&[VAULT_SEED_PREFIX, mint.as_ref()], &program_id);
        assert_eq!(nft_vault_address(&program_id, &mint).unwrap(), expected);
    }
}
