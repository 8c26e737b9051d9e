use anchor_lang::{AnchorDeserialize, AnchorSerialize};
use solana_sdk::pubkey::Pubkey;

use crate::errors::{Error, Result};

/// Mirror of the program's listing record, read directly from account data.
/// Field order is the on-chain Borsh layout behind the 8-byte account
/// discriminator.
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Listing {
    pub seller: Pubkey,
    pub nft_mint: Pubkey,
    pub market: Pubkey,
    pub ask: u64,
    pub bump: u8,
    pub nft_vault_bump: u8,
}

/// Outcome of decoding one program-owned account.
///
/// The program co-locates several record types under the same owner, so a
/// non-matching discriminator is the expected type filter, not a failure.
#[derive(Debug)]
pub enum Decoded {
    Listing(Listing),
    Foreign,
}

impl Listing {
    pub const SEED_PREFIX: &'static [u8; 7] = b"listing";

    /// First 8 bytes of SHA256("account:Listing")
    pub const DISCRIMINATOR: [u8; 8] = [218, 32, 50, 73, 43, 134, 26, 58];

    /// Full account data image: discriminator followed by the Borsh body.
    pub fn account_data(&self) -> Result<Vec<u8>> {
        let mut data = Self::DISCRIMINATOR.to_vec();
        self.serialize(&mut data)
            .map_err(|err| Error::Codec(err.to_string()))?;
        Ok(data)
    }

    /// Decodes one account. A short buffer or unknown discriminator is
    /// `Foreign`; a matching discriminator with a malformed body is a real
    /// error and propagates.
    pub fn decode(data: &[u8]) -> Result<Decoded> {
        if data.len() < 8 || data[..8] != Self::DISCRIMINATOR {
            return Ok(Decoded::Foreign);
        }
        let listing = Listing::deserialize(&mut &data[8..])
            .map_err(|err| Error::Codec(format!("listing body: {err}")))?;
        Ok(Decoded::Listing(listing))
    }
}
