//! Typed builders for the program's four trade instructions.
//!
//! Each builder resolves the addresses the program will re-derive, then
//! encodes the payload as the 8-byte global sighash discriminator followed
//! by the Borsh-serialized arguments. Account order matches the program's
//! declared account lists exactly.

use anchor_lang::AnchorSerialize;
use anchor_spl::token;
use anchor_spl::token::spl_token::native_mint;
use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::system_program;
use solana_sdk::sysvar::rent;

use crate::errors::{Error, Result};
use crate::pda;
use crate::state::Listing;

// First 8 bytes of SHA256("global:<instruction name>")
pub(crate) const CREATE_LISTING_DISCRIMINATOR: [u8; 8] = [18, 168, 45, 24, 191, 31, 117, 54];
pub(crate) const ASK_DISCRIMINATOR: [u8; 8] = [97, 30, 35, 43, 106, 251, 150, 185];
pub(crate) const BUY_DISCRIMINATOR: [u8; 8] = [102, 6, 61, 18, 1, 218, 235, 234];
pub(crate) const CLOSE_LISTING_DISCRIMINATOR: [u8; 8] = [33, 15, 192, 81, 78, 175, 159, 97];

#[derive(AnchorSerialize)]
pub(crate) struct CreateListingArgs {
    pub ask: u64,
    pub listing_bump: u8,
    pub nft_vault_bump: u8,
}

#[derive(AnchorSerialize)]
pub(crate) struct AskArgs {
    pub new_ask: u64,
    pub listing_bump: u8,
}

#[derive(AnchorSerialize)]
pub(crate) struct BuyArgs {
    pub listing_bump: u8,
    pub market_vault_bump: u8,
    pub nft_vault_bump: u8,
}

#[derive(AnchorSerialize)]
pub(crate) struct CloseListingArgs {
    pub listing_bump: u8,
    pub nft_vault_bump: u8,
}

fn instruction_data(discriminator: [u8; 8], args: &impl AnchorSerialize) -> Result<Vec<u8>> {
    let mut data = discriminator.to_vec();
    args.serialize(&mut data)
        .map_err(|err| Error::Codec(err.to_string()))?;
    Ok(data)
}

/// `create_listing(ask, listing_bump, nft_vault_bump)` — escrows one unit
/// of `nft_mint` out of `nft_account` and initializes the listing record.
pub fn create_listing(
    program_id: &Pubkey,
    market: &Pubkey,
    seller: &Pubkey,
    nft_mint: &Pubkey,
    nft_account: &Pubkey,
    ask: u64,
) -> Result<Instruction> {
    let (listing, listing_bump) = pda::listing_address(program_id, market, nft_mint, seller)?;
    let (nft_vault, nft_vault_bump) = pda::nft_vault_address(program_id, nft_mint)?;
    let data = instruction_data(
        CREATE_LISTING_DISCRIMINATOR,
        &CreateListingArgs {
            ask,
            listing_bump,
            nft_vault_bump,
        },
    )?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*seller, true),
            AccountMeta::new(listing, false),
            AccountMeta::new_readonly(*market, false),
            AccountMeta::new(nft_vault, false),
            AccountMeta::new(*nft_account, false),
            AccountMeta::new_readonly(*nft_mint, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(token::ID, false),
            AccountMeta::new_readonly(rent::ID, false),
        ],
        data,
    })
}

/// `ask(new_ask, listing_bump)` — seller-only price change on an active
/// listing; mutates nothing but the ask field.
pub fn ask(
    program_id: &Pubkey,
    market: &Pubkey,
    seller: &Pubkey,
    nft_mint: &Pubkey,
    new_ask: u64,
) -> Result<Instruction> {
    let (listing, listing_bump) = pda::listing_address(program_id, market, nft_mint, seller)?;
    let data = instruction_data(
        ASK_DISCRIMINATOR,
        &AskArgs {
            new_ask,
            listing_bump,
        },
    )?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*seller, true),
            AccountMeta::new(listing, false),
            AccountMeta::new_readonly(*market, false),
            AccountMeta::new_readonly(*nft_mint, false),
            AccountMeta::new_readonly(token::ID, false),
        ],
        data,
    })
}

/// `buy(listing_bump, market_vault_bump, nft_vault_bump)` — pays the ask
/// through the market's proceeds vault and moves the NFT from its vault
/// into `buyer_nft_account`, a freshly created account signing the
/// transaction.
pub fn buy(
    program_id: &Pubkey,
    listing_record: &Listing,
    buyer: &Pubkey,
    buyer_nft_account: &Pubkey,
) -> Result<Instruction> {
    let (listing, listing_bump) = pda::listing_address(
        program_id,
        &listing_record.market,
        &listing_record.nft_mint,
        &listing_record.seller,
    )?;
    let (market_vault, market_vault_bump) =
        pda::market_vault_address(program_id, &listing_record.market)?;
    let (nft_vault, nft_vault_bump) = pda::nft_vault_address(program_id, &listing_record.nft_mint)?;
    let data = instruction_data(
        BUY_DISCRIMINATOR,
        &BuyArgs {
            listing_bump,
            market_vault_bump,
            nft_vault_bump,
        },
    )?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*buyer, true),
            AccountMeta::new(*buyer_nft_account, true),
            AccountMeta::new(listing, false),
            AccountMeta::new(listing_record.seller, false),
            AccountMeta::new_readonly(listing_record.market, false),
            AccountMeta::new(market_vault, false),
            AccountMeta::new(nft_vault, false),
            AccountMeta::new_readonly(listing_record.nft_mint, false),
            AccountMeta::new_readonly(native_mint::ID, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(token::ID, false),
            AccountMeta::new_readonly(rent::ID, false),
        ],
        data,
    })
}

/// `close_listing(listing_bump, nft_vault_bump)` — seller-only; returns the
/// NFT into `seller_nft_account` (freshly created, co-signing) and reclaims
/// the listing and vault rent.
pub fn close_listing(
    program_id: &Pubkey,
    market: &Pubkey,
    seller: &Pubkey,
    nft_mint: &Pubkey,
    seller_nft_account: &Pubkey,
) -> Result<Instruction> {
    let (listing, listing_bump) = pda::listing_address(program_id, market, nft_mint, seller)?;
    let (nft_vault, nft_vault_bump) = pda::nft_vault_address(program_id, nft_mint)?;
    let data = instruction_data(
        CLOSE_LISTING_DISCRIMINATOR,
        &CloseListingArgs {
            listing_bump,
            nft_vault_bump,
        },
    )?;
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*seller, true),
            AccountMeta::new(*seller_nft_account, true),
            AccountMeta::new(nft_vault, false),
            AccountMeta::new(listing, false),
            AccountMeta::new_readonly(*market, false),
            AccountMeta::new_readonly(*nft_mint, false),
            AccountMeta::new_readonly(system_program::ID, false),
            AccountMeta::new_readonly(token::ID, false),
            AccountMeta::new_readonly(rent::ID, false),
        ],
        data,
    })
}
