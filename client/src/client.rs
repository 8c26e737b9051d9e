//! High-level marketplace operations for one connected wallet: the four
//! trade calls plus the two state refreshes.

use std::sync::Arc;

use log::info;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;

use crate::config::MarketConfig;
use crate::errors::{Error, Result};
use crate::instructions::trade;
use crate::ledger::Ledger;
use crate::portfolio::{self, WalletProfile};
use crate::scanner::{self, MarketplaceSnapshot};
use crate::session::Session;
use crate::state::Listing;

pub struct MarketplaceClient<L> {
    config: MarketConfig,
    ledger: L,
    session: Session,
}

impl<L: Ledger> MarketplaceClient<L> {
    pub fn new(config: MarketConfig, ledger: L) -> Self {
        Self {
            config,
            ledger,
            session: Session::new(),
        }
    }

    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Connects a wallet, superseding the previous one; state from the old
    /// wallet is cleared and its in-flight refreshes can no longer apply.
    pub fn connect(&self, wallet: Keypair) {
        self.session.connect(wallet);
    }

    /// Rebuilds the wallet profile. A completion superseded by a newer
    /// connection is discarded; on failure the previous profile stands.
    pub async fn refresh_profile(&self) -> Result<WalletProfile> {
        let (generation, wallet) = self.session.current().ok_or(Error::WalletNotConnected)?;
        let profile = portfolio::classify(&self.ledger, &wallet.pubkey()).await?;
        self.session.apply_profile(generation, profile.clone());
        Ok(profile)
    }

    /// Rebuilds the marketplace snapshot under the same latest-wins rule.
    pub async fn refresh_listings(&self) -> Result<MarketplaceSnapshot> {
        let (generation, wallet) = self.session.current().ok_or(Error::WalletNotConnected)?;
        let snapshot =
            scanner::scan(&self.ledger, &self.config.program_id, &wallet.pubkey()).await?;
        self.session.apply_snapshot(generation, snapshot.clone());
        Ok(snapshot)
    }

    /// Lists one NFT at `ask` base units. The program takes custody of the
    /// token until the listing is bought or closed.
    pub async fn create_listing(
        &self,
        nft_mint: &Pubkey,
        nft_account: &Pubkey,
        ask: u64,
    ) -> Result<Signature> {
        if ask == 0 {
            return Err(Error::InvalidAsk);
        }
        let wallet = self.connected_wallet()?;
        let instruction = trade::create_listing(
            &self.config.program_id,
            &self.config.market,
            &wallet.pubkey(),
            nft_mint,
            nft_account,
            ask,
        )?;
        info!("listing mint {nft_mint} at {ask} base units");
        self.ledger.send(instruction, &[wallet.as_ref()]).await
    }

    /// Changes the ask on one of the wallet's own listings.
    pub async fn reprice(&self, nft_mint: &Pubkey, new_ask: u64) -> Result<Signature> {
        if new_ask == 0 {
            return Err(Error::InvalidAsk);
        }
        let wallet = self.connected_wallet()?;
        let instruction = trade::ask(
            &self.config.program_id,
            &self.config.market,
            &wallet.pubkey(),
            nft_mint,
            new_ask,
        )?;
        info!("repricing mint {nft_mint} to {new_ask} base units");
        self.ledger.send(instruction, &[wallet.as_ref()]).await
    }

    /// Buys a listed NFT. The purchased token lands in a freshly created
    /// account; the returned keypair is the only key to it.
    pub async fn buy(&self, listing: &Listing) -> Result<(Signature, Keypair)> {
        let wallet = self.connected_wallet()?;
        let destination = Keypair::new();
        let instruction = trade::buy(
            &self.config.program_id,
            listing,
            &wallet.pubkey(),
            &destination.pubkey(),
        )?;
        info!(
            "buying mint {} from {} for {} base units",
            listing.nft_mint, listing.seller, listing.ask
        );
        let signature = self
            .ledger
            .send(instruction, &[wallet.as_ref(), &destination])
            .await?;
        Ok((signature, destination))
    }

    /// Takes one of the wallet's own listings off the market. The returned
    /// keypair owns the account the NFT comes back to.
    pub async fn close(&self, nft_mint: &Pubkey) -> Result<(Signature, Keypair)> {
        let wallet = self.connected_wallet()?;
        let destination = Keypair::new();
        let instruction = trade::close_listing(
            &self.config.program_id,
            &self.config.market,
            &wallet.pubkey(),
            nft_mint,
            &destination.pubkey(),
        )?;
        info!("closing listing for mint {nft_mint}");
        let signature = self
            .ledger
            .send(instruction, &[wallet.as_ref(), &destination])
            .await?;
        Ok((signature, destination))
    }

    fn connected_wallet(&self) -> Result<Arc<Keypair>> {
        self.session.wallet().ok_or(Error::WalletNotConnected)
    }
}
