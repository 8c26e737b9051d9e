//! Latest-wins session state.
//!
//! Connecting a wallet bumps a generation counter; refresh tasks capture
//! the generation when they start, and a result from a superseded
//! generation is dropped instead of overwriting fresher state. Profile and
//! snapshot slots are replaced wholesale, so readers never observe a
//! half-built view.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;
use solana_sdk::signature::Keypair;

use crate::portfolio::WalletProfile;
use crate::scanner::MarketplaceSnapshot;

#[derive(Default)]
pub struct Session {
    generation: AtomicU64,
    wallet: RwLock<Option<Arc<Keypair>>>,
    profile: RwLock<Option<WalletProfile>>,
    snapshot: RwLock<Option<MarketplaceSnapshot>>,
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(|poisoned| poisoned.into_inner())
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Connects a wallet, superseding the previous one. The generation is
    /// bumped before the slots are cleared so an in-flight refresh for the
    /// old wallet can no longer apply.
    pub fn connect(&self, wallet: Keypair) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *write_lock(&self.wallet) = Some(Arc::new(wallet));
        *write_lock(&self.profile) = None;
        *write_lock(&self.snapshot) = None;
        generation
    }

    /// Wallet plus the generation a refresh task should carry.
    pub fn current(&self) -> Option<(u64, Arc<Keypair>)> {
        let wallet = read_lock(&self.wallet).clone()?;
        Some((self.generation.load(Ordering::SeqCst), wallet))
    }

    pub fn wallet(&self) -> Option<Arc<Keypair>> {
        read_lock(&self.wallet).clone()
    }

    /// Stores the profile iff `generation` is still current.
    pub fn apply_profile(&self, generation: u64, profile: WalletProfile) -> bool {
        let mut slot = write_lock(&self.profile);
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding stale wallet profile from generation {generation}");
            return false;
        }
        *slot = Some(profile);
        true
    }

    /// Stores the snapshot iff `generation` is still current.
    pub fn apply_snapshot(&self, generation: u64, snapshot: MarketplaceSnapshot) -> bool {
        let mut slot = write_lock(&self.snapshot);
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("discarding stale marketplace snapshot from generation {generation}");
            return false;
        }
        *slot = Some(snapshot);
        true
    }

    pub fn profile(&self) -> Option<WalletProfile> {
        read_lock(&self.profile).clone()
    }

    pub fn snapshot(&self) -> Option<MarketplaceSnapshot> {
        read_lock(&self.snapshot).clone()
    }
}
