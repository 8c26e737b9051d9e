use thiserror::Error;

/// Failure taxonomy for client operations.
///
/// `Rejected` carries the ledger's message verbatim. A rejected instruction
/// is state-dependent and must not be resubmitted without re-deriving fresh
/// state, so the client never retries on its own.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no off-curve bump in 0..=255 for the given seeds")]
    Derivation,

    #[error("codec failure: {0}")]
    Codec(String),

    #[error("ledger request failed: {0}")]
    Remote(#[from] solana_client::client_error::ClientError),

    #[error("program rejected instruction: {0}")]
    Rejected(String),

    #[error("ask must be greater than zero")]
    InvalidAsk,

    #[error("no wallet connected")]
    WalletNotConnected,

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, Error>;
