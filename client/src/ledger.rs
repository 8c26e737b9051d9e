//! Boundary to the external ledger: the read queries the client depends on
//! plus transaction submission. All reads are eventually consistent
//! snapshots with no cross-call ordering guarantee.

use std::str::FromStr;

use solana_account_decoder::UiAccountData;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_request::TokenAccountsFilter;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature};
use solana_sdk::signer::Signer;
use solana_sdk::transaction::Transaction;

use anchor_spl::token;

use crate::errors::{Error, Result};
use crate::portfolio::TokenHolding;

/// Ledger reads and instruction submission as the client needs them.
pub trait Ledger {
    /// Bulk "accounts owned by program" query: `(address, data)` pairs in
    /// ledger-returned order.
    async fn program_accounts(&self, program_id: &Pubkey) -> Result<Vec<(Pubkey, Vec<u8>)>>;

    /// All token balances owned by `owner`, in ledger-returned order.
    async fn token_holdings(&self, owner: &Pubkey) -> Result<Vec<TokenHolding>>;

    /// Total supply of one mint, in base units.
    async fn mint_supply(&self, mint: &Pubkey) -> Result<u64>;

    /// Signs with `signers` (first entry pays fees) and submits a single
    /// instruction as one transaction.
    async fn send(&self, instruction: Instruction, signers: &[&Keypair]) -> Result<Signature>;
}

/// Production implementation over the nonblocking RPC client.
pub struct RpcLedger {
    rpc: RpcClient,
}

impl RpcLedger {
    /// Connects at `processed` commitment so reads and preflight run
    /// against the freshest bank.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc: RpcClient::new_with_commitment(rpc_url.into(), CommitmentConfig::processed()),
        }
    }
}

impl Ledger for RpcLedger {
    async fn program_accounts(&self, program_id: &Pubkey) -> Result<Vec<(Pubkey, Vec<u8>)>> {
        let accounts = self.rpc.get_program_accounts(program_id).await?;
        Ok(accounts
            .into_iter()
            .map(|(address, account)| (address, account.data))
            .collect())
    }

    async fn token_holdings(&self, owner: &Pubkey) -> Result<Vec<TokenHolding>> {
        let keyed = self
            .rpc
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(token::ID))
            .await?;
        let mut holdings = Vec::with_capacity(keyed.len());
        for keyed_account in keyed {
            let address = Pubkey::from_str(&keyed_account.pubkey)
                .map_err(|err| Error::Codec(format!("token account address: {err}")))?;
            holdings.push(parse_token_account(address, &keyed_account.account.data)?);
        }
        Ok(holdings)
    }

    async fn mint_supply(&self, mint: &Pubkey) -> Result<u64> {
        let supply = self.rpc.get_token_supply(mint).await?;
        supply
            .amount
            .parse::<u64>()
            .map_err(|err| Error::Codec(format!("mint supply for {mint}: {err}")))
    }

    async fn send(&self, instruction: Instruction, signers: &[&Keypair]) -> Result<Signature> {
        let payer = signers.first().ok_or(Error::WalletNotConnected)?;
        let blockhash = self.rpc.get_latest_blockhash().await?;
        let transaction = Transaction::new_signed_with_payer(
            &[instruction],
            Some(&payer.pubkey()),
            signers,
            blockhash,
        );
        self.rpc
            .send_and_confirm_transaction(&transaction)
            .await
            .map_err(classify_send_error)
    }
}

/// The ledger reports jsonParsed token accounts; pull the mint and raw
/// balance out of the parsed payload.
fn parse_token_account(address: Pubkey, data: &UiAccountData) -> Result<TokenHolding> {
    let UiAccountData::Json(parsed) = data else {
        return Err(Error::Codec(format!(
            "token account {address} not returned as jsonParsed"
        )));
    };
    let info = &parsed.parsed["info"];
    let mint = info["mint"]
        .as_str()
        .and_then(|raw| Pubkey::from_str(raw).ok())
        .ok_or_else(|| Error::Codec(format!("token account {address} missing mint")))?;
    let amount = info["tokenAmount"]["amount"]
        .as_str()
        .and_then(|raw| raw.parse::<u64>().ok())
        .ok_or_else(|| Error::Codec(format!("token account {address} missing amount")))?;
    Ok(TokenHolding {
        address,
        mint,
        amount,
    })
}

/// A transaction error inside the response means the program refused the
/// instruction; that verdict is surfaced verbatim and never retried.
/// Anything else is transport-level.
fn classify_send_error(err: ClientError) -> Error {
    match err.get_transaction_error() {
        Some(rejection) => Error::Rejected(rejection.to_string()),
        None => Error::Remote(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use solana_account_decoder::parse_account_data::ParsedAccount;

    #[test]
    fn parses_a_json_token_account() {
        let address = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let data = UiAccountData::Json(ParsedAccount {
            program: "spl-token".to_string(),
            parsed: json!({
                "info": {
                    "mint": mint.to_string(),
                    "tokenAmount": { "amount": "1", "decimals": 0 }
                },
                "type": "account"
            }),
            space: 165,
        });
        let holding = parse_token_account(address, &data).unwrap();
        assert_eq!(holding.mint, mint);
        assert_eq!(holding.amount, 1);
    }

    #[test]
    fn rejects_non_parsed_payloads() {
        let address = Pubkey::new_unique();
        let data = UiAccountData::LegacyBinary("AAEC".to_string());
        assert!(parse_token_account(address, &data).is_err());
    }
}
