//! Transaction Signer Selection
//!
//! Decides whether wiring transactions are signed with a local keypair or
//! through the Fireblocks custodial signing service, based on environment
//! variables. This crate never signs; the resolved mode is handed to the
//! wiring driver.

use std::fmt;
use thiserror::Error;

use crate::address::validate_address;
use crate::chains::{ChainFamily, Environment};

pub const FIREBLOCKS_API_KEY_ENV: &str = "FIREBLOCKS_API_KEY";
pub const FIREBLOCKS_PRIVATE_KEY_ENV: &str = "FIREBLOCKS_PRIVATE_KEY";
pub const EVM_VAULT_ACCOUNT_IDS_ENV: &str = "EVM_FIREBLOCKS_VAULT_ACCOUNT_IDS";
pub const SOLANA_VAULT_ACCOUNT_ID_ENV: &str = "SOLANA_FIREBLOCKS_VAULT_ACCOUNT_IDS";
pub const SOLANA_PAYER_ADDRESS_ENV: &str = "SOLANA_PAYER_ADDRESS";
pub const SOLANA_ASSET_ID_ENV: &str = "SOLANA_FIREBLOCKS_ASSET_ID";

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("Missing required Fireblocks configuration. Please set environment variables: {}", .missing.join(", "))]
    MissingCredentials { missing: Vec<&'static str> },

    #[error("Invalid SOLANA_PAYER_ADDRESS '{address}': {reason}")]
    InvalidPayer { address: String, reason: String },
}

/// Fireblocks credentials and vault routing.
#[derive(Clone, PartialEq, Eq)]
pub struct FireblocksCredentials {
    pub api_key: String,
    pub private_key: String,
    /// Vault accounts used for EVM transactions (may be empty)
    pub evm_vault_account_ids: Vec<String>,
    pub solana_vault_account_id: String,
    pub solana_payer: String,
    pub solana_asset_id: String,
}

impl fmt::Debug for FireblocksCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FireblocksCredentials")
            .field("api_key", &"<redacted>")
            .field("private_key", &"<redacted>")
            .field("evm_vault_account_ids", &self.evm_vault_account_ids)
            .field("solana_vault_account_id", &self.solana_vault_account_id)
            .field("solana_payer", &self.solana_payer)
            .field("solana_asset_id", &self.solana_asset_id)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerMode {
    /// Local keypair / private key from the environment
    Local,
    /// Fireblocks custodial signing
    Fireblocks(FireblocksCredentials),
}

impl SignerMode {
    pub fn is_custodial(&self) -> bool {
        matches!(self, SignerMode::Fireblocks(_))
    }

    /// Resolves the signer from process environment variables.
    pub fn from_env(environment: Environment, require_custodial: bool) -> Result<Self, SignerError> {
        Self::resolve(environment, require_custodial, |key| std::env::var(key).ok())
    }

    /// Resolves the signer from a variable lookup.
    ///
    /// Fireblocks is selected when the API key, private key, Solana vault
    /// account and payer are all set. With `require_custodial`, any missing
    /// variable is an error naming every missing one; otherwise the local
    /// signer is used.
    pub fn resolve<F>(environment: Environment, require_custodial: bool, lookup: F) -> Result<Self, SignerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let required = [
            FIREBLOCKS_API_KEY_ENV,
            FIREBLOCKS_PRIVATE_KEY_ENV,
            SOLANA_VAULT_ACCOUNT_ID_ENV,
            SOLANA_PAYER_ADDRESS_ENV,
        ];
        let missing: Vec<&'static str> = required.into_iter().filter(|key| get(*key).is_none()).collect();

        if !missing.is_empty() {
            if require_custodial {
                return Err(SignerError::MissingCredentials { missing });
            }
            return Ok(SignerMode::Local);
        }

        let solana_payer = get(SOLANA_PAYER_ADDRESS_ENV).unwrap_or_default();
        validate_address(ChainFamily::Solana, &solana_payer).map_err(|e| SignerError::InvalidPayer {
            address: solana_payer.clone(),
            reason: e.to_string(),
        })?;

        let default_asset = match environment {
            Environment::Mainnet => "SOL",
            Environment::Testnet => "SOL_TEST",
        };

        Ok(SignerMode::Fireblocks(FireblocksCredentials {
            api_key: get(FIREBLOCKS_API_KEY_ENV).unwrap_or_default(),
            private_key: get(FIREBLOCKS_PRIVATE_KEY_ENV).unwrap_or_default(),
            evm_vault_account_ids: get(EVM_VAULT_ACCOUNT_IDS_ENV)
                .map(|ids| {
                    ids.split(',')
                        .map(str::trim)
                        .filter(|id| !id.is_empty())
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default(),
            solana_vault_account_id: get(SOLANA_VAULT_ACCOUNT_ID_ENV).unwrap_or_default(),
            solana_payer,
            solana_asset_id: get(SOLANA_ASSET_ID_ENV).unwrap_or_else(|| default_asset.to_string()),
        }))
    }
}
