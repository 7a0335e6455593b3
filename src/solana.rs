//! Solana OFT deployment records.
//!
//! The Solana OFT store is derived before wiring and written to
//! `<deployments_dir>/solana-<mainnet|testnet>/OFT.json`. The graph uses the
//! store key as the Solana contract address.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::address::validate_address;
use crate::chains::{Chain, ChainFamily, Environment};

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error("{chain} is not a Solana endpoint")]
    NotSolana { chain: Chain },

    #[error("Failed to read Solana deployment file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse Solana deployment file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Solana deployment file {path} is missing {field}")]
    MissingField { path: PathBuf, field: &'static str },

    #[error("Solana deployment file {path} has an invalid {field}: {reason}")]
    InvalidKey {
        path: PathBuf,
        field: &'static str,
        reason: String,
    },
}

/// Keys produced by the Solana OFT deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SolanaDeployment {
    #[serde(default)]
    pub program_id: String,
    #[serde(default)]
    pub mint: Option<String>,
    #[serde(default)]
    pub mint_authority: Option<String>,
    #[serde(default)]
    pub escrow: Option<String>,
    #[serde(default)]
    pub oft_store: String,
}

/// Path of the deployment file for a Solana chain.
pub fn deployment_path(deployments_dir: &Path, chain: Chain) -> Result<PathBuf, DeploymentError> {
    if chain.family() != ChainFamily::Solana {
        return Err(DeploymentError::NotSolana { chain });
    }
    let network = match chain.environment() {
        Environment::Mainnet => "solana-mainnet",
        Environment::Testnet => "solana-testnet",
    };
    Ok(deployments_dir.join(network).join("OFT.json"))
}

impl SolanaDeployment {
    /// Loads and checks the deployment file for `chain`.
    ///
    /// `programId` and `oftStore` must be present and valid base58 keys.
    pub fn load(deployments_dir: &Path, chain: Chain) -> Result<Self, DeploymentError> {
        let path = deployment_path(deployments_dir, chain)?;
        debug!("Reading Solana deployment from {}", path.display());

        let content = std::fs::read_to_string(&path).map_err(|source| DeploymentError::Read {
            path: path.clone(),
            source,
        })?;
        let deployment: SolanaDeployment =
            serde_json::from_str(&content).map_err(|source| DeploymentError::Parse {
                path: path.clone(),
                source,
            })?;

        for (field, value) in [("programId", &deployment.program_id), ("oftStore", &deployment.oft_store)] {
            if value.trim().is_empty() {
                return Err(DeploymentError::MissingField {
                    path: path.clone(),
                    field,
                });
            }
            validate_address(ChainFamily::Solana, value).map_err(|e| DeploymentError::InvalidKey {
                path: path.clone(),
                field,
                reason: e.to_string(),
            })?;
        }

        Ok(deployment)
    }
}
