//! Configuration Management Module
//!
//! This module handles loading the wiring run configuration: which network the
//! graph is generated for, where the metadata service and deployment files
//! live, and which contracts are declared on which endpoints.
//!
//! Security parameters (DVNs, enforced options, multisigs) are not part of
//! this file; they live in [`crate::tables`].

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::address::validate_address;
use crate::chains::{Chain, ChainFamily, Environment};
use crate::graph::{ContractPoint, GraphOptions};
use crate::metadata::resolve_metadata_url;
use crate::solana::SolanaDeployment;

/// Environment variable overriding the default config path.
pub const CONFIG_PATH_ENV: &str = "WIRE_CONFIG_PATH";

/// Config path used when neither a CLI path nor [`CONFIG_PATH_ENV`] is given.
pub const DEFAULT_CONFIG_PATH: &str = "config/wire.toml";

// ============================================================================
// CONFIGURATION STRUCTURES
// ============================================================================

/// Main configuration structure for one wiring run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireConfig {
    /// Network the declared contracts live on
    pub network: Environment,
    /// Service settings (metadata URL, deployments directory, timeouts)
    #[serde(default)]
    pub service: ServiceConfig,
    /// Overrides for the network's default graph options
    #[serde(default)]
    pub graph: GraphOverrides,
    /// Declared contracts (use [[contract]] in TOML, one per endpoint)
    #[serde(default, rename = "contract")]
    pub contracts: Vec<ContractDeclaration>,
}

/// Service-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Metadata service URL (LZ_METADATA_URL takes precedence when set)
    #[serde(default)]
    pub metadata_url: Option<String>,
    /// Directory holding pre-derived deployment records (Solana OFT.json)
    #[serde(default = "default_deployments_dir")]
    pub deployments_dir: PathBuf,
    /// HTTP timeout for the metadata fetch, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            metadata_url: None,
            deployments_dir: default_deployments_dir(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

fn default_deployments_dir() -> PathBuf {
    PathBuf::from("deployments")
}

fn default_request_timeout_secs() -> u64 {
    30
}

/// Optional overrides of [`GraphOptions`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphOverrides {
    #[serde(default)]
    pub include_uln_config: Option<bool>,
    #[serde(default)]
    pub include_ownership: Option<bool>,
}

/// One declared contract.
///
/// EVM contracts give a deployment `contract_name` (or an explicit
/// `address`). Solana contracts may omit both, in which case the OFT store
/// from the deployment file is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractDeclaration {
    /// Endpoint (symbolic name, network name, or numeric eid)
    pub eid: Chain,
    #[serde(default)]
    pub contract_name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

// ============================================================================
// CONFIGURATION LOADING AND MANAGEMENT
// ============================================================================

impl WireConfig {
    /// Loads configuration from a TOML file.
    ///
    /// Path priority: `path` argument, then `WIRE_CONFIG_PATH`, then
    /// `config/wire.toml`. The configuration is validated before returning.
    ///
    /// # Returns
    ///
    /// * `Ok(WireConfig)` - Successfully loaded and validated configuration
    /// * `Err(anyhow::Error)` - File missing, unparsable, or invalid
    pub fn load_from_path(path: Option<&str>) -> anyhow::Result<Self> {
        let config_path = path
            .map(|p| p.to_string())
            .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
            .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());

        if Path::new(&config_path).exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read configuration file '{}'", config_path))?;
            let config: WireConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse configuration file '{}'", config_path))?;
            config.validate()?;
            Ok(config)
        } else {
            Err(anyhow::anyhow!(
                "Configuration file '{}' not found. Please copy the template:\n\
                cp config/wire.template.toml config/wire.toml\n\
                Then edit config/wire.toml with your contract declarations.",
                config_path
            ))
        }
    }

    /// Loads configuration from the default location.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from_path(None)
    }

    /// Validates the configuration for consistency.
    ///
    /// Checks:
    /// - At least two contracts are declared
    /// - Every contract is on the configured network
    /// - No endpoint is declared twice
    /// - `contract_name` and `address` are not both set
    /// - EVM contracts have a name or an address
    /// - Explicit addresses match the chain family's format
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.contracts.len() < 2 {
            anyhow::bail!(
                "Configuration error: At least two [[contract]] entries are required to wire a mesh (got {})",
                self.contracts.len()
            );
        }

        let mut seen = HashSet::new();
        for contract in &self.contracts {
            let chain = contract.eid;

            if chain.environment() != self.network {
                anyhow::bail!(
                    "Configuration error: Contract on {} is a {} endpoint but network is {}",
                    chain,
                    chain.environment(),
                    self.network
                );
            }

            if !seen.insert(chain) {
                anyhow::bail!(
                    "Configuration error: Endpoint {} is declared more than once",
                    chain
                );
            }

            match (&contract.contract_name, &contract.address) {
                (Some(_), Some(_)) => anyhow::bail!(
                    "Configuration error: Contract on {} sets both contract_name and address",
                    chain
                ),
                (None, None) if chain.family() == ChainFamily::Evm => anyhow::bail!(
                    "Configuration error: EVM contract on {} needs a contract_name or an address",
                    chain
                ),
                (Some(_), None) if chain.family() == ChainFamily::Solana => anyhow::bail!(
                    "Configuration error: Solana contract on {} is addressed by its OFT store, not by contract_name",
                    chain
                ),
                (Some(name), None) if name.trim().is_empty() => anyhow::bail!(
                    "Configuration error: Contract on {} has an empty contract_name",
                    chain
                ),
                (None, Some(address)) => validate_address(chain.family(), address)
                    .map_err(|e| anyhow::anyhow!("Invalid address for contract on {}: {}", chain, e))?,
                _ => {}
            }
        }

        Ok(())
    }

    /// Graph options for the configured network, with overrides applied.
    pub fn graph_options(&self) -> GraphOptions {
        let mut options = GraphOptions::for_environment(self.network);
        if let Some(include) = self.graph.include_uln_config {
            options.include_uln_config = include;
        }
        if let Some(include) = self.graph.include_ownership {
            options.include_ownership = include;
        }
        options
    }

    /// Metadata URL for this run; see [`resolve_metadata_url`] for precedence.
    pub fn metadata_url(&self, cli_override: Option<&str>) -> String {
        resolve_metadata_url(cli_override, self.service.metadata_url.as_deref())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.service.request_timeout_secs)
    }

    /// Resolves declarations into contract points, in declaration order.
    ///
    /// Solana declarations without an address read the OFT store from the
    /// deployments directory.
    pub fn contract_points(&self) -> anyhow::Result<Vec<ContractPoint>> {
        self.contracts
            .iter()
            .map(|contract| {
                let chain = contract.eid;
                match (&contract.contract_name, &contract.address) {
                    (Some(name), _) => Ok(ContractPoint::named(chain, name.clone())),
                    (None, Some(address)) => Ok(ContractPoint::with_address(chain, address.clone())),
                    (None, None) => {
                        let deployment = SolanaDeployment::load(&self.service.deployments_dir, chain)
                            .with_context(|| format!("Failed to resolve OFT store for {}", chain))?;
                        Ok(ContractPoint::with_address(chain, deployment.oft_store))
                    }
                }
            })
            .collect()
    }
}
