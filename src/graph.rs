//! Graph Generator Module
//!
//! Builds the directed OApp configuration graph consumed by the wiring driver:
//! every declared contract, plus one connection for every ordered pair of
//! distinct contracts. Each connection carries the destination's enforced
//! options and, depending on [`GraphOptions`], send/receive ULN config and
//! message-library settings. Contracts optionally carry owner/delegate.
//!
//! Mainnet and testnet use the same generator with different options:
//! mainnet pins DVNs and multisig ownership, testnet leaves both to the
//! driver's defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;
use tracing::{debug, info};

use crate::address::validate_address;
use crate::chains::{Chain, Environment};
use crate::metadata::{MetadataDocument, MetadataError};
use crate::policy::{PolicyError, RoutePolicy};
use crate::tables::EnforcedOption;

/// Executor message size limit attached with library settings.
pub const DEFAULT_MAX_MESSAGE_SIZE: u32 = 10_000;

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("Contract on {chain} does not belong to the {expected} graph")]
    WrongEnvironment { chain: Chain, expected: Environment },

    #[error("Endpoint {chain} is declared more than once; each endpoint may carry a single contract")]
    DuplicateEndpoint { chain: Chain },

    #[error("Contract on {chain} has an empty contract name")]
    EmptyContractName { chain: Chain },

    #[error("Contract address '{address}' on {chain} is invalid: {reason}")]
    InvalidAddress {
        chain: Chain,
        address: String,
        reason: String,
    },

    #[error(transparent)]
    Policy(#[from] PolicyError),

    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

// ============================================================================
// GRAPH STRUCTURES
// ============================================================================

/// A deployed contract instance on one endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ContractPoint {
    /// EVM contract resolved by deployment name at wiring time
    Named {
        eid: Chain,
        #[serde(rename = "contractName")]
        contract_name: String,
    },
    /// Contract with a known address (Solana OFT store)
    Address { eid: Chain, address: String },
}

impl ContractPoint {
    pub fn named(chain: Chain, contract_name: impl Into<String>) -> Self {
        ContractPoint::Named {
            eid: chain,
            contract_name: contract_name.into(),
        }
    }

    pub fn with_address(chain: Chain, address: impl Into<String>) -> Self {
        ContractPoint::Address {
            eid: chain,
            address: address.into(),
        }
    }

    pub fn chain(&self) -> Chain {
        match self {
            ContractPoint::Named { eid, .. } | ContractPoint::Address { eid, .. } => *eid,
        }
    }
}

/// Owner and delegate for one contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipConfig {
    pub owner: String,
    pub delegate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractNode {
    pub contract: ContractPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<OwnershipConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UlnConfig {
    #[serde(rename = "requiredDVNs")]
    pub required_dvns: Vec<String>,
    #[serde(rename = "optionalDVNs")]
    pub optional_dvns: Vec<String>,
    #[serde(rename = "optionalDVNThreshold")]
    pub optional_dvn_threshold: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorConfig {
    pub max_message_size: u32,
    pub executor: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub executor_config: Option<ExecutorConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uln_config: Option<UlnConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveConfig {
    pub uln_config: UlnConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiveLibraryConfig {
    pub receive_library: String,
    pub grace_period: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionConfig {
    pub enforced_options: Vec<EnforcedOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_library: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receive_library_config: Option<ReceiveLibraryConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub send_config: Option<SendConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receive_config: Option<ReceiveConfig>,
}

/// Directed edge `from -> to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Connection {
    pub from: ContractPoint,
    pub to: ContractPoint,
    pub config: ConnectionConfig,
}

/// Full configuration graph handed to the wiring driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAppGraph {
    pub contracts: Vec<ContractNode>,
    pub connections: Vec<Connection>,
}

impl OAppGraph {
    pub fn connection(&self, from: Chain, to: Chain) -> Option<&Connection> {
        self.connections
            .iter()
            .find(|c| c.from.chain() == from && c.to.chain() == to)
    }
}

// ============================================================================
// GENERATOR
// ============================================================================

/// Environment-specific switches for the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GraphOptions {
    /// Environment every declared contract must belong to
    pub environment: Environment,
    /// Attach send/receive ULN config (required/optional DVNs) to connections
    pub include_uln_config: bool,
    /// Attach owner/delegate multisig to contracts
    pub include_ownership: bool,
}

impl GraphOptions {
    pub fn mainnet() -> Self {
        Self {
            environment: Environment::Mainnet,
            include_uln_config: true,
            include_ownership: true,
        }
    }

    pub fn testnet() -> Self {
        Self {
            environment: Environment::Testnet,
            include_uln_config: false,
            include_ownership: false,
        }
    }

    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Mainnet => Self::mainnet(),
            Environment::Testnet => Self::testnet(),
        }
    }
}

pub struct GraphBuilder<'a> {
    policy: &'a RoutePolicy,
    options: GraphOptions,
    metadata: Option<&'a MetadataDocument>,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(policy: &'a RoutePolicy, options: GraphOptions) -> Self {
        Self {
            policy,
            options,
            metadata: None,
        }
    }

    /// Resolves send/receive libraries and executor for each edge from `metadata`.
    pub fn with_metadata(mut self, metadata: &'a MetadataDocument) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Generates the graph for `contracts`.
    ///
    /// Connections follow declaration order: for each `from` in order, every
    /// other contract as `to` in order. N contracts yield N×(N−1) connections.
    pub fn build(&self, contracts: &[ContractPoint]) -> Result<OAppGraph, GraphError> {
        self.validate(contracts)?;

        let nodes = contracts
            .iter()
            .map(|contract| self.node(contract))
            .collect::<Result<Vec<_>, _>>()?;

        let mut connections = Vec::with_capacity(contracts.len() * contracts.len().saturating_sub(1));
        for (i, from) in contracts.iter().enumerate() {
            for (j, to) in contracts.iter().enumerate() {
                if i == j {
                    continue;
                }
                connections.push(Connection {
                    from: from.clone(),
                    to: to.clone(),
                    config: self.connection_config(from.chain(), to.chain())?,
                });
            }
        }

        info!(
            "Generated {} graph: {} contracts, {} connections",
            self.options.environment,
            nodes.len(),
            connections.len()
        );

        Ok(OAppGraph {
            contracts: nodes,
            connections,
        })
    }

    fn validate(&self, contracts: &[ContractPoint]) -> Result<(), GraphError> {
        let mut seen = HashSet::new();
        for contract in contracts {
            let chain = contract.chain();
            if chain.environment() != self.options.environment {
                return Err(GraphError::WrongEnvironment {
                    chain,
                    expected: self.options.environment,
                });
            }
            if !seen.insert(chain) {
                return Err(GraphError::DuplicateEndpoint { chain });
            }
            match contract {
                ContractPoint::Named { contract_name, .. } => {
                    if contract_name.trim().is_empty() {
                        return Err(GraphError::EmptyContractName { chain });
                    }
                }
                ContractPoint::Address { address, .. } => {
                    validate_address(chain.family(), address).map_err(|e| GraphError::InvalidAddress {
                        chain,
                        address: address.clone(),
                        reason: e.to_string(),
                    })?;
                }
            }
        }
        Ok(())
    }

    fn node(&self, contract: &ContractPoint) -> Result<ContractNode, GraphError> {
        let config = if self.options.include_ownership {
            let multisig = self.policy.multisig(contract.chain())?;
            Some(OwnershipConfig {
                owner: multisig.to_string(),
                delegate: multisig.to_string(),
            })
        } else {
            None
        };

        Ok(ContractNode {
            contract: contract.clone(),
            config,
        })
    }

    fn connection_config(&self, from: Chain, to: Chain) -> Result<ConnectionConfig, GraphError> {
        debug!("Building connection {} -> {}", from, to);

        let uln_config = self.options.include_uln_config.then(|| {
            let optional_dvns = self.policy.optional_dvns(from, to);
            let optional_dvn_threshold = self.policy.threshold_for(&optional_dvns);
            if optional_dvn_threshold < self.policy.optional_threshold() {
                debug!(
                    "Optional DVN threshold capped at {} on {} -> {}",
                    optional_dvn_threshold, from, to
                );
            }
            UlnConfig {
                required_dvns: self.policy.required_dvns(from),
                optional_dvns,
                optional_dvn_threshold,
            }
        });

        let mut config = ConnectionConfig {
            enforced_options: self.policy.enforced_options(to),
            send_library: None,
            receive_library_config: None,
            send_config: None,
            receive_config: uln_config.clone().map(|uln_config| ReceiveConfig { uln_config }),
        };

        let executor_config = match self.metadata {
            Some(metadata) => {
                config.send_library = Some(metadata.send_library(from)?.to_string());
                config.receive_library_config = Some(ReceiveLibraryConfig {
                    receive_library: metadata.receive_library(from)?.to_string(),
                    grace_period: 0,
                });
                Some(ExecutorConfig {
                    max_message_size: DEFAULT_MAX_MESSAGE_SIZE,
                    executor: metadata.executor(from)?.as_str().to_string(),
                })
            }
            None => None,
        };

        if executor_config.is_some() || uln_config.is_some() {
            config.send_config = Some(SendConfig {
                executor_config,
                uln_config,
            });
        }

        Ok(config)
    }
}
