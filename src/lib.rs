//! OFT wiring library
//!
//! Generates the cross-chain configuration graph for an omnichain fungible
//! token: DVN security policy, enforced execution options, owner/delegate
//! multisigs and, optionally, message libraries resolved from the protocol's
//! metadata service.

pub mod address;
pub mod chains;
pub mod config;
pub mod graph;
pub mod metadata;
pub mod policy;
pub mod signer;
pub mod solana;
pub mod tables;

// Re-export public types for convenience
pub use chains::{Chain, ChainFamily, Environment, NetworkInfo};
pub use config::{ContractDeclaration, WireConfig};
pub use graph::{
    Connection, ConnectionConfig, ContractNode, ContractPoint, GraphBuilder, GraphError,
    GraphOptions, OAppGraph, UlnConfig,
};
pub use metadata::{ExecutorAddress, MetadataClient, MetadataDocument, MetadataError};
pub use policy::{PolicyError, RoutePolicy, RouteSummary, RoutingRules};
pub use signer::{SignerError, SignerMode};
pub use solana::{DeploymentError, SolanaDeployment};
pub use tables::{DvnGroup, EnforcedOption, ExecutorOptionType, DEFAULT_ENFORCED_OPTION};
