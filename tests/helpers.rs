//! Shared test helpers for oft-wire tests
//!
//! This module provides constants and helper functions used by the
//! integration tests.

#![allow(dead_code)]

use oft_wire::chains::{Chain, Environment};
use oft_wire::metadata::MetadataDocument;
use oft_wire::policy::{RoutePolicy, RoutingRules};
use oft_wire::tables::{DvnGroup, DvnRegistry, EnforcedOption, EnforcedOptionTable, MultisigTable};
use serde_json::{json, Value};
use std::path::PathBuf;

// ============================================================================
// CONSTANTS
// ============================================================================

// ------------------------------- EVM ADDRESSES --------------------------------

/// Dummy EVM multisig (40 hex characters)
pub const DUMMY_MULTISIG_EVM: &str = "0x0000000000000000000000000000000000000001";

/// Dummy EVM contract address (40 hex characters)
pub const DUMMY_CONTRACT_ADDR_EVM: &str = "0x0000000000000000000000000000000000000002";

/// Dummy DVN addresses on EVM chains
pub const DUMMY_DVN_REQUIRED_EVM: &str = "0x0000000000000000000000000000000000000003";
pub const DUMMY_DVN_OPTIONAL_A_EVM: &str = "0x0000000000000000000000000000000000000004";
pub const DUMMY_DVN_OPTIONAL_B_EVM: &str = "0x0000000000000000000000000000000000000005";
pub const DUMMY_DVN_SPECIAL_EVM: &str = "0x0000000000000000000000000000000000000006";

/// Dummy message libraries and executor (EVM)
pub const DUMMY_SEND_LIB_EVM: &str = "0x00000000000000000000000000000000000000aa";
pub const DUMMY_RECEIVE_LIB_EVM: &str = "0x00000000000000000000000000000000000000bb";
pub const DUMMY_EXECUTOR_EVM: &str = "0x00000000000000000000000000000000000000cc";

/// All-zero EVM address (placeholder)
pub const ZERO_ADDR_EVM: &str = "0x0000000000000000000000000000000000000000";

// ------------------------------ SOLANA ADDRESSES ------------------------------

/// Dummy Solana keys (base58, 32 bytes of 0x01 / 0x02 / 0x03 / 0x04)
pub const DUMMY_SOLANA_KEY_1: &str = "4vJ9JU1bJJE96FWSJKvHsmmFADCg4gpZQff4P3bkLKi";
pub const DUMMY_SOLANA_KEY_2: &str = "8qbHbw2BbbTHBW1sbeqakYXVKRQM8Ne7pLK7m6CVfeR";
pub const DUMMY_SOLANA_KEY_3: &str = "CktRuQ2mttgRGkXJtyksdKHjUdc2C4TgDzyB98oEzy8";
pub const DUMMY_SOLANA_KEY_4: &str = "GgBaCs3NCBuZN12kCJgAW63ydqohFkHEdfdEXBPzLHq";

/// All-zero Solana key (system program, placeholder)
pub const ZERO_KEY_SOLANA: &str = "11111111111111111111111111111111";

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Create a small policy over Arbitrum, Base and Solana mainnet.
///
/// - Wyoming (required) runs on Arbitrum and Solana, not Base
/// - GoogleCloud and LzLabs (optional) run on Arbitrum; LzLabs also on Base
/// - Canary (special) runs on Arbitrum; Base is the special chain
/// - Solana has a custom enforced option, the EVM chains use the default
pub fn create_test_policy() -> RoutePolicy {
    let dvns = DvnRegistry::new()
        .with_group(DvnGroup::Canary, [(Chain::ArbitrumMainnet, DUMMY_DVN_SPECIAL_EVM)])
        .with_group(DvnGroup::GoogleCloud, [(Chain::ArbitrumMainnet, DUMMY_DVN_OPTIONAL_A_EVM)])
        .with_group(
            DvnGroup::LzLabs,
            [
                (Chain::ArbitrumMainnet, DUMMY_DVN_OPTIONAL_B_EVM),
                (Chain::BaseMainnet, DUMMY_DVN_OPTIONAL_B_EVM),
            ],
        )
        .with_group(
            DvnGroup::Wyoming,
            [
                (Chain::ArbitrumMainnet, DUMMY_DVN_REQUIRED_EVM),
                (Chain::SolanaMainnet, DUMMY_SOLANA_KEY_3),
            ],
        );

    let enforced = EnforcedOptionTable::new()
        .with(Chain::SolanaMainnet, vec![EnforcedOption::lz_receive(200_000, 2_000_000)]);

    let multisigs = MultisigTable::new()
        .with(Chain::ArbitrumMainnet, DUMMY_MULTISIG_EVM)
        .with(Chain::BaseMainnet, DUMMY_MULTISIG_EVM)
        .with(Chain::SolanaMainnet, DUMMY_SOLANA_KEY_4);

    let rules = RoutingRules {
        special_chain: Some(Chain::BaseMainnet),
        ..RoutingRules::builtin()
    };

    RoutePolicy::new(dvns, enforced, multisigs, rules)
}

/// Create a metadata document JSON value with one EVM and one Solana entry.
///
/// The Arbitrum entry also lists a deprecated DVN.
pub fn create_metadata_json() -> Value {
    json!({
        "arbitrum": {
            "deployments": [
                {
                    "eid": "30110",
                    "chainKey": "arbitrum",
                    "sendUln302": { "address": DUMMY_SEND_LIB_EVM },
                    "receiveUln302": { "address": DUMMY_RECEIVE_LIB_EVM },
                    "executor": { "address": DUMMY_EXECUTOR_EVM }
                },
                { "eid": "110", "chainKey": "arbitrum" }
            ],
            "dvns": {
                "0x00000000000000000000000000000000000000DD": {
                    "version": 2,
                    "canonicalName": "Retired Operator",
                    "id": "retired",
                    "deprecated": true
                }
            }
        },
        "base": {
            "deployments": [
                {
                    "eid": "30184",
                    "chainKey": "base",
                    "sendUln302": { "address": DUMMY_SEND_LIB_EVM },
                    "receiveUln302": { "address": DUMMY_RECEIVE_LIB_EVM },
                    "executor": { "address": DUMMY_EXECUTOR_EVM }
                }
            ]
        },
        "solana": {
            "deployments": [
                {
                    "eid": "30168",
                    "chainKey": "solana",
                    "sendUln302": { "address": DUMMY_SOLANA_KEY_1 },
                    "receiveUln302": { "address": DUMMY_SOLANA_KEY_1 },
                    "executor": { "address": DUMMY_SOLANA_KEY_2, "pda": DUMMY_SOLANA_KEY_3 }
                }
            ]
        }
    })
}

/// Parse [`create_metadata_json`] into a document.
pub fn create_metadata_document() -> MetadataDocument {
    serde_json::from_value(create_metadata_json()).unwrap()
}

/// Create an empty scratch directory under `.tmp/` for one test.
pub fn create_test_dir(name: &str) -> PathBuf {
    let dir = PathBuf::from(".tmp").join(name);
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

/// Write a Solana OFT deployment record under `deployments_dir`.
pub fn write_solana_deployment(deployments_dir: &PathBuf, environment: Environment, body: Value) -> PathBuf {
    let network_dir = deployments_dir.join(format!("solana-{}", environment));
    std::fs::create_dir_all(&network_dir).unwrap();
    let path = network_dir.join("OFT.json");
    std::fs::write(&path, serde_json::to_string_pretty(&body).unwrap()).unwrap();
    path
}
