//! Unit tests for configuration module

#[path = "helpers.rs"]
mod test_helpers;

use oft_wire::chains::{Chain, Environment};
use oft_wire::config::{ContractDeclaration, GraphOverrides, ServiceConfig, WireConfig};
use oft_wire::graph::{ContractPoint, GraphOptions};
use serde_json::json;
use std::path::PathBuf;
use std::time::Duration;
use test_helpers::{
    create_test_dir, write_solana_deployment, DUMMY_CONTRACT_ADDR_EVM, DUMMY_SOLANA_KEY_1,
    DUMMY_SOLANA_KEY_2,
};

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

fn named(chain: Chain, name: &str) -> ContractDeclaration {
    ContractDeclaration {
        eid: chain,
        contract_name: Some(name.to_string()),
        address: None,
    }
}

fn with_address(chain: Chain, address: &str) -> ContractDeclaration {
    ContractDeclaration {
        eid: chain,
        contract_name: None,
        address: Some(address.to_string()),
    }
}

fn bare(chain: Chain) -> ContractDeclaration {
    ContractDeclaration {
        eid: chain,
        contract_name: None,
        address: None,
    }
}

/// Create a minimal valid mainnet WireConfig for testing
fn create_test_config() -> WireConfig {
    WireConfig {
        network: Environment::Mainnet,
        service: ServiceConfig::default(),
        graph: GraphOverrides::default(),
        contracts: vec![
            named(Chain::ArbitrumMainnet, "FRNTAdapter"),
            named(Chain::BaseMainnet, "FRNTAdapter"),
        ],
    }
}

fn assert_invalid(config: &WireConfig, fragment: &str) {
    let err = config.validate().unwrap_err().to_string();
    assert!(err.contains(fragment), "error '{}' should mention '{}'", err, fragment);
}

// ============================================================================
// PARSING TESTS
// ============================================================================

/// What is tested: WireConfig parses from TOML with defaults applied
/// Why: Service and graph sections are optional
#[test]
fn test_config_parse_defaults() {
    let toml_str = r#"
network = "mainnet"

[[contract]]
eid = "ARBITRUM_V2_MAINNET"
contract_name = "FRNTAdapter"

[[contract]]
eid = 30184
contract_name = "FRNTAdapter"

[[contract]]
eid = "solana"
"#;

    let config: WireConfig = toml::from_str(toml_str).unwrap();
    config.validate().unwrap();

    assert_eq!(config.network, Environment::Mainnet);
    assert_eq!(config.contracts.len(), 3);
    assert_eq!(config.contracts[0].eid, Chain::ArbitrumMainnet);
    assert_eq!(config.contracts[1].eid, Chain::BaseMainnet);
    assert_eq!(config.contracts[2].eid, Chain::SolanaMainnet);
    assert_eq!(config.service.deployments_dir, PathBuf::from("deployments"));
    assert_eq!(config.service.metadata_url, None);
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.graph_options(), GraphOptions::mainnet());
}

/// What is tested: service and graph sections override defaults
/// Why: Operators point the tool at other services and tweak output
#[test]
fn test_config_parse_overrides() {
    let toml_str = r#"
network = "testnet"

[service]
metadata_url = "http://127.0.0.1:9999/metadata"
deployments_dir = "out/deployments"
request_timeout_secs = 5

[graph]
include_ownership = true

[[contract]]
eid = "arb-sepolia"
contract_name = "MyOFT"

[[contract]]
eid = 40245
address = "0x0000000000000000000000000000000000000002"
"#;

    let config: WireConfig = toml::from_str(toml_str).unwrap();
    config.validate().unwrap();

    assert_eq!(config.request_timeout(), Duration::from_secs(5));
    assert_eq!(config.metadata_url(Some("http://cli")), "http://cli");

    let options = config.graph_options();
    assert_eq!(options.environment, Environment::Testnet);
    assert!(options.include_ownership);
    assert!(!options.include_uln_config);
}

/// What is tested: unknown endpoints fail at parse time
/// Why: A typo in an eid must not silently drop a chain
#[test]
fn test_config_parse_unknown_endpoint() {
    let toml_str = r#"
network = "mainnet"

[[contract]]
eid = 12345
contract_name = "FRNTAdapter"
"#;

    assert!(toml::from_str::<WireConfig>(toml_str).is_err());
}

// ============================================================================
// VALIDATION TESTS
// ============================================================================

/// What is tested: validate() accepts a minimal config
/// Why: Baseline for the failure cases below
#[test]
fn test_validate_ok() {
    assert!(create_test_config().validate().is_ok());
}

/// What is tested: fewer than two contracts is rejected
/// Why: A mesh needs at least one connection
#[test]
fn test_validate_too_few_contracts() {
    let mut config = create_test_config();
    config.contracts.truncate(1);
    assert_invalid(&config, "At least two");
}

/// What is tested: contracts from the other environment are rejected
/// Why: Mainnet and testnet sets never mix
#[test]
fn test_validate_wrong_network() {
    let mut config = create_test_config();
    config.contracts.push(named(Chain::SepoliaTestnet, "FRNTAdapter"));
    assert_invalid(&config, "network is mainnet");
}

/// What is tested: duplicate endpoints are rejected
/// Why: Each endpoint carries a single contract
#[test]
fn test_validate_duplicate_endpoint() {
    let mut config = create_test_config();
    config.contracts.push(with_address(Chain::ArbitrumMainnet, DUMMY_CONTRACT_ADDR_EVM));
    assert_invalid(&config, "more than once");
}

/// What is tested: contract_name and address are mutually exclusive
/// Why: The driver must know which identifies the contract
#[test]
fn test_validate_name_and_address() {
    let mut config = create_test_config();
    config.contracts[0].address = Some(DUMMY_CONTRACT_ADDR_EVM.to_string());
    assert_invalid(&config, "both contract_name and address");
}

/// What is tested: EVM contracts need a name or address; Solana contracts reject names
/// Why: EVM deployments are resolved by name, Solana by OFT store
#[test]
fn test_validate_contract_identity_by_family() {
    let mut config = create_test_config();
    config.contracts.push(bare(Chain::EthereumMainnet));
    assert_invalid(&config, "needs a contract_name or an address");

    let mut config = create_test_config();
    config.contracts.push(named(Chain::SolanaMainnet, "FRNTAdapter"));
    assert_invalid(&config, "OFT store");

    let mut config = create_test_config();
    config.contracts[1] = named(Chain::BaseMainnet, "  ");
    assert_invalid(&config, "empty contract_name");
}

/// What is tested: explicit addresses are checked against the chain family
/// Why: Catch malformed addresses before generating the graph
#[test]
fn test_validate_address_format() {
    let mut config = create_test_config();
    config.contracts.push(with_address(Chain::SolanaMainnet, DUMMY_CONTRACT_ADDR_EVM));
    assert_invalid(&config, "Invalid address");

    let mut config = create_test_config();
    config.contracts.push(with_address(Chain::SolanaMainnet, DUMMY_SOLANA_KEY_1));
    assert!(config.validate().is_ok());
}

// ============================================================================
// CONTRACT RESOLUTION TESTS
// ============================================================================

/// What is tested: contract_points() reads the Solana OFT store from the deployment file
/// Why: Solana contracts are declared without an address
#[test]
fn test_contract_points_from_solana_deployment() {
    let dir = create_test_dir("config_solana_deployment");
    write_solana_deployment(
        &dir,
        Environment::Mainnet,
        json!({
            "programId": DUMMY_SOLANA_KEY_1,
            "mint": DUMMY_SOLANA_KEY_1,
            "escrow": DUMMY_SOLANA_KEY_1,
            "oftStore": DUMMY_SOLANA_KEY_2
        }),
    );

    let mut config = create_test_config();
    config.service.deployments_dir = dir.clone();
    config.contracts.push(bare(Chain::SolanaMainnet));
    config.validate().unwrap();

    let points = config.contract_points().unwrap();
    assert_eq!(
        points,
        vec![
            ContractPoint::named(Chain::ArbitrumMainnet, "FRNTAdapter"),
            ContractPoint::named(Chain::BaseMainnet, "FRNTAdapter"),
            ContractPoint::with_address(Chain::SolanaMainnet, DUMMY_SOLANA_KEY_2),
        ]
    );

    std::fs::remove_dir_all(&dir).unwrap();
}

/// What is tested: contract_points() fails when the deployment file is missing
/// Why: The Solana OFT store must be derived before wiring
#[test]
fn test_contract_points_missing_deployment() {
    let dir = create_test_dir("config_missing_deployment");

    let mut config = create_test_config();
    config.service.deployments_dir = dir.clone();
    config.contracts.push(bare(Chain::SolanaMainnet));

    let err = config.contract_points().unwrap_err();
    assert!(format!("{:#}", err).contains("Failed to read Solana deployment file"));

    std::fs::remove_dir_all(&dir).unwrap();
}

// ============================================================================
// FILE LOADING TESTS
// ============================================================================

/// What is tested: load_from_path() loads and validates a TOML file
/// Why: Ensure config can be loaded from an actual file
#[test]
fn test_config_load_from_file() {
    let dir = create_test_dir("config_load_from_file");
    let path = dir.join("wire.toml");

    let toml_content = r#"
network = "testnet"

[[contract]]
eid = "AMOY_V2_TESTNET"
contract_name = "FRNTAdapter"

[[contract]]
eid = "SEPOLIA_V2_TESTNET"
contract_name = "FRNTAdapter"
"#;
    std::fs::write(&path, toml_content).unwrap();

    let config = WireConfig::load_from_path(path.to_str()).unwrap();
    assert_eq!(config.network, Environment::Testnet);
    assert_eq!(config.contracts.len(), 2);

    std::fs::remove_dir_all(&dir).unwrap();
}

/// What is tested: load_from_path() rejects files that fail validation
/// Why: Invalid configs must not reach the generator
#[test]
fn test_config_load_invalid_file() {
    let dir = create_test_dir("config_load_invalid_file");
    let path = dir.join("wire.toml");

    let toml_content = r#"
network = "mainnet"

[[contract]]
eid = "AMOY_V2_TESTNET"
contract_name = "FRNTAdapter"

[[contract]]
eid = "SEPOLIA_V2_TESTNET"
contract_name = "FRNTAdapter"
"#;
    std::fs::write(&path, toml_content).unwrap();

    assert!(WireConfig::load_from_path(path.to_str()).is_err());

    std::fs::remove_dir_all(&dir).unwrap();
}

/// What is tested: load_from_path() returns a helpful error when the file doesn't exist
/// Why: Operators need to know to copy the template
#[test]
fn test_config_load_file_not_found() {
    let result = WireConfig::load_from_path(Some(".tmp/nonexistent/wire.toml"));
    let err = result.unwrap_err().to_string();
    assert!(err.contains("not found"));
    assert!(err.contains("wire.template.toml"));
}

/// What is tested: the shipped network configs parse and validate
/// Why: Keep the checked-in configs in sync with the chain list
#[test]
fn test_shipped_configs_parse() {
    for (file, network) in [
        ("config/wire_mainnet.toml", Environment::Mainnet),
        ("config/wire_testnet.toml", Environment::Testnet),
        ("config/wire.template.toml", Environment::Testnet),
    ] {
        let content = std::fs::read_to_string(file).unwrap();
        let config: WireConfig = toml::from_str(&content).unwrap();
        config.validate().unwrap();
        assert_eq!(config.network, network, "{}", file);
    }
}
