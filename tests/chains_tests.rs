//! Unit tests for the chain enumeration

use oft_wire::chains::{Chain, ChainFamily, Environment};
use std::collections::HashSet;

/// What is tested: every chain has a unique eid and round-trips through from_eid()
/// Why: The eid is the key into every table
#[test]
fn test_eids_unique_and_reversible() {
    let mut seen = HashSet::new();
    for chain in Chain::ALL {
        assert!(seen.insert(chain.eid()), "duplicate eid {}", chain.eid());
        assert_eq!(Chain::from_eid(chain.eid()), Some(chain));
    }
    assert_eq!(Chain::from_eid(1), None);
}

/// What is tested: known endpoint ids map to the expected chains
/// Why: Endpoint ids are fixed by the messaging protocol
#[test]
fn test_known_eids() {
    assert_eq!(Chain::EthereumMainnet.eid(), 30101);
    assert_eq!(Chain::SolanaMainnet.eid(), 30168);
    assert_eq!(Chain::HederaMainnet.eid(), 30316);
    assert_eq!(Chain::SolanaTestnet.eid(), 40168);
    assert_eq!(Chain::ArbitrumSepoliaTestnet.eid(), 40231);
    assert_eq!(Chain::HederaTestnet.eid(), 40285);
}

/// What is tested: environment and family are derived per variant
/// Why: Address handling branches on family, graph validation on environment
#[test]
fn test_environment_and_family() {
    assert_eq!(Chain::in_environment(Environment::Mainnet).count(), 8);
    assert_eq!(Chain::in_environment(Environment::Testnet).count(), 8);

    for chain in Chain::ALL {
        let expected = if chain.eid() < 40000 {
            Environment::Mainnet
        } else {
            Environment::Testnet
        };
        assert_eq!(chain.environment(), expected);
    }

    assert_eq!(Chain::SolanaMainnet.family(), ChainFamily::Solana);
    assert_eq!(Chain::SolanaTestnet.family(), ChainFamily::Solana);
    assert_eq!(Chain::HederaMainnet.family(), ChainFamily::Evm);
    assert!(Chain::SolanaMainnet.network().evm_chain_id.is_none());
    assert_eq!(Chain::BaseMainnet.network().evm_chain_id, Some(8453));
}

/// What is tested: FromStr accepts eid, symbolic name and network name
/// Why: Config files and CLI flags use all three forms
#[test]
fn test_chain_from_str() {
    assert_eq!("30110".parse::<Chain>().unwrap(), Chain::ArbitrumMainnet);
    assert_eq!("ARBITRUM_V2_MAINNET".parse::<Chain>().unwrap(), Chain::ArbitrumMainnet);
    assert_eq!("arbsep_v2_testnet".parse::<Chain>().unwrap(), Chain::ArbitrumSepoliaTestnet);
    assert_eq!("arb-sepolia".parse::<Chain>().unwrap(), Chain::ArbitrumSepoliaTestnet);
    assert_eq!(" solana ".parse::<Chain>().unwrap(), Chain::SolanaMainnet);

    let err = "moonbeam".parse::<Chain>().unwrap_err();
    assert!(err.to_string().contains("moonbeam"));
    assert!("99999".parse::<Chain>().is_err());
}

/// What is tested: chains serialize as eid and deserialize from eid or name
/// Why: The driver expects numeric eids; config files may use names
#[test]
fn test_chain_serde() {
    assert_eq!(serde_json::to_value(Chain::BaseMainnet).unwrap(), serde_json::json!(30184));
    assert_eq!(serde_json::from_value::<Chain>(serde_json::json!(30184)).unwrap(), Chain::BaseMainnet);
    assert_eq!(
        serde_json::from_value::<Chain>(serde_json::json!("BASE_V2_MAINNET")).unwrap(),
        Chain::BaseMainnet
    );
    assert!(serde_json::from_value::<Chain>(serde_json::json!(7)).is_err());
}

/// What is tested: Display shows symbol and eid
/// Why: Error messages must name the endpoint unambiguously
#[test]
fn test_chain_display() {
    assert_eq!(Chain::HederaMainnet.to_string(), "HEDERA_V2_MAINNET (30316)");
    assert_eq!(Environment::Testnet.to_string(), "testnet");
    assert_eq!("MAINNET".parse::<Environment>().unwrap(), Environment::Mainnet);
    assert!("devnet".parse::<Environment>().is_err());
}

/// What is tested: rpc_url() falls back to the public default
/// Why: RPC overrides are optional
#[test]
fn test_rpc_url_fallback() {
    let chain = Chain::PolygonMainnet;
    std::env::remove_var(chain.network().rpc_env);
    assert_eq!(chain.rpc_url(), chain.network().default_rpc_url);

    std::env::set_var(chain.network().rpc_env, "http://127.0.0.1:8545");
    assert_eq!(chain.rpc_url(), "http://127.0.0.1:8545");
    std::env::remove_var(chain.network().rpc_env);
}
