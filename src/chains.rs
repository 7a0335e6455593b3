//! Chain Identifier Module
//!
//! Closed enumeration of every endpoint the OFT is deployed on. Each variant
//! carries its numeric endpoint id (eid), the chain family it belongs to, the
//! environment (mainnet/testnet) and the network settings used to reach it.
//!
//! The chain family is fixed per variant, so code that needs to branch on
//! address kind (plain address vs. program-derived key) matches on
//! [`ChainFamily`] instead of inspecting chain-key strings.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// CHAIN FAMILY AND ENVIRONMENT
// ============================================================================

/// Address model of a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainFamily {
    /// 20-byte `0x` hex addresses, contracts resolved by name at wiring time
    Evm,
    /// 32-byte base58 keys, OFT store derived ahead of time
    Solana,
}

impl fmt::Display for ChainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChainFamily::Evm => write!(f, "evm"),
            ChainFamily::Solana => write!(f, "solana"),
        }
    }
}

/// Deployment environment. Mainnet and testnet contract sets never mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Mainnet,
    Testnet,
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Mainnet => write!(f, "mainnet"),
            Environment::Testnet => write!(f, "testnet"),
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Environment::Mainnet),
            "testnet" => Ok(Environment::Testnet),
            other => anyhow::bail!("Unknown network '{}' (expected mainnet or testnet)", other),
        }
    }
}

/// Connection settings for a chain's RPC endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkInfo {
    /// Network name used by deployment tooling (e.g. "arbitrum", "arb-sepolia")
    pub name: &'static str,
    /// EVM chain id (None for Solana)
    pub evm_chain_id: Option<u64>,
    /// Environment variable that overrides the RPC URL
    pub rpc_env: &'static str,
    /// Public RPC URL used when the override is not set
    pub default_rpc_url: &'static str,
}

// ============================================================================
// CHAIN ENUMERATION
// ============================================================================

/// A messaging-protocol endpoint, keyed by its endpoint id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Chain {
    // Mainnet
    EthereumMainnet,
    AvalancheMainnet,
    PolygonMainnet,
    ArbitrumMainnet,
    OptimismMainnet,
    SolanaMainnet,
    BaseMainnet,
    HederaMainnet,
    // Testnet
    AvalancheTestnet,
    SepoliaTestnet,
    SolanaTestnet,
    ArbitrumSepoliaTestnet,
    OptimismSepoliaTestnet,
    BaseSepoliaTestnet,
    AmoyTestnet,
    HederaTestnet,
}

impl Chain {
    /// Every known chain, mainnet first, in ascending eid order per environment.
    pub const ALL: [Chain; 16] = [
        Chain::EthereumMainnet,
        Chain::AvalancheMainnet,
        Chain::PolygonMainnet,
        Chain::ArbitrumMainnet,
        Chain::OptimismMainnet,
        Chain::SolanaMainnet,
        Chain::BaseMainnet,
        Chain::HederaMainnet,
        Chain::AvalancheTestnet,
        Chain::SepoliaTestnet,
        Chain::SolanaTestnet,
        Chain::ArbitrumSepoliaTestnet,
        Chain::OptimismSepoliaTestnet,
        Chain::BaseSepoliaTestnet,
        Chain::AmoyTestnet,
        Chain::HederaTestnet,
    ];

    /// Numeric endpoint id.
    pub fn eid(self) -> u32 {
        match self {
            Chain::EthereumMainnet => 30101,
            Chain::AvalancheMainnet => 30106,
            Chain::PolygonMainnet => 30109,
            Chain::ArbitrumMainnet => 30110,
            Chain::OptimismMainnet => 30111,
            Chain::SolanaMainnet => 30168,
            Chain::BaseMainnet => 30184,
            Chain::HederaMainnet => 30316,
            Chain::AvalancheTestnet => 40106,
            Chain::SepoliaTestnet => 40161,
            Chain::SolanaTestnet => 40168,
            Chain::ArbitrumSepoliaTestnet => 40231,
            Chain::OptimismSepoliaTestnet => 40232,
            Chain::BaseSepoliaTestnet => 40245,
            Chain::AmoyTestnet => 40267,
            Chain::HederaTestnet => 40285,
        }
    }

    /// Symbolic endpoint name as used by the messaging protocol's tooling.
    pub fn symbol(self) -> &'static str {
        match self {
            Chain::EthereumMainnet => "ETHEREUM_V2_MAINNET",
            Chain::AvalancheMainnet => "AVALANCHE_V2_MAINNET",
            Chain::PolygonMainnet => "POLYGON_V2_MAINNET",
            Chain::ArbitrumMainnet => "ARBITRUM_V2_MAINNET",
            Chain::OptimismMainnet => "OPTIMISM_V2_MAINNET",
            Chain::SolanaMainnet => "SOLANA_V2_MAINNET",
            Chain::BaseMainnet => "BASE_V2_MAINNET",
            Chain::HederaMainnet => "HEDERA_V2_MAINNET",
            Chain::AvalancheTestnet => "AVALANCHE_V2_TESTNET",
            Chain::SepoliaTestnet => "SEPOLIA_V2_TESTNET",
            Chain::SolanaTestnet => "SOLANA_V2_TESTNET",
            Chain::ArbitrumSepoliaTestnet => "ARBSEP_V2_TESTNET",
            Chain::OptimismSepoliaTestnet => "OPTSEP_V2_TESTNET",
            Chain::BaseSepoliaTestnet => "BASESEP_V2_TESTNET",
            Chain::AmoyTestnet => "AMOY_V2_TESTNET",
            Chain::HederaTestnet => "HEDERA_V2_TESTNET",
        }
    }

    /// Chain key used by the metadata service.
    pub fn chain_key(self) -> &'static str {
        match self {
            Chain::EthereumMainnet => "ethereum",
            Chain::AvalancheMainnet => "avalanche",
            Chain::PolygonMainnet => "polygon",
            Chain::ArbitrumMainnet => "arbitrum",
            Chain::OptimismMainnet => "optimism",
            Chain::SolanaMainnet => "solana",
            Chain::BaseMainnet => "base",
            Chain::HederaMainnet => "hedera",
            Chain::AvalancheTestnet => "avalanche-testnet",
            Chain::SepoliaTestnet => "sepolia",
            Chain::SolanaTestnet => "solana-testnet",
            Chain::ArbitrumSepoliaTestnet => "arbitrum-sepolia",
            Chain::OptimismSepoliaTestnet => "optimism-sepolia",
            Chain::BaseSepoliaTestnet => "base-sepolia",
            Chain::AmoyTestnet => "amoy-testnet",
            Chain::HederaTestnet => "hedera-testnet",
        }
    }

    pub fn family(self) -> ChainFamily {
        match self {
            Chain::SolanaMainnet | Chain::SolanaTestnet => ChainFamily::Solana,
            _ => ChainFamily::Evm,
        }
    }

    pub fn environment(self) -> Environment {
        if self.eid() < 40000 {
            Environment::Mainnet
        } else {
            Environment::Testnet
        }
    }

    pub fn network(self) -> NetworkInfo {
        let (name, evm_chain_id, rpc_env, default_rpc_url) = match self {
            Chain::EthereumMainnet => (
                "ethereum",
                Some(1),
                "RPC_URL_ETHEREUM_MAINNET",
                "https://ethereum-rpc.publicnode.com",
            ),
            Chain::AvalancheMainnet => (
                "avalanche",
                Some(43114),
                "RPC_URL_AVALANCHE_MAINNET",
                "https://api.avax.network/ext/bc/C/rpc",
            ),
            Chain::PolygonMainnet => (
                "polygon",
                Some(137),
                "RPC_URL_POLYGON_MAINNET",
                "https://polygon-rpc.com",
            ),
            Chain::ArbitrumMainnet => (
                "arbitrum",
                Some(42161),
                "RPC_URL_ARBITRUM_MAINNET",
                "https://arb1.arbitrum.io/rpc",
            ),
            Chain::OptimismMainnet => (
                "optimism",
                Some(10),
                "RPC_URL_OPTIMISM_MAINNET",
                "https://mainnet.optimism.io",
            ),
            Chain::SolanaMainnet => (
                "solana",
                None,
                "RPC_URL_SOLANA",
                "https://api.mainnet-beta.solana.com",
            ),
            Chain::BaseMainnet => (
                "base",
                Some(8453),
                "RPC_URL_BASE_MAINNET",
                "https://mainnet.base.org",
            ),
            Chain::HederaMainnet => (
                "hedera",
                Some(295),
                "RPC_URL_HEDERA_MAINNET",
                "https://mainnet.hashio.io/api",
            ),
            Chain::AvalancheTestnet => (
                "avalanche-fuji",
                Some(43113),
                "RPC_URL_AVALANCHE_FUJI_TESTNET",
                "https://api.avax-test.network/ext/bc/C/rpc",
            ),
            Chain::SepoliaTestnet => (
                "eth-sepolia",
                Some(11155111),
                "RPC_URL_ETHSEP_TESTNET",
                "https://ethereum-sepolia-rpc.publicnode.com",
            ),
            Chain::SolanaTestnet => (
                "solana-testnet",
                None,
                "RPC_URL_SOLANA_TESTNET",
                "https://api.devnet.solana.com",
            ),
            Chain::ArbitrumSepoliaTestnet => (
                "arb-sepolia",
                Some(421614),
                "RPC_URL_ARBSEP_TESTNET",
                "https://sepolia-rollup.arbitrum.io/rpc",
            ),
            Chain::OptimismSepoliaTestnet => (
                "opt-sepolia",
                Some(11155420),
                "RPC_URL_OPTSEP_TESTNET",
                "https://sepolia.optimism.io",
            ),
            Chain::BaseSepoliaTestnet => (
                "base-sepolia",
                Some(84532),
                "RPC_URL_BASESEP_TESTNET",
                "https://base-sepolia.api.onfinality.io/public",
            ),
            Chain::AmoyTestnet => (
                "polygon-amoy",
                Some(80002),
                "RPC_URL_POLYGON_AMOY_TESTNET",
                "https://rpc-amoy.polygon.technology/",
            ),
            Chain::HederaTestnet => (
                "hedera-testnet",
                Some(296),
                "RPC_URL_HEDERA_TESTNET",
                "https://testnet.hashio.io/api",
            ),
        };

        NetworkInfo {
            name,
            evm_chain_id,
            rpc_env,
            default_rpc_url,
        }
    }

    /// RPC URL for this chain: the network's env var if set and non-empty,
    /// otherwise the public default.
    pub fn rpc_url(self) -> String {
        let network = self.network();
        std::env::var(network.rpc_env)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| network.default_rpc_url.to_string())
    }

    /// Looks up a chain by numeric endpoint id.
    pub fn from_eid(eid: u32) -> Option<Chain> {
        Chain::ALL.iter().copied().find(|chain| chain.eid() == eid)
    }

    /// All chains of one environment, in [`Chain::ALL`] order.
    pub fn in_environment(environment: Environment) -> impl Iterator<Item = Chain> {
        Chain::ALL
            .into_iter()
            .filter(move |chain| chain.environment() == environment)
    }
}

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.symbol(), self.eid())
    }
}

impl FromStr for Chain {
    type Err = anyhow::Error;

    /// Accepts a decimal eid, the symbolic name (`ARBITRUM_V2_MAINNET`, any
    /// case) or the network name (`arbitrum`, `arb-sepolia`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Ok(eid) = trimmed.parse::<u32>() {
            return Chain::from_eid(eid)
                .ok_or_else(|| anyhow::anyhow!("Unknown endpoint id {}", eid));
        }

        Chain::ALL
            .iter()
            .copied()
            .find(|chain| {
                chain.symbol().eq_ignore_ascii_case(trimmed)
                    || chain.network().name.eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| anyhow::anyhow!("Unknown chain '{}'", trimmed))
    }
}

impl Serialize for Chain {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.eid())
    }
}

impl<'de> Deserialize<'de> for Chain {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Eid(u32),
            Name(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Eid(eid) => Chain::from_eid(eid)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown endpoint id {}", eid))),
            Repr::Name(name) => name.parse().map_err(serde::de::Error::custom),
        }
    }
}
