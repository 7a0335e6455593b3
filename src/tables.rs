//! Address and Constant Tables
//!
//! Static security parameters for the OFT deployment: which DVN operators
//! attest messages on each chain, what execution gas each destination
//! enforces, and which multisig owns the contract on each chain.
//!
//! These tables are edited in source and go through code review. There is no
//! runtime mutation; [`crate::policy::RoutePolicy::builtin`] builds them once
//! per process.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::chains::Chain;

// ============================================================================
// DVN REGISTRY
// ============================================================================

/// Named DVN operator group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DvnGroup {
    /// Regulated-custody operator
    Canary,
    /// Cloud operator
    GoogleCloud,
    /// Protocol labs operator
    LzLabs,
    /// State-run operator, mandatory on every route it serves
    Wyoming,
}

impl fmt::Display for DvnGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DvnGroup::Canary => "canary",
            DvnGroup::GoogleCloud => "google-cloud",
            DvnGroup::LzLabs => "lz-labs",
            DvnGroup::Wyoming => "wyoming",
        };
        write!(f, "{}", name)
    }
}

/// Ordered list of DVN groups, each a partial map from chain to address.
///
/// A chain missing from a group means that operator does not run there.
#[derive(Debug, Clone, Default)]
pub struct DvnRegistry {
    groups: Vec<(DvnGroup, BTreeMap<Chain, String>)>,
}

impl DvnRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds (or replaces) a group's address map, keeping first-insertion order.
    pub fn with_group<I, S>(mut self, group: DvnGroup, addresses: I) -> Self
    where
        I: IntoIterator<Item = (Chain, S)>,
        S: Into<String>,
    {
        let map = addresses
            .into_iter()
            .map(|(chain, addr)| (chain, addr.into()))
            .collect();

        match self.groups.iter_mut().find(|(g, _)| *g == group) {
            Some(slot) => slot.1 = map,
            None => self.groups.push((group, map)),
        }
        self
    }

    /// Address of `group`'s DVN on `chain`, if the group operates there.
    pub fn address(&self, group: DvnGroup, chain: Chain) -> Option<&str> {
        self.groups
            .iter()
            .find(|(g, _)| *g == group)
            .and_then(|(_, map)| map.get(&chain))
            .map(String::as_str)
    }

    pub fn groups(&self) -> impl Iterator<Item = DvnGroup> + '_ {
        self.groups.iter().map(|(g, _)| *g)
    }

    /// Every (group, chain, address) entry, in group order then chain order.
    pub fn entries(&self) -> impl Iterator<Item = (DvnGroup, Chain, &str)> + '_ {
        self.groups
            .iter()
            .flat_map(|(g, map)| map.iter().map(move |(c, a)| (*g, *c, a.as_str())))
    }
}

// ============================================================================
// ENFORCED OPTIONS
// ============================================================================

/// Executor option kinds. Serialized as their protocol number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum ExecutorOptionType {
    LzReceive,
    NativeDrop,
    Compose,
    Ordered,
}

impl From<ExecutorOptionType> for u8 {
    fn from(value: ExecutorOptionType) -> Self {
        match value {
            ExecutorOptionType::LzReceive => 1,
            ExecutorOptionType::NativeDrop => 2,
            ExecutorOptionType::Compose => 3,
            ExecutorOptionType::Ordered => 4,
        }
    }
}

impl TryFrom<u8> for ExecutorOptionType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(ExecutorOptionType::LzReceive),
            2 => Ok(ExecutorOptionType::NativeDrop),
            3 => Ok(ExecutorOptionType::Compose),
            4 => Ok(ExecutorOptionType::Ordered),
            other => Err(format!("unknown executor option type {}", other)),
        }
    }
}

/// Execution requirement a destination enforces for one inbound message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnforcedOption {
    pub msg_type: u16,
    pub option_type: ExecutorOptionType,
    pub gas: u64,
    pub value: u64,
}

impl EnforcedOption {
    /// `lzReceive` option for message type 1 (plain send).
    pub const fn lz_receive(gas: u64, value: u64) -> Self {
        Self {
            msg_type: 1,
            option_type: ExecutorOptionType::LzReceive,
            gas,
            value,
        }
    }
}

/// Option applied to destinations without a configured override.
pub const DEFAULT_ENFORCED_OPTION: EnforcedOption = EnforcedOption::lz_receive(80_000, 0);

/// Destination chain -> ordered enforced options.
#[derive(Debug, Clone, Default)]
pub struct EnforcedOptionTable {
    entries: BTreeMap<Chain, Vec<EnforcedOption>>,
}

impl EnforcedOptionTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, chain: Chain, options: Vec<EnforcedOption>) -> Self {
        self.entries.insert(chain, options);
        self
    }

    pub fn get(&self, chain: Chain) -> Option<&[EnforcedOption]> {
        self.entries.get(&chain).map(Vec::as_slice)
    }
}

// ============================================================================
// MULTISIGS
// ============================================================================

/// Chain -> administrative multisig (owner and delegate).
#[derive(Debug, Clone, Default)]
pub struct MultisigTable {
    entries: BTreeMap<Chain, String>,
}

impl MultisigTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, chain: Chain, address: impl Into<String>) -> Self {
        self.entries.insert(chain, address.into());
        self
    }

    pub fn get(&self, chain: Chain) -> Option<&str> {
        self.entries.get(&chain).map(String::as_str)
    }
}

// ============================================================================
// BUILT-IN VALUES
// ============================================================================

/// Production DVN addresses.
pub fn builtin_dvns() -> DvnRegistry {
    use Chain::*;

    DvnRegistry::new()
        .with_group(
            DvnGroup::Canary,
            [
                (ArbitrumMainnet, "0xf2e380c90e6c09721297526dbc74f870e114dfcb"),
                (AvalancheMainnet, "0xcc49e6fca014c77e1eb604351cc1e08c84511760"),
                (BaseMainnet, "0x554833698ae0fb22ecc90b01222903fd62ca4b47"),
                (EthereumMainnet, "0xa4fe5a5b9a846458a70cd0748228aed3bf65c2cd"),
                (OptimismMainnet, "0x5b6735c66d97479ccd18294fc96b3084ecb2fa3f"),
                (PolygonMainnet, "0x13feb7234ff60a97af04477d6421415766753ba3"),
                (SolanaMainnet, "7jMeX5mzXnSSKYd8DxBDP4xMnkNFZZZm5W28FWUTbwU3"),
                (HederaMainnet, "0x4b92bc2a7d681bf5230472c80d92acfe9a6b9435"),
            ],
        )
        .with_group(
            DvnGroup::GoogleCloud,
            [
                (ArbitrumMainnet, "0xd56e4eab23cb81f43168f9f45211eb027b9ac7cc"),
                (AvalancheMainnet, "0xd56e4eab23cb81f43168f9f45211eb027b9ac7cc"),
                (BaseMainnet, "0xd56e4eab23cb81f43168f9f45211eb027b9ac7cc"),
                (EthereumMainnet, "0xd56e4eab23cb81f43168f9f45211eb027b9ac7cc"),
                (OptimismMainnet, "0xd56e4eab23cb81f43168f9f45211eb027b9ac7cc"),
                (PolygonMainnet, "0xd56e4eab23cb81f43168f9f45211eb027b9ac7cc"),
                (SolanaMainnet, "F7gu9kLcpn4bSTZn183mhn2RXUuMy7zckdxJZdUjuALw"),
            ],
        )
        .with_group(
            DvnGroup::LzLabs,
            [
                (ArbitrumMainnet, "0x2f55c492897526677c5b68fb199ea31e2c126416"),
                (AvalancheMainnet, "0x962f502a63f5fbeb44dc9ab932122648e8352959"),
                (BaseMainnet, "0x9e059a54699a285714207b43b055483e78faac25"),
                (EthereumMainnet, "0x589dedbd617e0cbcb916a9223f4d1300c294236b"),
                (OptimismMainnet, "0x6a02d83e8d433304bba74ef1c427913958187142"),
                (PolygonMainnet, "0x23de2fe932d9043291f870324b74f820e11dc81a"),
                (SolanaMainnet, "4VDjp6XQaxoZf5RGwiPU9NR1EXSZn2TP4ATMmiSzLfhb"),
                (HederaMainnet, "0xce8358bc28dd8296ce8caf1cd2b44787abd65887"),
            ],
        )
        .with_group(
            DvnGroup::Wyoming,
            [
                (ArbitrumMainnet, "0xcb1b1d524d013a32e976a5963bd541c388ec0517"),
                (AvalancheMainnet, "0xda4428ff0f15b9d92c39ae08c4fc2f1216662c2f"),
                (BaseMainnet, "0xf80285efb7518d5c79f4e98e3baa59da5ee79621"),
                (EthereumMainnet, "0x6c70db9ce65fa37499c1f1a150a6440fc9c7273a"),
                (OptimismMainnet, "0x94ec5934daa761d7597b76fd0fecf8385de143be"),
                (PolygonMainnet, "0xf6cb110b0334825797b9b733060229c68e5d8bef"),
                (SolanaMainnet, "6bdMfqghzhFpMsbrfy6qiyXnGkYGcamn3WYxeKx8Muik"),
                (HederaMainnet, "0x5c58c83736ebba703afe5784efd95f02ca30d3d3"),
            ],
        )
}

/// Production enforced options per destination.
pub fn builtin_enforced_options() -> EnforcedOptionTable {
    use Chain::*;

    let testnet_evm = EnforcedOption::lz_receive(120_000, 0);
    let mainnet_evm = EnforcedOption::lz_receive(100_000, 0);

    let mut table = EnforcedOptionTable::new();
    for chain in [
        AmoyTestnet,
        ArbitrumSepoliaTestnet,
        AvalancheTestnet,
        BaseSepoliaTestnet,
        OptimismSepoliaTestnet,
        SepoliaTestnet,
        HederaTestnet,
    ] {
        table = table.with(chain, vec![testnet_evm]);
    }
    for chain in [
        ArbitrumMainnet,
        AvalancheMainnet,
        BaseMainnet,
        EthereumMainnet,
        OptimismMainnet,
        PolygonMainnet,
        HederaMainnet,
    ] {
        table = table.with(chain, vec![mainnet_evm]);
    }

    // Solana receives need rent for the recipient token account
    table
        .with(SolanaTestnet, vec![EnforcedOption::lz_receive(250_000, 2_539_280)])
        .with(SolanaMainnet, vec![EnforcedOption::lz_receive(143_000, 2_442_960)])
}

/// Production owner/delegate multisigs.
pub fn builtin_multisigs() -> MultisigTable {
    use Chain::*;

    const EVM_MAINNET_SAFE: &str = "0xdA769654D7c66375420ed67135A711521C3bB296";
    const EVM_TESTNET_SAFE: &str = "0x8cE5b7298707F672ae8C1e8eba69Fe4f840Ee0eC";

    let mut table = MultisigTable::new();
    for chain in [
        ArbitrumMainnet,
        AvalancheMainnet,
        BaseMainnet,
        EthereumMainnet,
        OptimismMainnet,
        PolygonMainnet,
        HederaMainnet,
    ] {
        table = table.with(chain, EVM_MAINNET_SAFE);
    }
    for chain in [
        AmoyTestnet,
        ArbitrumSepoliaTestnet,
        AvalancheTestnet,
        BaseSepoliaTestnet,
        OptimismSepoliaTestnet,
        SepoliaTestnet,
        HederaTestnet,
    ] {
        table = table.with(chain, EVM_TESTNET_SAFE);
    }

    table
        .with(SolanaMainnet, "3FL7iZaerXVygpPAFtXyxoCGdoUt11eiSBYkko6mMD8x")
        .with(SolanaTestnet, "4gN2LgUyrxqjChDP3mDFbKNyDrZsPYS81NHQ4yhd9MHe")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::validate_address;

    #[test]
    fn builtin_dvn_addresses_match_chain_family() {
        for (group, chain, address) in builtin_dvns().entries() {
            assert!(
                validate_address(chain.family(), address).is_ok(),
                "{} DVN on {} has malformed address {}",
                group,
                chain,
                address
            );
        }
    }

    #[test]
    fn registry_replaces_group_in_place() {
        let registry = DvnRegistry::new()
            .with_group(DvnGroup::LzLabs, [(Chain::BaseMainnet, "0x01")])
            .with_group(DvnGroup::Wyoming, [(Chain::BaseMainnet, "0x02")])
            .with_group(DvnGroup::LzLabs, [(Chain::BaseMainnet, "0x03")]);

        assert_eq!(registry.groups().collect::<Vec<_>>(), vec![DvnGroup::LzLabs, DvnGroup::Wyoming]);
        assert_eq!(registry.address(DvnGroup::LzLabs, Chain::BaseMainnet), Some("0x03"));
    }

    #[test]
    fn option_type_serializes_as_number() {
        let json = serde_json::to_value(DEFAULT_ENFORCED_OPTION).unwrap();
        assert_eq!(json, serde_json::json!({"msgType": 1, "optionType": 1, "gas": 80000, "value": 0}));
    }
}
