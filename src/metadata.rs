//! Metadata Resolver Module
//!
//! Fetches the messaging protocol's public metadata document and resolves the
//! per-chain protocol contracts an OFT is wired against: the send library
//! (`sendUln302`), the receive library (`receiveUln302`) and the executor.
//!
//! Every accessor fails with an error naming the missing level (endpoint,
//! contract entry, address) instead of returning an empty value.
//!
//! The document is decoded leniently: entries, deployments and DVN records
//! that do not have the expected shape are skipped, so one malformed chain
//! never hides the others.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

use crate::chains::{Chain, ChainFamily};

/// Public metadata endpoint.
pub const DEFAULT_METADATA_URL: &str = "https://metadata.layerzero-api.com/v1/metadata";

/// Environment variable overriding [`DEFAULT_METADATA_URL`].
pub const METADATA_URL_ENV: &str = "LZ_METADATA_URL";

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Can't find endpoint with eid: \"{eid}\" in metadata")]
    EndpointNotFound { eid: u32 },

    #[error("Metadata deployment for {chain} has no {field} entry")]
    MissingContract { chain: Chain, field: &'static str },

    #[error("Metadata deployment for {chain} has an empty {field} address")]
    EmptyAddress { chain: Chain, field: &'static str },

    #[error("Metadata executor for {chain} has no {kind} ({family} chains resolve the executor by {kind})")]
    MissingExecutorKind {
        chain: Chain,
        family: ChainFamily,
        kind: &'static str,
    },

    #[error(transparent)]
    Transport(#[from] reqwest::Error),
}

// ============================================================================
// DOCUMENT STRUCTURES
// ============================================================================

/// Contract entry carrying a plain address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddressEntry {
    #[serde(default)]
    pub address: Option<String>,
}

/// Executor entry. Solana executors are addressed by their PDA.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutorEntry {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub pda: Option<String>,
}

/// One protocol deployment on one endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDeployment {
    /// Endpoint id as a decimal string
    pub eid: String,
    #[serde(default)]
    pub chain_key: Option<String>,
    #[serde(default)]
    pub send_uln302: Option<AddressEntry>,
    #[serde(default)]
    pub receive_uln302: Option<AddressEntry>,
    #[serde(default)]
    pub executor: Option<ExecutorEntry>,
}

/// DVN description published alongside a chain's deployments.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DvnMetadata {
    #[serde(default)]
    pub version: Option<u32>,
    #[serde(default)]
    pub canonical_name: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default)]
    pub lz_read_compatible: bool,
}

/// Top-level entry (one per chain key).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataEntry {
    #[serde(default, deserialize_with = "lenient_deployments")]
    pub deployments: Option<Vec<MetadataDeployment>>,
    #[serde(default, deserialize_with = "lenient_dvns")]
    pub dvns: Option<BTreeMap<String, DvnMetadata>>,
}

/// Whole metadata document: arbitrary keys to entries, scanned in key order.
///
/// Top-level values that are not entry objects are dropped on decode.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct MetadataDocument {
    pub entries: BTreeMap<String, MetadataEntry>,
}

impl<'de> Deserialize<'de> for MetadataDocument {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = BTreeMap::<String, Value>::deserialize(deserializer)?;
        let entries = raw
            .into_iter()
            .filter_map(|(key, value)| decode_or_skip(value, &key).map(|entry| (key, entry)))
            .collect();
        Ok(Self { entries })
    }
}

fn decode_or_skip<T: DeserializeOwned>(value: Value, what: &str) -> Option<T> {
    match serde_json::from_value(value) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            debug!("Skipping malformed metadata record '{}': {}", what, e);
            None
        }
    }
}

fn lenient_deployments<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<Vec<MetadataDeployment>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(|item| decode_or_skip(item, "deployment"))
                .collect(),
        ),
        _ => None,
    })
}

fn lenient_dvns<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<BTreeMap<String, DvnMetadata>>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(records) => Some(
            records
                .into_iter()
                .filter_map(|(address, record)| decode_or_skip(record, &address).map(|info| (address, info)))
                .collect(),
        ),
        _ => None,
    })
}

/// Resolved executor, tagged by the address kind used.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutorAddress {
    Contract(String),
    Pda(String),
}

impl ExecutorAddress {
    pub fn as_str(&self) -> &str {
        match self {
            ExecutorAddress::Contract(addr) | ExecutorAddress::Pda(addr) => addr,
        }
    }
}

// ============================================================================
// LOOKUPS
// ============================================================================

impl MetadataDocument {
    /// Entry and deployment matching `chain`'s eid (compared as a string).
    fn locate(&self, chain: Chain) -> Option<(&MetadataEntry, &MetadataDeployment)> {
        let eid = chain.eid().to_string();
        self.entries.values().find_map(|entry| {
            entry
                .deployments
                .as_deref()
                .unwrap_or_default()
                .iter()
                .find(|deployment| deployment.eid == eid)
                .map(|deployment| (entry, deployment))
        })
    }

    /// First deployment whose eid equals `chain`'s.
    pub fn find_deployment(&self, chain: Chain) -> Result<&MetadataDeployment, MetadataError> {
        self.locate(chain)
            .map(|(_, deployment)| deployment)
            .ok_or(MetadataError::EndpointNotFound { eid: chain.eid() })
    }

    /// Send message library (`sendUln302`) address on `chain`.
    pub fn send_library(&self, chain: Chain) -> Result<&str, MetadataError> {
        let deployment = self.find_deployment(chain)?;
        let entry = deployment
            .send_uln302
            .as_ref()
            .ok_or(MetadataError::MissingContract { chain, field: "sendUln302" })?;
        non_empty(entry.address.as_deref(), chain, "sendUln302")
    }

    /// Receive message library (`receiveUln302`) address on `chain`.
    pub fn receive_library(&self, chain: Chain) -> Result<&str, MetadataError> {
        let deployment = self.find_deployment(chain)?;
        let entry = deployment
            .receive_uln302
            .as_ref()
            .ok_or(MetadataError::MissingContract { chain, field: "receiveUln302" })?;
        non_empty(entry.address.as_deref(), chain, "receiveUln302")
    }

    /// Executor on `chain`: the contract address on EVM chains, the PDA on Solana.
    pub fn executor(&self, chain: Chain) -> Result<ExecutorAddress, MetadataError> {
        let deployment = self.find_deployment(chain)?;
        let executor = deployment
            .executor
            .as_ref()
            .ok_or(MetadataError::MissingContract { chain, field: "executor" })?;

        let family = chain.family();
        match family {
            ChainFamily::Evm => {
                let address = executor.address.as_deref().ok_or(MetadataError::MissingExecutorKind {
                    chain,
                    family,
                    kind: "address",
                })?;
                non_empty(Some(address), chain, "executor.address")
                    .map(|addr| ExecutorAddress::Contract(addr.to_string()))
            }
            ChainFamily::Solana => {
                let pda = executor.pda.as_deref().ok_or(MetadataError::MissingExecutorKind {
                    chain,
                    family,
                    kind: "pda",
                })?;
                non_empty(Some(pda), chain, "executor.pda").map(|addr| ExecutorAddress::Pda(addr.to_string()))
            }
        }
    }

    /// DVN description for `address`, looked up in the entry that hosts
    /// `chain`'s deployment. Address match is case-insensitive.
    pub fn dvn_info(&self, chain: Chain, address: &str) -> Option<&DvnMetadata> {
        let (entry, _) = self.locate(chain)?;
        entry
            .dvns
            .as_ref()?
            .iter()
            .find(|(addr, _)| addr.eq_ignore_ascii_case(address))
            .map(|(_, info)| info)
    }
}

fn non_empty<'a>(
    address: Option<&'a str>,
    chain: Chain,
    field: &'static str,
) -> Result<&'a str, MetadataError> {
    match address {
        Some(addr) if !addr.trim().is_empty() => Ok(addr),
        _ => Err(MetadataError::EmptyAddress { chain, field }),
    }
}

// ============================================================================
// CLIENT
// ============================================================================

/// Metadata URL: `explicit` (CLI), then `LZ_METADATA_URL`, then `configured`
/// (config file), then the public default.
pub fn resolve_metadata_url(explicit: Option<&str>, configured: Option<&str>) -> String {
    explicit
        .map(str::to_string)
        .or_else(|| std::env::var(METADATA_URL_ENV).ok().filter(|url| !url.trim().is_empty()))
        .or_else(|| configured.map(str::to_string))
        .unwrap_or_else(|| DEFAULT_METADATA_URL.to_string())
}

/// HTTP client for the metadata service.
///
/// Each [`MetadataClient::fetch`] performs one GET. Callers that need several
/// lookups should fetch once and reuse the document.
pub struct MetadataClient {
    client: Client,
    url: String,
}

impl MetadataClient {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, MetadataError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Retrieves and parses the metadata document. HTTP error statuses and
    /// malformed JSON surface as the underlying transport error.
    pub async fn fetch(&self) -> Result<MetadataDocument, MetadataError> {
        info!("Fetching protocol metadata from {}", self.url);

        let document: MetadataDocument = self
            .client
            .get(&self.url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        debug!("Metadata document has {} entries", document.entries.len());
        Ok(document)
    }
}
