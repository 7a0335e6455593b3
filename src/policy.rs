//! Route Policy Module
//!
//! Pure lookups over the constant tables that decide, per chain or per
//! ordered chain pair:
//! - the required DVN set (mandatory operator group on the source chain)
//! - the optional DVN set and its threshold (routing-dependent groups)
//! - the enforced execution options for a destination
//! - the multisig that owns and administers the contract
//!
//! Only the multisig lookup can fail. An unconfigured owner must stop the run,
//! everything else has a well-defined empty or default answer.

use std::sync::OnceLock;
use thiserror::Error;

use crate::address::{is_placeholder_address, validate_address};
use crate::chains::Chain;
use crate::tables::{
    builtin_dvns, builtin_enforced_options, builtin_multisigs, DvnGroup, DvnRegistry,
    EnforcedOption, EnforcedOptionTable, MultisigTable, DEFAULT_ENFORCED_OPTION,
};

#[derive(Debug, Error)]
pub enum PolicyError {
    #[error("Multisig address not configured for endpoint {chain}. Please update the multisig table in tables.rs")]
    MultisigNotConfigured { chain: Chain },

    #[error("Multisig address '{address}' for endpoint {chain} is invalid: {reason}. Please update the multisig table in tables.rs")]
    InvalidMultisig {
        chain: Chain,
        address: String,
        reason: String,
    },
}

// ============================================================================
// ROUTING RULES
// ============================================================================

/// Which DVN groups apply to which routes.
#[derive(Debug, Clone)]
pub struct RoutingRules {
    /// Group whose DVN is required on every route it serves
    pub required_group: DvnGroup,
    /// Optional groups for ordinary routes
    pub optional_groups: Vec<DvnGroup>,
    /// Chain whose routes (either direction) use `special_optional_groups`
    pub special_chain: Option<Chain>,
    /// Optional groups for routes touching `special_chain`
    pub special_optional_groups: Vec<DvnGroup>,
    /// How many optional DVNs must attest
    pub optional_threshold: u8,
}

impl RoutingRules {
    pub fn builtin() -> Self {
        Self {
            required_group: DvnGroup::Wyoming,
            optional_groups: vec![DvnGroup::GoogleCloud, DvnGroup::LzLabs],
            // The cloud operator does not run on Hedera; custody group stands in
            special_chain: Some(Chain::HederaMainnet),
            special_optional_groups: vec![DvnGroup::Canary, DvnGroup::LzLabs],
            optional_threshold: 1,
        }
    }

    fn is_special_route(&self, from: Chain, to: Chain) -> bool {
        matches!(self.special_chain, Some(special) if from == special || to == special)
    }
}

/// Everything the policy says about one directed route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteSummary {
    pub from: Chain,
    pub to: Chain,
    pub required_dvns: Vec<String>,
    pub optional_dvns: Vec<String>,
    pub optional_threshold: u8,
    pub enforced_options: Vec<EnforcedOption>,
}

// ============================================================================
// ROUTE POLICY
// ============================================================================

/// Immutable bundle of tables plus routing rules.
#[derive(Debug, Clone)]
pub struct RoutePolicy {
    dvns: DvnRegistry,
    enforced: EnforcedOptionTable,
    multisigs: MultisigTable,
    rules: RoutingRules,
}

impl RoutePolicy {
    pub fn new(
        dvns: DvnRegistry,
        enforced: EnforcedOptionTable,
        multisigs: MultisigTable,
        rules: RoutingRules,
    ) -> Self {
        Self {
            dvns,
            enforced,
            multisigs,
            rules,
        }
    }

    /// Production policy, built on first use and shared for the process lifetime.
    pub fn builtin() -> &'static RoutePolicy {
        static POLICY: OnceLock<RoutePolicy> = OnceLock::new();
        POLICY.get_or_init(|| {
            RoutePolicy::new(
                builtin_dvns(),
                builtin_enforced_options(),
                builtin_multisigs(),
                RoutingRules::builtin(),
            )
        })
    }

    pub fn rules(&self) -> &RoutingRules {
        &self.rules
    }

    pub fn dvns(&self) -> &DvnRegistry {
        &self.dvns
    }

    /// Required DVNs for messages leaving `chain`.
    ///
    /// Empty when the mandatory group does not operate on `chain`.
    pub fn required_dvns(&self, chain: Chain) -> Vec<String> {
        self.dvns
            .address(self.rules.required_group, chain)
            .map(|addr| vec![addr.to_string()])
            .unwrap_or_default()
    }

    /// Optional DVNs for the route `from -> to`, resolved on `from`.
    ///
    /// Groups without a DVN on `from` are skipped, so the result may hold
    /// zero, one or two addresses.
    pub fn optional_dvns(&self, from: Chain, to: Chain) -> Vec<String> {
        let groups = if self.rules.is_special_route(from, to) {
            &self.rules.special_optional_groups
        } else {
            &self.rules.optional_groups
        };

        groups
            .iter()
            .filter_map(|group| self.dvns.address(*group, from))
            .map(str::to_string)
            .collect()
    }

    pub fn optional_threshold(&self) -> u8 {
        self.rules.optional_threshold
    }

    /// Threshold to attach to a route with `optional_dvns`: the configured
    /// threshold, capped at the number of optional DVNs actually present.
    pub fn threshold_for(&self, optional_dvns: &[String]) -> u8 {
        let available = u8::try_from(optional_dvns.len()).unwrap_or(u8::MAX);
        self.rules.optional_threshold.min(available)
    }

    /// Enforced options for messages arriving at `destination`, or the single
    /// default `lzReceive` option when no override exists.
    pub fn enforced_options(&self, destination: Chain) -> Vec<EnforcedOption> {
        match self.enforced.get(destination) {
            Some(options) => options.to_vec(),
            None => vec![DEFAULT_ENFORCED_OPTION],
        }
    }

    /// Owner and delegate multisig for `chain`.
    ///
    /// Fails when the entry is missing, a placeholder (`TODO`, zero address)
    /// or not a valid address for the chain's family.
    pub fn multisig(&self, chain: Chain) -> Result<&str, PolicyError> {
        let address = self
            .multisigs
            .get(chain)
            .filter(|addr| !is_placeholder_address(addr))
            .ok_or(PolicyError::MultisigNotConfigured { chain })?;

        validate_address(chain.family(), address).map_err(|e| PolicyError::InvalidMultisig {
            chain,
            address: address.to_string(),
            reason: e.to_string(),
        })?;

        Ok(address)
    }

    pub fn route(&self, from: Chain, to: Chain) -> RouteSummary {
        let optional_dvns = self.optional_dvns(from, to);
        RouteSummary {
            from,
            to,
            required_dvns: self.required_dvns(from),
            optional_threshold: self.threshold_for(&optional_dvns),
            optional_dvns,
            enforced_options: self.enforced_options(to),
        }
    }
}
