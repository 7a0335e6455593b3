//! OFT Wiring CLI
//!
//! Generates the OApp configuration graph consumed by the wiring driver and
//! inspects the inputs that go into it.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin oft-wire -- generate --config config/wire_mainnet.toml --output graph.json
//! cargo run --bin oft-wire -- route --from arbitrum --to solana --annotate
//! cargo run --bin oft-wire -- libraries --eid 30110
//! cargo run --bin oft-wire -- networks --network testnet
//! cargo run --bin oft-wire -- signer --network mainnet --fireblocks
//! ```
//!
//! Or set the config path via environment variable:
//!
//! ```bash
//! WIRE_CONFIG_PATH=config/wire_testnet.toml cargo run --bin oft-wire -- generate
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use oft_wire::{
    chains::{Chain, Environment},
    config::{WireConfig, CONFIG_PATH_ENV},
    graph::GraphBuilder,
    metadata::{resolve_metadata_url, MetadataClient, MetadataDocument},
    policy::RoutePolicy,
    signer::SignerMode,
};
use std::time::Duration;
use tracing::{info, warn};

/// Timeout for metadata requests made outside a config-driven run.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Parser, Debug)]
#[command(name = "oft-wire")]
#[command(about = "OFT cross-chain wiring - generates the DVN, enforced option and ownership graph")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate the configuration graph from a config file
    Generate {
        /// Path to wiring configuration file (default: config/wire.toml or WIRE_CONFIG_PATH env var)
        #[arg(short, long)]
        config: Option<String>,
        /// Expected network; fails if the config declares another one
        #[arg(short, long)]
        network: Option<Environment>,
        /// Write the graph here instead of stdout
        #[arg(short, long)]
        output: Option<String>,
        /// Resolve send/receive libraries and executors from the metadata service
        #[arg(long)]
        with_libraries: bool,
        /// Metadata service URL (overrides LZ_METADATA_URL and the config file)
        #[arg(long)]
        metadata_url: Option<String>,
    },
    /// Print the DVN and enforced option policy for one route
    Route {
        #[arg(long)]
        from: Chain,
        #[arg(long)]
        to: Chain,
        /// Name DVNs from the metadata service and warn on deprecated ones
        #[arg(long)]
        annotate: bool,
        #[arg(long)]
        metadata_url: Option<String>,
    },
    /// Print the send/receive libraries and executor for a chain
    Libraries {
        #[arg(long)]
        eid: Chain,
        #[arg(long)]
        metadata_url: Option<String>,
    },
    /// List known chains with their network settings
    Networks {
        #[arg(short, long)]
        network: Option<Environment>,
    },
    /// Report which signer the wiring driver will use
    Signer {
        #[arg(short, long)]
        network: Environment,
        /// Require Fireblocks custodial signing
        #[arg(long)]
        fireblocks: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments first (before initializing logging)
    let args = Args::parse();

    // Initialize structured logging
    tracing_subscriber::fmt::init();

    match args.command {
        Command::Generate {
            config,
            network,
            output,
            with_libraries,
            metadata_url,
        } => generate(config, network, output, with_libraries, metadata_url).await,
        Command::Route {
            from,
            to,
            annotate,
            metadata_url,
        } => route(from, to, annotate, metadata_url).await,
        Command::Libraries { eid, metadata_url } => libraries(eid, metadata_url).await,
        Command::Networks { network } => {
            networks(network);
            Ok(())
        }
        Command::Signer { network, fireblocks } => signer(network, fireblocks),
    }
}

async fn generate(
    config_path: Option<String>,
    network: Option<Environment>,
    output: Option<String>,
    with_libraries: bool,
    metadata_url: Option<String>,
) -> Result<()> {
    // Priority: CLI arg > env var > default
    match (&config_path, std::env::var(CONFIG_PATH_ENV)) {
        (Some(path), _) => info!("Loading configuration from: {}", path),
        (None, Ok(path)) => info!("Loading configuration from {}: {}", CONFIG_PATH_ENV, path),
        (None, Err(_)) => info!("Loading configuration from default location"),
    }
    let config = WireConfig::load_from_path(config_path.as_deref())?;

    if let Some(expected) = network {
        if expected != config.network {
            anyhow::bail!(
                "Configuration declares network {} but {} was requested",
                config.network,
                expected
            );
        }
    }

    info!("Configuration loaded successfully");
    info!("Network: {}", config.network);
    info!("Contracts: {}", config.contracts.len());

    let points = config.contract_points()?;
    let policy = RoutePolicy::builtin();

    let metadata = if with_libraries {
        let url = config.metadata_url(metadata_url.as_deref());
        let client = MetadataClient::new(url, config.request_timeout())?;
        Some(client.fetch().await.context("Failed to fetch protocol metadata")?)
    } else {
        None
    };

    let mut builder = GraphBuilder::new(policy, config.graph_options());
    if let Some(metadata) = metadata.as_ref() {
        builder = builder.with_metadata(metadata);
    }
    let graph = builder.build(&points)?;

    let json = serde_json::to_string_pretty(&graph).context("Failed to serialize graph")?;
    match output {
        Some(path) => {
            std::fs::write(&path, json).with_context(|| format!("Failed to write graph to '{}'", path))?;
            info!("Graph written to {}", path);
        }
        None => println!("{}", json),
    }

    Ok(())
}

async fn fetch_metadata(metadata_url: Option<String>) -> Result<MetadataDocument> {
    let url = resolve_metadata_url(metadata_url.as_deref(), None);
    let client = MetadataClient::new(url, DEFAULT_REQUEST_TIMEOUT)?;
    client.fetch().await.context("Failed to fetch protocol metadata")
}

async fn route(from: Chain, to: Chain, annotate: bool, metadata_url: Option<String>) -> Result<()> {
    if from == to {
        anyhow::bail!("Route source and destination are both {}", from);
    }
    if from.environment() != to.environment() {
        anyhow::bail!("Route {} -> {} crosses mainnet and testnet", from, to);
    }

    let summary = RoutePolicy::builtin().route(from, to);
    let metadata = if annotate {
        Some(fetch_metadata(metadata_url).await?)
    } else {
        None
    };

    let describe = |address: &str| -> String {
        let Some(info) = metadata.as_ref().and_then(|doc| doc.dvn_info(from, address)) else {
            return address.to_string();
        };
        if info.deprecated {
            warn!("DVN {} ({}) on {} is deprecated", info.canonical_name, address, from);
        }
        format!("{} ({})", address, info.canonical_name)
    };

    println!("Route {} -> {}", summary.from, summary.to);
    println!("  Required DVNs:");
    if summary.required_dvns.is_empty() {
        println!("    (none)");
    }
    for dvn in &summary.required_dvns {
        println!("    {}", describe(dvn));
    }
    println!("  Optional DVNs (threshold {}):", summary.optional_threshold);
    if summary.optional_dvns.is_empty() {
        println!("    (none)");
    }
    for dvn in &summary.optional_dvns {
        println!("    {}", describe(dvn));
    }
    println!("  Enforced options on {}:", summary.to);
    for option in &summary.enforced_options {
        println!(
            "    msgType {} optionType {} gas {} value {}",
            option.msg_type,
            u8::from(option.option_type),
            option.gas,
            option.value
        );
    }

    Ok(())
}

async fn libraries(chain: Chain, metadata_url: Option<String>) -> Result<()> {
    let metadata = fetch_metadata(metadata_url).await?;

    println!("{}", chain);
    println!("  Send library:    {}", metadata.send_library(chain)?);
    println!("  Receive library: {}", metadata.receive_library(chain)?);
    println!("  Executor:        {}", metadata.executor(chain)?.as_str());

    Ok(())
}

fn networks(network: Option<Environment>) {
    let chains: Vec<Chain> = match network {
        Some(environment) => Chain::in_environment(environment).collect(),
        None => Chain::ALL.to_vec(),
    };

    for chain in chains {
        let info = chain.network();
        println!(
            "{:>6}  {:<24} {:<7} {:<16} {}",
            chain.eid(),
            chain.symbol(),
            chain.family().to_string(),
            info.name,
            chain.rpc_url()
        );
    }
}

fn signer(network: Environment, fireblocks: bool) -> Result<()> {
    match SignerMode::from_env(network, fireblocks)? {
        SignerMode::Local => println!("Signer: local keypair ({})", network),
        SignerMode::Fireblocks(credentials) => {
            println!("Signer: Fireblocks ({})", network);
            println!("  Solana vault account: {}", credentials.solana_vault_account_id);
            println!("  Solana payer:         {}", credentials.solana_payer);
            println!("  Solana asset:         {}", credentials.solana_asset_id);
            if credentials.evm_vault_account_ids.is_empty() {
                println!("  EVM vault accounts:   (default)");
            } else {
                println!("  EVM vault accounts:   {}", credentials.evm_vault_account_ids.join(", "));
            }
        }
    }
    Ok(())
}
