//! Node Library Tool
//!
//! Rebuilds the local node specification library from the registry and checks
//! a single controller version for updates.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use node_spec_library::utils::logging::init_logging_from_config;
use node_spec_library::{
    InMemoryNodeStore, LibraryConfig, LibrarySource, LoggingConfig, Node, NodeLibraryManager,
    NodeSpecification,
};
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "node-library")]
#[command(about = "Maintain the local node specification library")]
struct Args {
    /// Configuration file (TOML or JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rebuild the node and package libraries
    Refresh,

    /// Check whether a newer controller specification exists
    CheckUpdate {
        /// Controller specification id (e.g. geth)
        #[arg(long)]
        spec_id: String,

        /// Installed version
        #[arg(long)]
        version: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => LibraryConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration {:?}", path))?,
        None => LibraryConfig::default(),
    };
    if args.verbose {
        let verbose = LoggingConfig {
            filter: Some("debug".to_string()),
            ..config.logging.clone().unwrap_or_default()
        };
        init_logging_from_config(Some(&verbose));
    } else {
        init_logging_from_config(config.logging.as_ref());
    }

    // overrides log at info, so logging must be up first
    config.apply_env_overrides();
    config.validate().context("Invalid configuration")?;

    info!(
        "Registry: {} (plaintext: {})",
        config.registry.base_url,
        config.registry.plaintext()
    );

    let nodes = Arc::new(InMemoryNodeStore::new());
    let manager = NodeLibraryManager::new(&config, nodes.clone())
        .context("Failed to create registry client")?;

    match args.command {
        Command::Refresh => {
            let report = manager.initialize().await;
            match &report.source {
                LibrarySource::Fallback { reason } => {
                    println!("Registry unavailable ({reason}); using bundled catalog")
                }
                source => println!("Library source: {source:?}"),
            }
            println!(
                "Generation {}: {} controllers, {} packages",
                report.generation, report.controllers, report.packages
            );
            for failure in &report.failures {
                println!(
                    "  skipped {} #{} ({}): {}",
                    failure.kind,
                    failure.index,
                    failure.spec_id.as_deref().unwrap_or("<no specId>"),
                    failure.error
                );
            }
        }
        Command::CheckUpdate { spec_id, version } => {
            let spec = NodeSpecification::from_raw(&json!({
                "specId": spec_id,
                "displayName": spec_id,
                "version": version,
            }))
            .context("Invalid controller id")?;
            let node = Node::new(spec);
            let node_id = node.node_id.clone();
            nodes.insert(node);

            let latest = manager
                .get_check_for_controller_update(&node_id)
                .await
                .with_context(|| format!("Update check for {spec_id} failed"))?;
            match latest {
                Some(latest) => {
                    println!("{spec_id}: update available ({version} -> {})", latest.version)
                }
                None => println!("{spec_id}: up to date ({version})"),
            }
        }
    }

    Ok(())
}
