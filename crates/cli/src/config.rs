//! Command line and file configuration.
//!
//! Distributor settings come from an optional JSON file (the serialized
//! form of [`DistConfig`]); flags override individual fields.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use geodist::{
    CellDistributor, DistConfig, Placement, RangePlacement, RingPlacement,
};
use tracing::{debug, info};

use crate::commands::{Command, CommandResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Strategy {
    /// Bounded-load consistent hashing.
    #[default]
    Ring,
    /// Contiguous cell ranges, weighted round robin.
    Range,
}

#[derive(Debug, Parser)]
#[command(
    name = "geodist-cli",
    version,
    about = "Inspect how grid cells are distributed over a set of nodes"
)]
pub struct CliConfig {
    /// JSON distributor config file.
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Grid resolution, 0..=6.
    #[arg(short, long, global = true)]
    pub resolution: Option<u8>,

    /// Number of virtual nodes (vnodes per node for the range strategy).
    #[arg(long, global = true)]
    pub vnodes: Option<usize>,

    /// Capacity multiplier over the average load.
    #[arg(long, global = true)]
    pub load_factor: Option<f64>,

    #[arg(short, long, global = true, value_enum, default_value_t = Strategy::Ring)]
    pub strategy: Strategy,

    /// Node addresses, repeated or comma-separated.
    #[arg(short, long, global = true, value_delimiter = ',')]
    pub nodes: Vec<String>,

    /// Log filter used when `RUST_LOG` is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

impl CliConfig {
    /// File config (or defaults) with flag overrides applied.
    pub fn dist_config(&self) -> Result<DistConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("failed to parse {}", path.display()))?
            }
            None => DistConfig::default(),
        };

        if let Some(resolution) = self.resolution {
            config.resolution = resolution;
        }
        if let Some(vnodes) = self.vnodes {
            config.vnode_count = vnodes;
        }
        if let Some(load_factor) = self.load_factor {
            config.load_factor = load_factor;
        }
        Ok(config)
    }

    /// Build the distributor, add the nodes, run the subcommand.
    pub fn run(&self) -> Result<CommandResult> {
        let config = self.dist_config()?;
        debug!(?config, strategy = ?self.strategy, "building distributor");

        match self.strategy {
            Strategy::Ring => self.execute(CellDistributor::<RingPlacement>::new(config)?),
            Strategy::Range => self.execute(CellDistributor::<RangePlacement>::ranged(config)?),
        }
    }

    fn execute<P: Placement>(&self, dist: CellDistributor<P>) -> Result<CommandResult> {
        for node in &self.nodes {
            dist.add(node)
                .with_context(|| format!("failed to add node {node}"))?;
        }
        info!(
            nodes = self.nodes.len(),
            resolution = %dist.level(),
            strategy = dist.strategy(),
            "distributor ready"
        );
        self.command.execute(&dist)
    }
}
