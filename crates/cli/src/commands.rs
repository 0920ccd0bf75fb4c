//! Subcommands and their results.

use anyhow::{bail, Context, Result};
use clap::Subcommand;
use geodist::{CellDistributor, CellId, DistributedCell, Grid, Neighbor, NodeLoad, Placement};
use serde::Serialize;

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Show the load held by each node.
    Stats,

    /// Owner of a cell, given by id or by coordinate.
    Lookup {
        /// Cell id in hex.
        #[arg(long, conflicts_with_all = ["lat", "lon"])]
        cell: Option<String>,
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,
        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,
    },

    /// Owner of the ancestor of a finer cell at the configured resolution.
    Parent {
        /// Cell id in hex.
        cell: String,
    },

    /// The cell at a coordinate and its neighbors, nearest first.
    Neighbors {
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
    },

    /// Hosts holding the replicas of a cell.
    Replicas {
        /// Cell id in hex.
        cell: String,
        #[arg(short = 'k', long, default_value_t = 3)]
        count: usize,
    },

    /// Add a node and report how many cells change owner.
    Relocation {
        /// Address of the node to add.
        node: String,
    },
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum CommandResult {
    Stats {
        strategy: &'static str,
        resolution: u8,
        vnodes: usize,
        avg_load: f64,
        loads: Vec<NodeLoad>,
    },
    Cell(DistributedCell),
    Neighbors {
        cell: DistributedCell,
        neighbors: Vec<Neighbor>,
    },
    Replicas {
        cell: CellId,
        hosts: Vec<String>,
    },
    Relocation {
        node: String,
        cells: usize,
        moved: usize,
    },
}

impl Command {
    pub fn execute<P: Placement>(&self, dist: &CellDistributor<P>) -> Result<CommandResult> {
        match self {
            Command::Stats => Ok(CommandResult::Stats {
                strategy: dist.strategy(),
                resolution: dist.level().get(),
                vnodes: dist.vnodes(),
                avg_load: dist.avg_load(),
                loads: dist.stats(),
            }),
            Command::Lookup { cell, lat, lon } => {
                let found = match (cell, lat, lon) {
                    (Some(cell), _, _) => {
                        let cell = decode(dist, cell)?;
                        dist.lookup(cell)
                            .with_context(|| format!("no owner for cell {cell}"))?
                    }
                    (None, Some(lat), Some(lon)) => dist.lookup_from_lat_lon(*lat, *lon)?,
                    _ => bail!("lookup needs --cell or --lat and --lon"),
                };
                Ok(CommandResult::Cell(found))
            }
            Command::Parent { cell } => {
                let cell = decode(dist, cell)?;
                Ok(CommandResult::Cell(dist.where_is_my_parent(cell)?))
            }
            Command::Neighbors { lat, lon } => {
                let (cell, neighbors) = dist.neighbors_from_lat_lon(*lat, *lon)?;
                Ok(CommandResult::Neighbors { cell, neighbors })
            }
            Command::Replicas { cell, count } => {
                let cell = decode(dist, cell)?;
                let hosts = dist.replica_for(cell, *count)?;
                Ok(CommandResult::Replicas { cell, hosts })
            }
            Command::Relocation { node } => {
                let mut before = Vec::new();
                dist.each_cell(|cell| before.push(cell.clone()));
                dist.add(node)
                    .with_context(|| format!("failed to add node {node}"))?;
                let moved = before.iter().filter(|cell| !dist.is_owned(cell)).count();
                Ok(CommandResult::Relocation {
                    node: node.clone(),
                    cells: before.len(),
                    moved,
                })
            }
        }
    }
}

fn decode<P: Placement>(dist: &CellDistributor<P>, text: &str) -> Result<CellId> {
    dist.grid()
        .decode(text)
        .with_context(|| format!("invalid cell id {text:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CliConfig;
    use clap::Parser;

    fn run(args: &[&str]) -> Result<CommandResult> {
        let mut argv = vec!["geodist-cli", "--resolution", "1", "--vnodes", "32"];
        argv.extend_from_slice(args);
        CliConfig::try_parse_from(argv)?.run()
    }

    #[test]
    fn test_stats() {
        let CommandResult::Stats { loads, vnodes, .. } = run(&["-n", "a,b,c", "stats"]).unwrap()
        else {
            panic!("expected stats");
        };
        assert_eq!(vnodes, 32);
        assert_eq!(loads.iter().map(|l| l.load).sum::<usize>(), 32);
    }

    #[test]
    fn test_parent_lookup() {
        let result = run(&["-n", "a", "parent", "821fa7fffffffff"]).unwrap();
        let CommandResult::Cell(cell) = result else {
            panic!("expected a cell");
        };
        assert_eq!(cell.hex_id(), "811fbffffffffff");
        assert_eq!(cell.host, "a");
    }

    #[test]
    fn test_lookup_by_coordinate() {
        let result = run(&["-n", "a,b", "lookup", "--lat", "-33.86", "--lon", "151.21"]);
        assert!(matches!(result, Ok(CommandResult::Cell(_))));
    }

    #[test]
    fn test_lookup_needs_a_target() {
        assert!(run(&["-n", "a", "lookup"]).is_err());
        assert!(run(&["-n", "a", "lookup", "--cell", "zz"]).is_err());
    }

    #[test]
    fn test_replicas_and_relocation() {
        let CommandResult::Replicas { hosts, .. } =
            run(&["-n", "a,b,c", "replicas", "811fbffffffffff", "-k", "2"]).unwrap()
        else {
            panic!("expected replicas");
        };
        assert_eq!(hosts.len(), 2);

        let CommandResult::Relocation { cells, moved, .. } =
            run(&["-n", "a,b,c", "relocation", "d"]).unwrap()
        else {
            panic!("expected relocation");
        };
        assert_eq!(cells, 842);
        assert!(moved < cells);
    }

    #[test]
    fn test_result_serializes() {
        let json = serde_json::to_value(run(&["-n", "a", "stats"]).unwrap()).unwrap();
        assert_eq!(json["result"], "stats");
        assert_eq!(json["strategy"], "ring");
    }
}
