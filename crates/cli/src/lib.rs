//! Command line inspection of a cell distribution.
//!
//! Builds a distributor from a config file and flags, adds the given nodes
//! and answers one query:
//! - Per-node load
//! - Owner of a cell, a parent cell or a coordinate
//! - Neighbors and replicas
//! - Cells moved by adding a node

pub mod commands;
pub mod config;

pub use commands::{Command, CommandResult};
pub use config::{CliConfig, Strategy};
