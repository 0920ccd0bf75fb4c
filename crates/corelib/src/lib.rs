//! Core library for bounded-load consistent hashing.
//!
//! This crate provides the fundamental abstractions:
//! - Tokens and partitioners (deterministic 64-bit hashing)
//! - The node registry
//! - The hash ring of placement keys
//! - The vnode index and its bounded-load distributor

pub mod config;
pub mod error;
pub mod node;
pub mod partitioner;
pub mod ring;
pub mod token;
pub mod vnode;

pub use config::RingConfig;
pub use error::{Error, Result};
pub use node::{Node, NodeId, NodeRegistry};
pub use partitioner::{Partitioner, PartitionerKind};
pub use ring::HashRing;
pub use token::Token;
pub use vnode::{VNodeIndex, VirtualNode};
